//! Shared harness for integration tests: a throwaway SQLite file with the
//! blog schema applied.

#![allow(dead_code)]

use blogicum::db::{DbPool, establish_connection_pool};
use blogicum::repository::DieselRepository;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Migrated database living as long as the value. The file is removed on drop.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let path = tempfile.path().to_str().expect("temp path is UTF-8");
        let pool = establish_connection_pool(path).expect("Failed to build SQLite pool.");

        pool.get()
            .expect("Failed to get SQLite connection from pool.")
            .run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");

        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    /// Diesel-backed repository over this database.
    pub fn repository(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}
