use serde::Deserialize;

/// Default number of posts shown on one listing page.
pub const DEFAULT_POSTS_PER_PAGE: usize = 10;

/// Settings consumed by the listing assembler.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct ListingConfig {
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: usize,
}

fn default_posts_per_page() -> usize {
    DEFAULT_POSTS_PER_PAGE
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
        }
    }
}

/// Configuration options of the blog server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// SQLite database path.
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Key material for session and flash-message cookies, at least 64 bytes.
    pub secret_key: String,
    pub templates_dir: String,
    pub static_dir: String,
    #[serde(default)]
    pub listing: ListingConfig,
}
