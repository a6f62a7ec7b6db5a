use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use config::{Config, Environment, File};
use dotenvy::dotenv;
use tera::Tera;

use blogicum::db::establish_connection_pool;
use blogicum::models::config::ServerConfig;
use blogicum::repository::DieselRepository;
use blogicum::routes::configure;
use blogicum::routes::main::not_found_page;

/// Layered configuration: `config/default.yaml`, then `config/{APP_ENV}.yaml`
/// when present, then `APP__*` environment variables.
fn load_config() -> Result<ServerConfig, config::ConfigError> {
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    Config::builder()
        .add_source(File::with_name("config/default"))
        .add_source(File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize()
}

fn io_error(message: String) -> std::io::Error {
    std::io::Error::other(message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = load_config().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        io_error(e.to_string())
    })?;

    let secret_key = Key::try_from(server_config.secret_key.as_bytes()).map_err(|e| {
        log::error!("secret_key must be at least 64 bytes long: {e}");
        io_error(e.to_string())
    })?;

    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        log::error!("Failed to establish database connection: {e}");
        io_error(e.to_string())
    })?;
    let repo = DieselRepository::new(pool);

    let tera = Tera::new(&format!("{}/**/*", server_config.templates_dir)).map_err(|e| {
        log::error!("Failed to load templates: {e}");
        io_error(e.to_string())
    })?;

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting blogicum on {}:{}",
        server_config.address,
        server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .build(),
            )
            .wrap(Logger::default())
            .service(Files::new("/static", server_config.static_dir.clone()))
            .configure(configure)
            .default_service(web::route().to(not_found_page))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(web::Data::new(tera.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
