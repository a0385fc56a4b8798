use actix_cors::Cors;
use actix_web::{middleware, App, HttpServer};
use juso_geo::config::{LoggingSettings, Settings};
use juso_geo::routes::{self, AppState};
use juso_geo::services::AddressStore;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize tracing; RUST_LOG takes precedence over the configured level
fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e)))?;

    init_logging(&settings.logging);

    info!("Starting Juso Geo address service...");

    let pool_options = settings.database.pool_options();
    let store = AddressStore::connect(&settings.database.url, pool_options)
        .await
        .map_err(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
        })?;

    info!("PostgreSQL pool initialized (max: {} connections)", pool_options.max_connections);

    if settings.database.run_migrations {
        store.migrate().await.map_err(|e| {
            error!("Failed to run migrations: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?;
    }

    let composer = settings.query.composer();
    info!(
        "Query policy: default limit {}, max limit {}, SRID {}",
        composer.limits().default_limit,
        composer.limits().max_limit,
        composer.srid()
    );

    let store = Arc::new(store);
    let app_state = AppState {
        store: store.clone(),
        composer,
        region_defaults: settings.region.selector(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    let result = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .configure(routes::configure_app(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await;

    store.close().await;
    info!("PostgreSQL pool closed");

    result
}
