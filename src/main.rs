use anyhow::Context;
use axum::Router;
use droitfpra_content::config::ContentConfig;
use droitfpra_content::database::sqlite::SqliteStorage;
use droitfpra_content::events::ChangeBus;
use droitfpra_content::features;
use droitfpra_content::io::local::LocalUploadStore;
use droitfpra_content::services::{ContentService, RemoteClient};
use droitfpra_content::store::ContentStore;
use droitfpra_content::AppState;
use sqlx::Sqlite;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // determine environment variables
    dotenv::dotenv().ok();

    // load centralized config
    let config = ContentConfig::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // verify db exists
    if !Sqlite::database_exists(&config.database_url)
        .await
        .unwrap_or(false)
    {
        tracing::info!("Unable to find database at {}, creating...", config.database_url);
        Sqlite::create_database(&config.database_url)
            .await
            .with_context(|| format!("Unable to create database at {}", config.database_url))?;
    }

    // connect to our db
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to create pool on {}", config.database_url))?;

    // run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    // build the store and seed anything missing
    let store = Arc::new(ContentStore::new(
        Arc::new(SqliteStorage::new(pool.clone())),
        config.key_prefix.clone(),
    ));
    store.init().await?;

    let remote = config.remote_api_url.as_ref().map(|url| {
        tracing::info!("Falling back to remote content API at {}", url);
        RemoteClient::http(url.clone())
    });

    let content = Arc::new(ContentService::new(store, remote, ChangeBus::new()));

    let app_state = AppState {
        content,
        uploads: Arc::new(LocalUploadStore::new(
            config.upload_dir.clone(),
            config.public_upload_prefix.clone(),
        )),
    };

    let app = Router::new()
        .nest("/api", features::api_router())
        .nest_service(&config.public_upload_prefix, ServeDir::new(&config.upload_dir))
        .fallback_service(ServeDir::new(&config.frontend_path))
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
