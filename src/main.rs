use photogram_api::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    error::AppError,
    repository::{PostgresRepository, RepositoryState},
    storage::{MediaState, MediaUploader, S3MediaUploader},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: configuration, logging, database (with migrations), media host, HTTP server.
/// Any start-up failure is returned instead of serving with a half-built state.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Configuration (fail-fast on missing production secrets)
    dotenv::dotenv().ok();
    let config = AppConfig::load()?;

    // 2. Logging: RUST_LOG wins, otherwise sensible local defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "photogram_api=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Database
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .map_err(|e| AppError::Fatal(format!("failed to connect to Postgres: {e}")))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| AppError::Fatal(format!("failed to run migrations: {e}")))?;

    let repo = Arc::new(PostgresRepository::new(pool)) as RepositoryState;

    // 4. Media host (S3/MinIO)
    let uploader = S3MediaUploader::new(
        &config.s3_endpoint,
        &config.s3_region,
        &config.s3_key,
        &config.s3_secret,
        &config.s3_bucket,
        &config.media_public_url,
    )?;

    // Local MinIO starts empty.
    if config.env == Env::Local {
        uploader.ensure_bucket_exists().await;
    }

    let media = Arc::new(uploader) as MediaState;

    // 5. State, router, server
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(repo, media, config)?);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AppError::Fatal(format!("failed to bind {bind_addr}: {e}")))?;

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{bind_addr}/swagger-ui");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Fatal(format!("server error: {e}")))
}
