use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobflow_api::auth::{DemoSessions, SessionResolver};
use jobflow_api::config::Config;
use jobflow_api::object_store::{self, ResumeStore};
use jobflow_api::routes::build_router;
use jobflow_api::state::AppState;
use jobflow_api::storage;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.rust_log)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobFlow API v{}", env!("CARGO_PKG_VERSION"));

    // Postgres when configured, in-memory otherwise
    let storage = storage::connect(&config).await?;

    // S3-compatible object storage for resume binaries
    let s3 = object_store::build_client(&config).await;
    let resumes = Arc::new(ResumeStore::new(
        s3,
        config.s3_bucket.clone(),
        config.s3_public_url.clone(),
    ));
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Session resolution is stubbed with the demo identity for now
    let sessions: Arc<dyn SessionResolver> = Arc::new(DemoSessions);

    let state = AppState {
        storage,
        resumes,
        sessions,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
