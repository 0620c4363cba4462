use tracing::info;
use tracing_subscriber::EnvFilter;

use veggie_box::config::AppConfig;
use veggie_box::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app_state = initialize_backend(&config).await?;
    let app = create_router(app_state, &config.server.allowed_origin);

    // Start the server
    let addr = config.bind_address();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
