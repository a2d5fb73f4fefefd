use song_discovery::{
    api::{create_router, AppState},
    catalog,
    config::Config,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("song_discovery=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // A malformed catalog is fatal
    let catalog = catalog::load_catalog(&config.catalog_path)?;
    if catalog.is_empty() {
        tracing::warn!(
            path = %config.catalog_path,
            "Catalog is empty, every query will return nothing"
        );
    }

    // Initialize application state
    let state =
        AppState::new(catalog, config.similar_songs_seed).with_session_ttl(config.session_ttl());

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
