use anyhow::Result;
use std::sync::Arc;

use menu_catalog::{
    app, config, db, logging,
    services::{AiGateway, GeminiClient, MenuCatalogService},
    store::{InMemoryMenuStore, MenuStore, PgMenuStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting menu catalog"
    );

    // Pick the menu store
    let store: Arc<dyn MenuStore> = match settings.database_url.as_deref() {
        Some(url) => Arc::new(PgMenuStore::new(db::create_pool(url, &settings).await?)),
        None => {
            tracing::warn!("DATABASE_URL not set - using in-memory menu store");
            Arc::new(InMemoryMenuStore::new())
        }
    };

    // Create AI completion client
    let ai = AiGateway::new(Arc::new(GeminiClient::new(&settings)?));

    let catalog = MenuCatalogService::new(store, ai)
        .with_snapshot_limit(settings.recommendation_catalog_limit);

    // Create application state
    let state = app::AppState::new(settings.clone(), catalog);

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
