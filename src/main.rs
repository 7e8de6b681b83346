use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use proposal_pricing::cache::AppCache;
use proposal_pricing::config::AppConfig;
use proposal_pricing::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("proposal_pricing=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    info!("Connected to database");

    let cache = AppCache::new(config.settings_cache_capacity, config.settings_cache_ttl);
    let app = proposal_pricing::app(AppState { db, cache });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Pricing service listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
