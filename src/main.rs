//! Contest Engine - Application Entry Point

use std::{net::SocketAddr, sync::Arc};

use axum::{Router, middleware};
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contest_engine::{
    cache::{MemoryStageCache, RedisStageCache, StageCache},
    config::CONFIG,
    constants::API_BASE_PATH,
    db, handlers,
    middleware::logging_middleware,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting contest engine...");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&CONFIG.database).await?;

    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    let ttl = CONFIG.stage.cache_ttl;
    let stage_cache: Arc<dyn StageCache> = match CONFIG.redis.url.as_deref() {
        Some(url) => {
            tracing::info!("Connecting to Redis...");
            let client = redis::Client::open(url)?;
            let manager = redis::aio::ConnectionManager::new(client).await?;
            Arc::new(RedisStageCache::new(manager, ttl))
        }
        None => {
            tracing::info!("REDIS_URL not set, caching stages in process");
            Arc::new(MemoryStageCache::new(ttl))
        }
    };

    let state = AppState::new(db_pool, stage_cache, CONFIG.clone());

    let app = Router::new()
        .nest(API_BASE_PATH, handlers::routes(state.clone()))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
