use sea_orm::Database;
use tracing::{info, warn};

use bookmarkd_core::config::Config as _;
use bookmarkd_core::tracing::init_tracing;
use bookmarkd_social::config::SocialConfig;
use bookmarkd_social::router::build_router;
use bookmarkd_social::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = SocialConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis = config.redis_url.as_deref().map(|url| {
        deadpool_redis::Config::from_url(url)
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .expect("failed to create Redis pool")
    });
    if redis.is_none() {
        warn!("REDIS_URL not set, response cache disabled");
    }

    let state = AppState { db, redis };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.social_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("social service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
