use axum_helpers::{
    JwtAuth,
    server::{create_production_app, create_router, health_router},
};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_blogs::mongodb::MongoBlogRepository;
use domain_users::mongodb::MongoUserRepository;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to MongoDB database {}", config.mongodb.database());
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(config.mongodb.database());

    let users = MongoUserRepository::new(db.clone());
    users
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create user indexes: {}", e))?;
    info!("User collection indexes created");

    let state = AppState {
        auth: JwtAuth::new(&config.jwt),
        blogs: Arc::new(MongoBlogRepository::new(db)),
        users: Arc::new(users),
        mongo_client,
        config,
    };

    if state.config.blog_policy.require_owner_for_update {
        info!("Blog updates restricted to their creators");
    }

    let router = create_router::<openapi::ApiDoc>(api::routes(&state))?;
    let app = router.merge(health_router(state.config.app));

    info!("Starting Blog API with graceful shutdown (30s timeout)");

    let mongo_client = state.mongo_client.clone();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connections closed");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Blog API shutdown complete");
    Ok(())
}
