//! Shared application state, built once at startup.

use axum_helpers::JwtAuth;
use domain_blogs::mongodb::MongoBlogRepository;
use domain_users::mongodb::MongoUserRepository;
use mongodb::Client;
use std::sync::Arc;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Cloneable handle sharing one connection pool
    pub mongo_client: Client,
    pub blogs: Arc<MongoBlogRepository>,
    pub users: Arc<MongoUserRepository>,
    pub auth: JwtAuth,
}
