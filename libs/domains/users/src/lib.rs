//! Users Domain
//!
//! Registration (unique username, minimum password length, Argon2 hashing), listing
//! with each user's blogs expanded, and token-issuing login.
//!
//! ```text
//! handlers ─▶ UserService ─▶ UserRepository (MongoDB / in-memory)
//!                        └─▶ BlogDirectory  (implemented by the blogs domain)
//! ```
//!
//! ```rust,ignore
//! use domain_users::{handlers, mongodb::MongoUserRepository, service::UserService};
//!
//! let users = MongoUserRepository::new(db.clone());
//! users.create_indexes().await?;
//! let service = UserService::new(users, blog_directory, jwt_auth);
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod password;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::{ApiDoc, LoginApiDoc};
pub use models::{BlogSummary, CreateUser, LoginRequest, LoginResponse, User, UserResponse};
pub use repository::{BlogDirectory, InMemoryUserRepository, UserRepository};
pub use service::UserService;
