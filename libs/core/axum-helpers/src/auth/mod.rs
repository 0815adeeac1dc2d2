//! Bearer-token authentication.
//!
//! - [`JwtAuth`] issues and verifies HS256 tokens whose `sub` claim is a user id
//! - [`BearerToken`] pulls the raw token out of the `Authorization` header
//!
//! Verification is left to the services so that each operation decides whether a
//! missing token is an error.
//!
//! ```ignore
//! use axum_helpers::auth::{BearerToken, JwtAuth, JwtConfig};
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! async fn handler(BearerToken(token): BearerToken) {
//!     let subject = auth.verify(token.as_deref())?;
//! }
//! ```

pub mod config;
pub mod extractor;
pub mod jwt;

pub use config::JwtConfig;
pub use extractor::{BearerToken, extract_bearer_token};
pub use jwt::{AuthError, JwtAuth, JwtClaims, Subject};
