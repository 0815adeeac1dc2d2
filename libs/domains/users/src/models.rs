use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Registered account. `password_hash` never leaves the service layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub adult: bool,
    /// Ids of the user's blogs, in creation order
    pub blogs: Vec<Uuid>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        name: Option<String>,
        password_hash: impl Into<String>,
        adult: bool,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            username: username.into(),
            name,
            password_hash: password_hash.into(),
            adult,
            blogs: Vec::new(),
        }
    }
}

/// Public fields of a blog, embedded in user listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BlogSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
}

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub adult: bool,
    pub blogs: Vec<BlogSummary>,
}

impl UserResponse {
    pub fn new(user: User, blogs: Vec<BlogSummary>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            adult: user.adult,
            blogs,
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1))]
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    pub password: String,
    /// Defaults to `true` when absent
    #[serde(default)]
    pub adult: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
