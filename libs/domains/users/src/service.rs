use axum_helpers::JwtAuth;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{BlogSummary, CreateUser, LoginRequest, LoginResponse, User, UserResponse};
use crate::password;
use crate::repository::{BlogDirectory, UserRepository};

/// Registration, listing and login.
pub struct UserService<U: UserRepository, D: BlogDirectory> {
    users: Arc<U>,
    blogs: Arc<D>,
    auth: JwtAuth,
}

impl<U: UserRepository, D: BlogDirectory> Clone for UserService<U, D> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            blogs: Arc::clone(&self.blogs),
            auth: self.auth.clone(),
        }
    }
}

impl<U: UserRepository, D: BlogDirectory> UserService<U, D> {
    pub fn new(users: U, blogs: D, auth: JwtAuth) -> Self {
        Self::from_shared(Arc::new(users), Arc::new(blogs), auth)
    }

    /// Build from repositories that are also handed to other services.
    pub fn from_shared(users: Arc<U>, blogs: Arc<D>, auth: JwtAuth) -> Self {
        Self { users, blogs, auth }
    }

    /// Register a user. The username check is not atomic with the insert; the
    /// storage layer's unique index catches the race.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        if self.users.exists_by_username(&input.username).await? {
            return Err(UserError::UsernameTaken);
        }

        if !password::is_long_enough(&input.password) {
            return Err(UserError::PasswordTooShort);
        }

        let plaintext = input.password;
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
            .await
            .map_err(|e| UserError::Internal(format!("hashing task failed: {e}")))??;

        let user = User::new(
            input.username,
            input.name,
            password_hash,
            input.adult.unwrap_or(true),
        );
        let created = self.users.create(user).await?;

        Ok(UserResponse::new(created, Vec::new()))
    }

    /// All users, each with the public fields of their blogs.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.users.list().await?;

        let blog_ids: Vec<Uuid> = users.iter().flat_map(|u| u.blogs.iter().copied()).collect();
        let summaries: HashMap<Uuid, BlogSummary> = self
            .blogs
            .summaries(&blog_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(users
            .into_iter()
            .map(|user| {
                // ids of deleted blogs are skipped
                let blogs = user
                    .blogs
                    .iter()
                    .filter_map(|id| summaries.get(id).cloned())
                    .collect();
                UserResponse::new(user, blogs)
            })
            .collect())
    }

    /// Check credentials and issue an access token.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginRequest) -> UserResult<LoginResponse> {
        let user = self
            .users
            .get_by_username(&input.username)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let hash = user.password_hash.clone();
        let plaintext = input.password;
        let valid = tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &hash))
            .await
            .map_err(|e| UserError::Internal(format!("verification task failed: {e}")))??;

        if !valid {
            tracing::info!("Rejected login with wrong password");
            return Err(UserError::InvalidCredentials);
        }

        let token = self.auth.issue(user.id, &user.username)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            token,
            username: user.username,
            name: user.name,
        })
    }
}
