use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{BlogSummary, User};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; a taken username is `UsernameTaken`
    async fn create(&self, user: User) -> UserResult<User>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>>;

    async fn exists_by_username(&self, username: &str) -> UserResult<bool>;

    /// All users in insertion order
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Users with the given ids, in the order of `ids`; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[Uuid]) -> UserResult<Vec<User>>;

    /// Append a blog id to the user's `blogs`
    async fn add_blog(&self, user_id: Uuid, blog_id: Uuid) -> UserResult<()>;
}

/// Read access to blog data, used to expand a user's `blogs` ids.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogDirectory: Send + Sync {
    /// Summaries for the given ids, in the order of `ids`; unknown ids are skipped
    async fn summaries(&self, ids: &[Uuid]) -> UserResult<Vec<BlogSummary>>;
}

/// In-memory UserRepository, for development and tests.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(UserError::UsernameTaken);
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.username == username))
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| users.iter().find(|u| u.id == *id).cloned())
            .collect())
    }

    async fn add_blog(&self, user_id: Uuid, blog_id: Uuid) -> UserResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(UserError::NotFound(user_id))?;
        user.blogs.push(blog_id);
        Ok(())
    }
}
