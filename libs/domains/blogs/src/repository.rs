use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::BlogResult;
use crate::models::{Blog, UpdateBlog};

/// Repository trait for Blog persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn create(&self, blog: Blog) -> BlogResult<Blog>;

    async fn get_by_id(&self, id: Uuid) -> BlogResult<Option<Blog>>;

    /// All blogs in insertion order
    async fn list(&self) -> BlogResult<Vec<Blog>>;

    /// Merge the non-empty fields of `update` into the stored blog in one step.
    /// Returns the blog as stored afterwards, or None when `id` matches nothing.
    async fn update_fields(&self, id: Uuid, update: UpdateBlog) -> BlogResult<Option<Blog>>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: Uuid) -> BlogResult<bool>;

    /// Blogs with the given ids, in the order of `ids`; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[Uuid]) -> BlogResult<Vec<Blog>>;
}

/// In-memory BlogRepository, for development and tests.
#[derive(Clone, Default)]
pub struct InMemoryBlogRepository {
    blogs: Arc<RwLock<Vec<Blog>>>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn create(&self, blog: Blog) -> BlogResult<Blog> {
        self.blogs.write().await.push(blog.clone());
        Ok(blog)
    }

    async fn get_by_id(&self, id: Uuid) -> BlogResult<Option<Blog>> {
        let blogs = self.blogs.read().await;
        Ok(blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn list(&self) -> BlogResult<Vec<Blog>> {
        Ok(self.blogs.read().await.clone())
    }

    async fn update_fields(&self, id: Uuid, update: UpdateBlog) -> BlogResult<Option<Blog>> {
        let mut blogs = self.blogs.write().await;
        Ok(blogs.iter_mut().find(|b| b.id == id).map(|stored| {
            stored.apply_update(update);
            stored.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> BlogResult<bool> {
        let mut blogs = self.blogs.write().await;
        let before = blogs.len();
        blogs.retain(|b| b.id != id);
        Ok(blogs.len() < before)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> BlogResult<Vec<Blog>> {
        let blogs = self.blogs.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| blogs.iter().find(|b| b.id == *id).cloned())
            .collect())
    }
}
