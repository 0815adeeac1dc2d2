//! Blog lookups for the users domain

use async_trait::async_trait;
use domain_users::{BlogDirectory, BlogSummary, UserResult};
use uuid::Uuid;

use crate::mongodb::MongoBlogRepository;
use crate::repository::{BlogRepository, InMemoryBlogRepository};

async fn summaries<R: BlogRepository>(repo: &R, ids: &[Uuid]) -> UserResult<Vec<BlogSummary>> {
    let blogs = repo.find_by_ids(ids).await?;
    Ok(blogs.into_iter().map(BlogSummary::from).collect())
}

#[async_trait]
impl BlogDirectory for MongoBlogRepository {
    async fn summaries(&self, ids: &[Uuid]) -> UserResult<Vec<BlogSummary>> {
        summaries(self, ids).await
    }
}

#[async_trait]
impl BlogDirectory for InMemoryBlogRepository {
    async fn summaries(&self, ids: &[Uuid]) -> UserResult<Vec<BlogSummary>> {
        summaries(self, ids).await
    }
}
