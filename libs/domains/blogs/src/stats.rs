//! Aggregates over a list of blogs

use serde::Serialize;
use uuid::Uuid;

use crate::models::Blog;

/// A blog without its id and url
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteBlog {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub likes: i64,
    pub user: Uuid,
}

impl From<&Blog> for FavoriteBlog {
    fn from(blog: &Blog) -> Self {
        Self {
            title: blog.title.clone(),
            author: blog.author.clone(),
            likes: blog.likes,
            user: blog.user,
        }
    }
}

/// Sum of likes, saturating at the `i64` bounds.
pub fn total_likes(blogs: &[Blog]) -> i64 {
    blogs.iter().fold(0i64, |sum, b| sum.saturating_add(b.likes))
}

/// The most liked blog; the earliest one wins a tie. `None` for an empty slice.
pub fn favorite_blog(blogs: &[Blog]) -> Option<FavoriteBlog> {
    blogs
        .iter()
        .reduce(|best, b| if b.likes > best.likes { b } else { best })
        .map(FavoriteBlog::from)
}
