use domain_users::{BlogSummary, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{BlogError, BlogResult};

/// Blog entry owned by the user that created it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    /// Id of the creating user
    pub user: Uuid,
}

impl Blog {
    pub fn new(title: impl Into<String>, url: impl Into<String>, user: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            author: None,
            url: url.into(),
            likes: 0,
            user,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_likes(mut self, likes: i64) -> Self {
        self.likes = likes;
        self
    }

    /// Merge an update: empty strings and zero likes leave the stored value alone.
    pub fn apply_update(&mut self, update: UpdateBlog) {
        if let Some(title) = update.title.filter(|s| !s.is_empty()) {
            self.title = title;
        }
        if let Some(author) = update.author.filter(|s| !s.is_empty()) {
            self.author = Some(author);
        }
        if let Some(url) = update.url.filter(|s| !s.is_empty()) {
            self.url = url;
        }
        if let Some(likes) = update.likes.filter(|l| *l != 0) {
            self.likes = likes;
        }
    }
}

impl From<Blog> for BlogSummary {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
        }
    }
}

/// DTO for creating a new blog
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateBlog {
    #[schema(example = "Go To Statement Considered Harmful")]
    pub title: Option<String>,
    #[schema(example = "Edsger W. Dijkstra")]
    pub author: Option<String>,
    #[schema(example = "https://homepages.cwi.nl/~storm/teaching/reader/Dijkstra68.pdf")]
    pub url: Option<String>,
    /// Defaults to 0
    pub likes: Option<i64>,
}

impl CreateBlog {
    /// Build the blog for `owner`; `title` and `url` must be present and non-empty.
    pub fn into_blog(self, owner: Uuid) -> BlogResult<Blog> {
        let title = self.title.filter(|s| !s.is_empty());
        let url = self.url.filter(|s| !s.is_empty());
        let (Some(title), Some(url)) = (title, url) else {
            return Err(BlogError::MissingFields);
        };

        let mut blog = Blog::new(title, url, owner).with_likes(self.likes.unwrap_or(0));
        blog.author = self.author;
        Ok(blog)
    }
}

/// DTO for updating a blog; every field is optional
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBlog {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Public fields of the user who created a blog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BlogOwner {
    pub id: Uuid,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&User> for BlogOwner {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
        }
    }
}

/// Blog as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BlogResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    /// `null` when the creating user no longer exists
    pub user: Option<BlogOwner>,
}

impl BlogResponse {
    pub fn new(blog: Blog, user: Option<BlogOwner>) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            user,
        }
    }
}
