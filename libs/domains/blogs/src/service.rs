use axum_helpers::JwtAuth;
use domain_users::{User, UserRepository};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{BlogError, BlogResult, ONLY_CREATOR_CAN_REMOVE, ONLY_CREATOR_CAN_UPDATE};
use crate::models::{Blog, BlogOwner, BlogResponse, CreateBlog, UpdateBlog};
use crate::policy::BlogPolicy;
use crate::repository::BlogRepository;

/// Blog operations; writes that need a caller take the raw bearer token.
pub struct BlogService<B: BlogRepository, U: UserRepository> {
    blogs: Arc<B>,
    users: Arc<U>,
    auth: JwtAuth,
    policy: BlogPolicy,
}

impl<B: BlogRepository, U: UserRepository> Clone for BlogService<B, U> {
    fn clone(&self) -> Self {
        Self {
            blogs: Arc::clone(&self.blogs),
            users: Arc::clone(&self.users),
            auth: self.auth.clone(),
            policy: self.policy,
        }
    }
}

impl<B: BlogRepository, U: UserRepository> BlogService<B, U> {
    pub fn new(blogs: B, users: U, auth: JwtAuth) -> Self {
        Self::from_shared(Arc::new(blogs), Arc::new(users), auth)
    }

    pub fn from_shared(blogs: Arc<B>, users: Arc<U>, auth: JwtAuth) -> Self {
        Self {
            blogs,
            users,
            auth,
            policy: BlogPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: BlogPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reject a missing or invalid token without touching storage.
    pub fn check_token(&self, token: Option<&str>) -> BlogResult<()> {
        self.auth.verify(token)?;
        Ok(())
    }

    /// The user a token belongs to. A token for a removed user is rejected like a bad one.
    async fn acting_user(&self, token: Option<&str>) -> BlogResult<User> {
        let subject = self.auth.verify(token)?;
        self.users
            .get_by_id(subject.user_id)
            .await?
            .ok_or_else(|| BlogError::Unauthorized("token missing or invalid".to_string()))
    }

    async fn present(&self, blogs: Vec<Blog>) -> BlogResult<Vec<BlogResponse>> {
        let mut owner_ids: Vec<Uuid> = blogs.iter().map(|b| b.user).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let owners: HashMap<Uuid, BlogOwner> = self
            .users
            .find_by_ids(&owner_ids)
            .await?
            .iter()
            .map(|u| (u.id, BlogOwner::from(u)))
            .collect();

        Ok(blogs
            .into_iter()
            .map(|blog| {
                let owner = owners.get(&blog.user).cloned();
                BlogResponse::new(blog, owner)
            })
            .collect())
    }

    async fn present_one(&self, blog: Blog) -> BlogResult<BlogResponse> {
        let owner = self
            .users
            .get_by_id(blog.user)
            .await?
            .map(|u| BlogOwner::from(&u));
        Ok(BlogResponse::new(blog, owner))
    }

    /// All blogs in stored order, each with its creator.
    #[instrument(skip(self))]
    pub async fn list_blogs(&self) -> BlogResult<Vec<BlogResponse>> {
        let blogs = self.blogs.list().await?;
        self.present(blogs).await
    }

    #[instrument(skip(self))]
    pub async fn get_blog(&self, id: Uuid) -> BlogResult<BlogResponse> {
        let blog = self
            .blogs
            .get_by_id(id)
            .await?
            .ok_or(BlogError::NotFound(id))?;
        self.present_one(blog).await
    }

    /// Create a blog owned by the token's user and append it to the user's `blogs`.
    ///
    /// When the append fails the new blog is deleted again.
    #[instrument(skip(self, token, input))]
    pub async fn create_blog(
        &self,
        token: Option<&str>,
        input: CreateBlog,
    ) -> BlogResult<BlogResponse> {
        let subject = self.auth.verify(token)?;
        if input.title.as_deref().is_none_or(str::is_empty)
            || input.url.as_deref().is_none_or(str::is_empty)
        {
            return Err(BlogError::MissingFields);
        }

        let user = self
            .users
            .get_by_id(subject.user_id)
            .await?
            .ok_or_else(|| BlogError::Unauthorized("token missing or invalid".to_string()))?;

        let created = self.blogs.create(input.into_blog(user.id)?).await?;

        if let Err(e) = self.users.add_blog(user.id, created.id).await {
            tracing::error!(blog_id = %created.id, user_id = %user.id, "Linking blog to user failed: {e}");
            match self.blogs.delete(created.id).await {
                Ok(_) => tracing::warn!(blog_id = %created.id, "Unlinked blog removed"),
                Err(cleanup) => {
                    tracing::error!(blog_id = %created.id, "Removing unlinked blog failed: {cleanup}")
                }
            }
            return Err(BlogError::Internal(format!("failed to link blog to user: {e}")));
        }

        tracing::info!(blog_id = %created.id, user_id = %user.id, "Blog created");
        Ok(BlogResponse::new(created, Some(BlogOwner::from(&user))))
    }

    /// Merge `input` into a stored blog. Owner-only when the policy says so.
    #[instrument(skip(self, token, input))]
    pub async fn update_blog(
        &self,
        token: Option<&str>,
        id: Uuid,
        input: UpdateBlog,
    ) -> BlogResult<BlogResponse> {
        let acting = if self.policy.require_owner_for_update {
            Some(self.acting_user(token).await?)
        } else {
            None
        };

        if let Some(user) = acting {
            // a blog's owner never changes after create
            let blog = self
                .blogs
                .get_by_id(id)
                .await?
                .ok_or(BlogError::MalformedId)?;
            if user.id != blog.user {
                return Err(BlogError::NotOwner(ONLY_CREATOR_CAN_UPDATE));
            }
        }

        let updated = self
            .blogs
            .update_fields(id, input)
            .await?
            .ok_or(BlogError::MalformedId)?;
        self.present_one(updated).await
    }

    /// Delete a blog; only its creator may.
    #[instrument(skip(self, token))]
    pub async fn delete_blog(&self, token: Option<&str>, id: Uuid) -> BlogResult<()> {
        let user = self.acting_user(token).await?;

        let blog = self
            .blogs
            .get_by_id(id)
            .await?
            .ok_or(BlogError::MalformedId)?;

        if blog.user != user.id {
            tracing::info!(blog_id = %id, user_id = %user.id, "Rejected delete by non-creator");
            return Err(BlogError::NotOwner(ONLY_CREATOR_CAN_REMOVE));
        }

        if !self.blogs.delete(id).await? {
            return Err(BlogError::MalformedId);
        }

        tracing::info!(blog_id = %id, user_id = %user.id, "Blog deleted");
        Ok(())
    }
}
