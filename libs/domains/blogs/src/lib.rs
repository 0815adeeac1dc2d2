//! Blogs Domain
//!
//! Blog CRUD where creating and deleting need a bearer token, and deleting is
//! limited to the blog's creator. Also provides the users domain's `BlogDirectory`
//! and the `total_likes` / `favorite_blog` aggregates.
//!
//! ```rust,ignore
//! use domain_blogs::{handlers, mongodb::MongoBlogRepository, service::BlogService};
//!
//! let blogs = Arc::new(MongoBlogRepository::new(db.clone()));
//! let service = BlogService::from_shared(blogs, users, jwt_auth).with_policy(policy);
//! let router = handlers::router(service);
//! ```

pub mod directory;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod policy;
pub mod repository;
pub mod service;
pub mod stats;

pub use error::{BlogError, BlogResult};
pub use handlers::ApiDoc;
pub use models::{Blog, BlogOwner, BlogResponse, CreateBlog, UpdateBlog};
pub use policy::BlogPolicy;
pub use repository::{BlogRepository, InMemoryBlogRepository};
pub use service::BlogService;
pub use stats::{FavoriteBlog, favorite_blog, total_likes};
