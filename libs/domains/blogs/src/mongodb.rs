//! MongoDB implementation of BlogRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{Document, doc},
    options::ReturnDocument,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{BlogError, BlogResult};
use crate::models::{Blog, UpdateBlog};
use crate::repository::BlogRepository;

/// Stored shape of a blog; ids are kept as hyphenated strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlogDocument {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    url: String,
    #[serde(default)]
    likes: i64,
    user: String,
}

impl From<&Blog> for BlogDocument {
    fn from(blog: &Blog) -> Self {
        Self {
            id: blog.id.to_string(),
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
            likes: blog.likes,
            user: blog.user.to_string(),
        }
    }
}

impl TryFrom<BlogDocument> for Blog {
    type Error = BlogError;

    fn try_from(doc: BlogDocument) -> Result<Self, Self::Error> {
        let parse = |raw: &str| {
            Uuid::parse_str(raw)
                .map_err(|e| BlogError::Database(format!("corrupt id {raw:?} in blogs: {e}")))
        };

        Ok(Blog {
            id: parse(&doc.id)?,
            user: parse(&doc.user)?,
            title: doc.title,
            author: doc.author,
            url: doc.url,
            likes: doc.likes,
        })
    }
}

/// `$set` body holding only the fields an update actually changes
fn set_document(update: UpdateBlog) -> Document {
    let mut set = Document::new();
    if let Some(title) = update.title.filter(|s| !s.is_empty()) {
        set.insert("title", title);
    }
    if let Some(author) = update.author.filter(|s| !s.is_empty()) {
        set.insert("author", author);
    }
    if let Some(url) = update.url.filter(|s| !s.is_empty()) {
        set.insert("url", url);
    }
    if let Some(likes) = update.likes.filter(|l| *l != 0) {
        set.insert("likes", likes);
    }
    set
}

fn id_filter(id: Uuid) -> Document {
    doc! { "_id": id.to_string() }
}

/// MongoDB implementation of the BlogRepository
#[derive(Clone)]
pub struct MongoBlogRepository {
    collection: Collection<BlogDocument>,
}

impl MongoBlogRepository {
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, "blogs")
    }

    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<BlogDocument>(collection_name),
        }
    }

    async fn find_many(&self, filter: Document) -> BlogResult<Vec<Blog>> {
        let cursor = self.collection.find(filter).sort(doc! { "_id": 1 }).await?;
        let docs: Vec<BlogDocument> = cursor.try_collect().await?;
        docs.into_iter().map(Blog::try_from).collect()
    }
}

#[async_trait]
impl BlogRepository for MongoBlogRepository {
    #[instrument(skip(self, blog), fields(title = %blog.title))]
    async fn create(&self, blog: Blog) -> BlogResult<Blog> {
        self.collection.insert_one(BlogDocument::from(&blog)).await?;

        tracing::info!(blog_id = %blog.id, user_id = %blog.user, "Blog created successfully");
        Ok(blog)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> BlogResult<Option<Blog>> {
        self.collection
            .find_one(id_filter(id))
            .await?
            .map(Blog::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self) -> BlogResult<Vec<Blog>> {
        // UUIDv7 ids sort by creation time
        self.find_many(doc! {}).await
    }

    #[instrument(skip(self, update))]
    async fn update_fields(&self, id: Uuid, update: UpdateBlog) -> BlogResult<Option<Blog>> {
        let set = set_document(update);
        if set.is_empty() {
            return self.get_by_id(id).await;
        }

        let updated = self
            .collection
            .find_one_and_update(id_filter(id), doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!(blog_id = %id, "Blog updated successfully");
        }
        updated.map(Blog::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> BlogResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(blog_id = %id, "Blog deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[Uuid]) -> BlogResult<Vec<Blog>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let keys: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let found = self.find_many(doc! { "_id": { "$in": keys } }).await?;

        Ok(ids
            .iter()
            .filter_map(|id| found.iter().find(|b| b.id == *id).cloned())
            .collect())
    }
}
