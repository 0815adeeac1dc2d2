//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

/// Stored shape of a user; ids are kept as hyphenated strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: String,
    username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    password_hash: String,
    adult: bool,
    #[serde(default)]
    blogs: Vec<String>,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            name: user.name.clone(),
            password_hash: user.password_hash.clone(),
            adult: user.adult,
            blogs: user.blogs.iter().map(Uuid::to_string).collect(),
        }
    }
}

impl TryFrom<UserDocument> for User {
    type Error = UserError;

    fn try_from(doc: UserDocument) -> Result<Self, Self::Error> {
        let parse = |raw: &str| {
            Uuid::parse_str(raw)
                .map_err(|e| UserError::Database(format!("corrupt id {raw:?} in users: {e}")))
        };

        Ok(User {
            id: parse(&doc.id)?,
            username: doc.username,
            name: doc.name,
            password_hash: doc.password_hash,
            adult: doc.adult,
            blogs: doc
                .blogs
                .iter()
                .map(|raw| parse(raw))
                .collect::<UserResult<_>>()?,
        })
    }
}

fn id_filter(id: Uuid) -> Document {
    doc! { "_id": id.to_string() }
}

/// MongoDB implementation of the UserRepository
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// ```ignore
    /// let db = client.database("bloglist");
    /// let repo = MongoUserRepository::new(db);
    /// repo.create_indexes().await?;
    /// ```
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, "users")
    }

    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<UserDocument>(collection_name),
        }
    }

    /// Unique index on `username`.
    pub async fn create_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    async fn find_many(&self, filter: Document) -> UserResult<Vec<User>> {
        let cursor = self.collection.find(filter).sort(doc! { "_id": 1 }).await?;
        let docs: Vec<UserDocument> = cursor.try_collect().await?;
        docs.into_iter().map(User::try_from).collect()
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create(&self, user: User) -> UserResult<User> {
        self.collection.insert_one(UserDocument::from(&user)).await?;

        tracing::info!(user_id = %user.id, "User created successfully");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        self.collection
            .find_one(id_filter(id))
            .await?
            .map(User::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>> {
        self.collection
            .find_one(doc! { "username": username })
            .await?
            .map(User::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn exists_by_username(&self, username: &str) -> UserResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "username": username })
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> UserResult<Vec<User>> {
        // UUIDv7 ids sort by creation time
        self.find_many(doc! {}).await
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[Uuid]) -> UserResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let keys: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let found = self.find_many(doc! { "_id": { "$in": keys } }).await?;

        Ok(ids
            .iter()
            .filter_map(|id| found.iter().find(|u| u.id == *id).cloned())
            .collect())
    }

    #[instrument(skip(self))]
    async fn add_blog(&self, user_id: Uuid, blog_id: Uuid) -> UserResult<()> {
        let result = self
            .collection
            .update_one(
                id_filter(user_id),
                doc! { "$push": { "blogs": blog_id.to_string() } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(UserError::NotFound(user_id));
        }

        tracing::info!(%user_id, %blog_id, "Blog linked to user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_round_trip_keeps_blog_order() {
        let mut user = User::new("root", Some("Superuser".into()), "hash", false);
        user.blogs = vec![Uuid::now_v7(), Uuid::now_v7()];

        let doc = UserDocument::from(&user);
        assert_eq!(doc.id, user.id.to_string());
        assert_eq!(User::try_from(doc).unwrap(), user);
    }

    #[test]
    fn test_corrupt_id_is_a_database_error() {
        let doc = UserDocument {
            id: "not-a-uuid".into(),
            username: "root".into(),
            name: None,
            password_hash: "hash".into(),
            adult: true,
            blogs: vec![],
        };
        assert!(matches!(User::try_from(doc), Err(UserError::Database(_))));
    }
}
