//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use crate::models::{Category, Comment, NewComment, NewTopic, Topic, User};
use async_trait::async_trait;

/// Data persistence contract for categories, topics, comments, and votes.
#[async_trait]
pub trait ForumRepo: Send + Sync {
    // Category Operations (reference data)
    async fn list_categories(&self) -> anyhow::Result<Vec<Category>>;
    async fn get_category(&self, id: i64) -> anyhow::Result<Option<Category>>;
    async fn get_category_by_code(&self, url_code: &str) -> anyhow::Result<Option<Category>>;
    async fn create_category(&self, name: &str, url_code: &str) -> anyhow::Result<Category>;

    // Topic Operations
    async fn create_topic(&self, topic: NewTopic) -> anyhow::Result<Topic>;
    async fn get_topic(&self, id: i64) -> anyhow::Result<Option<Topic>>;
    /// All topics, newest first.
    async fn list_topics(&self) -> anyhow::Result<Vec<Topic>>;
    async fn list_topics_by_category(
        &self,
        category_id: i64,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Topic>>;
    async fn count_topics_by_category(&self, category_id: i64) -> anyhow::Result<i64>;
    /// Substring match over title and message, newest first.
    async fn search_topics(&self, query: &str) -> anyhow::Result<Vec<Topic>>;

    // Comment Operations
    /// Inserts the comment and assigns its sequential `no` atomically.
    async fn create_comment(&self, comment: NewComment) -> anyhow::Result<Comment>;
    /// Comments of a topic ordered by `no`, each carrying its vote count.
    async fn list_comments(&self, topic_id: i64) -> anyhow::Result<Vec<Comment>>;
    async fn get_comment(&self, topic_id: i64, no: i64) -> anyhow::Result<Option<Comment>>;

    // Vote Operations
    async fn add_vote(&self, comment_id: i64) -> anyhow::Result<()>;

    // User Operations
    async fn get_user_by_name(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn create_user(&self, username: &str, password_hash: &str) -> anyhow::Result<User>;
}

/// Media storage contract for comment image attachments.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Saves raw bytes and returns a media_id for the Comment model.
    async fn save_upload(&self, data: Vec<u8>, content_type: &str) -> anyhow::Result<String>;
    /// Returns the URL or path to the original media.
    fn url(&self, media_id: &str) -> String;
    /// Returns the URL or path to the thumbnail.
    fn thumbnail_url(&self, media_id: &str) -> String;
}

/// Password hashing contract backing the login form.
pub trait AuthProvider: Send + Sync {
    fn hash_password(&self, password: &str) -> anyhow::Result<String>;
    fn verify_password(&self, password: &str, hash: &str) -> bool;
}
