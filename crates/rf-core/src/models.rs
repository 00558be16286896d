//! # Domain Models
//!
//! The core entities of rusty-forum. Primary keys are `i64` rowids because
//! the public contract (the `categ_id` cookie, the per-topic comment `no`)
//! is defined over small integers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A named grouping of Topics, addressable by a URL-safe slug.
/// Reference data; created out of band by the `seed` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// The URL slug (e.g., "general" for /category/general)
    pub url_code: String,
}

/// A forum thread: title, body, and the category it lives in.
/// Created once; never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub category_id: i64,
    /// `None` for guest authors; guests are identified only by `user_name`.
    pub user_id: Option<i64>,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

impl Topic {
    /// Topics younger than an hour get a "new" marker on the top page.
    pub fn is_new(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at <= Duration::hours(1)
    }
}

/// A reply attached to a Topic, numbered sequentially within it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub topic_id: i64,
    /// Sequential display number, unique within the topic, starting at 1.
    pub no: i64,
    pub message: String,
    /// Media id of the optional image attachment, resolved by a `MediaStore`.
    pub image: Option<String>,
    pub user_id: Option<i64>,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
    /// Aggregated vote count, filled in by the repository when listing.
    pub vote_count: i64,
}

/// An endorsement attached to a Comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub id: i64,
    pub comment_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A registered account. Guests never appear in this table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string, produced and checked by an `AuthProvider`.
    pub password_hash: String,
}

/// The slice of a logged-in user carried in session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
}

/// Field values for a Topic insert.
#[derive(Debug, Clone)]
pub struct NewTopic {
    pub title: String,
    pub message: String,
    pub category_id: i64,
    pub user_id: Option<i64>,
    pub user_name: String,
}

/// Field values for a Comment insert. The sequential `no` is assigned by
/// the repository, atomically with the insert.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub topic_id: i64,
    pub message: String,
    pub image: Option<String>,
    pub user_id: Option<i64>,
    pub user_name: String,
}
