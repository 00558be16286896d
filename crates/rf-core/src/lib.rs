//! rusty-forum/crates/rf-core/src/lib.rs
//!
//! The central domain logic and interface definitions for rusty-forum.

pub mod error;
pub mod forms;
pub mod models;
pub mod traits;
pub mod workflow;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use chrono::{Duration, Utc};

    #[test]
    fn topic_new_marker_expires_after_an_hour() {
        let now = Utc::now();
        let topic = Topic {
            id: 1,
            title: "Hello".to_string(),
            message: "Hi".to_string(),
            category_id: 1,
            user_id: None,
            user_name: "Alice".to_string(),
            created_at: now - Duration::minutes(30),
        };
        assert!(topic.is_new(now));

        let stale = Topic { created_at: now - Duration::minutes(90), ..topic };
        assert!(!stale.is_new(now));
    }
}
