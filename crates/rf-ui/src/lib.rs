//! # rf-ui
//!
//! Askama templates for rusty-forum. Presentation only; every struct here
//! is a thin view over rf-core models assembled by the handlers.

use askama::Template;
use chrono::{DateTime, Utc};
use rf_core::forms::{FieldErrors, TopicDraft, TopicFormInput};
use rf_core::models::{Category, Comment, Topic};

/// A topic plus its top-page "new" marker.
pub struct TopicRow {
    pub topic: Topic,
    pub is_new: bool,
}

impl TopicRow {
    pub fn build(topics: Vec<Topic>, now: DateTime<Utc>) -> Vec<TopicRow> {
        topics
            .into_iter()
            .map(|topic| {
                let is_new = topic.is_new(now);
                TopicRow { topic, is_new }
            })
            .collect()
    }
}

/// A comment plus the resolved attachment URLs.
pub struct CommentRow {
    pub comment: Comment,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Template)]
#[template(path = "top.html")]
pub struct TopTemplate<'a> {
    pub topics: &'a [TopicRow],
    pub username: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "detail_topic.html")]
pub struct ThreadTemplate<'a> {
    pub topic: &'a Topic,
    pub comments: &'a [CommentRow],
    pub input: &'a rf_core::forms::CommentFormInput,
    pub errors: &'a FieldErrors,
    pub is_authenticated: bool,
}

#[derive(Template)]
#[template(path = "create_topic.html")]
pub struct CreateTopicTemplate<'a> {
    pub input: &'a TopicFormInput,
    pub errors: &'a FieldErrors,
    pub categories: &'a [Category],
}

#[derive(Template)]
#[template(path = "confirm_topic.html")]
pub struct ConfirmTopicTemplate<'a> {
    pub draft: &'a TopicDraft,
    pub category: &'a Category,
}

#[derive(Template)]
#[template(path = "category.html")]
pub struct CategoryTemplate<'a> {
    pub category: &'a Category,
    pub topics: &'a [TopicRow],
    pub page: i64,
    pub total_pages: i64,
}

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchTemplate<'a> {
    pub query: &'a str,
    pub topics: &'a [TopicRow],
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate<'a> {
    pub error: Option<&'a str>,
}
