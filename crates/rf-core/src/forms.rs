//! # Form Validation
//!
//! Maps raw submitted fields to validated drafts. Two schemas exist per
//! submittable entity: a guest schema (explicit free-text display name) and
//! an authenticated one (name derived from the logged-in user). The schema
//! is resolved once per request from the session, then passed down here —
//! no runtime form-class swapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Category, SessionUser};

/// Prefill for the guest name field on the topic form.
pub const GUEST_TOPIC_NAME: &str = "Anonymous";
/// Prefill for the guest name field on the comment form.
pub const GUEST_COMMENT_NAME: &str = "No Name";

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_NAME_LEN: usize = 30;

/// Which field set applies to the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    Guest,
    Authenticated(SessionUser),
}

impl Schema {
    pub fn for_user(user: Option<SessionUser>) -> Self {
        match user {
            Some(u) => Schema::Authenticated(u),
            None => Schema::Guest,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Schema::Authenticated(_))
    }
}

/// Per-field validation messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    by_field: BTreeMap<&'static str, Vec<String>>,
}

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.by_field.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    /// Messages for one field; empty slice when the field is clean.
    pub fn field(&self, name: &str) -> &[String] {
        self.by_field.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.by_field.iter().map(|(f, msgs)| (*f, msgs.as_slice()))
    }
}

/// Raw topic form fields, exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicFormInput {
    pub title: String,
    pub user_name: String,
    /// Category id as a string; validation resolves it.
    pub category: String,
    pub message: String,
}

impl TopicFormInput {
    /// Empty form with the guest name prefilled and the category
    /// pre-selected from the `categ_id` cookie when present.
    pub fn prefill(categ_id: Option<i64>) -> Self {
        Self {
            user_name: GUEST_TOPIC_NAME.to_string(),
            category: categ_id.map(|id| id.to_string()).unwrap_or_default(),
            ..Self::default()
        }
    }
}

/// A validated, not-yet-persisted topic submission. Exactly the four fields
/// staged in the session between `confirm` and `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDraft {
    pub title: String,
    pub user_name: String,
    pub category: i64,
    pub message: String,
}

impl TopicDraft {
    /// Editable form values for the `back` transition.
    pub fn to_input(&self) -> TopicFormInput {
        TopicFormInput {
            title: self.title.clone(),
            user_name: self.user_name.clone(),
            category: self.category.to_string(),
            message: self.message.clone(),
        }
    }
}

/// Raw comment form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentFormInput {
    pub user_name: String,
    pub message: String,
}

impl CommentFormInput {
    /// Empty form with the guest name prefilled.
    pub fn prefill() -> Self {
        Self { user_name: GUEST_COMMENT_NAME.to_string(), message: String::new() }
    }
}

/// A validated comment submission; the image attachment is handled
/// separately by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub user_name: String,
    pub message: String,
    pub user_id: Option<i64>,
}

fn required(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, "This field is required.");
    }
}

fn max_len(errors: &mut FieldErrors, field: &'static str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(field, format!("Must be at most {max} characters."));
    }
}

/// Validates a topic submission against the schema and the known categories.
pub fn validate_topic(
    schema: &Schema,
    input: &TopicFormInput,
    categories: &[Category],
) -> Result<TopicDraft, FieldErrors> {
    let mut errors = FieldErrors::default();

    required(&mut errors, "title", &input.title);
    max_len(&mut errors, "title", &input.title, MAX_TITLE_LEN);
    required(&mut errors, "message", &input.message);

    let user_name = match schema {
        Schema::Guest => {
            required(&mut errors, "user_name", &input.user_name);
            max_len(&mut errors, "user_name", &input.user_name, MAX_NAME_LEN);
            input.user_name.trim().to_string()
        }
        // The name field is not exposed to logged-in users; whatever was
        // submitted is ignored.
        Schema::Authenticated(user) => user.username.clone(),
    };

    let category = match input.category.trim().parse::<i64>() {
        Ok(id) if categories.iter().any(|c| c.id == id) => Some(id),
        Ok(_) => {
            errors.push("category", "Select a valid category.");
            None
        }
        Err(_) => {
            errors.push("category", "Select a category.");
            None
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(TopicDraft {
        title: input.title.trim().to_string(),
        user_name,
        category: category.unwrap(),
        message: input.message.trim().to_string(),
    })
}

/// Validates a comment submission.
pub fn validate_comment(
    schema: &Schema,
    input: &CommentFormInput,
) -> Result<CommentDraft, FieldErrors> {
    let mut errors = FieldErrors::default();

    required(&mut errors, "message", &input.message);

    let (user_name, user_id) = match schema {
        Schema::Guest => {
            required(&mut errors, "user_name", &input.user_name);
            max_len(&mut errors, "user_name", &input.user_name, MAX_NAME_LEN);
            (input.user_name.trim().to_string(), None)
        }
        Schema::Authenticated(user) => (user.username.clone(), Some(user.id)),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(CommentDraft {
        user_name,
        message: input.message.trim().to_string(),
        user_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category { id: 1, name: "General".into(), url_code: "general".into() },
            Category { id: 2, name: "Tech".into(), url_code: "tech".into() },
        ]
    }

    fn valid_input() -> TopicFormInput {
        TopicFormInput {
            title: "Hello".into(),
            user_name: "Alice".into(),
            category: "2".into(),
            message: "Hi there".into(),
        }
    }

    #[test]
    fn guest_topic_passes_with_all_fields() {
        let draft = validate_topic(&Schema::Guest, &valid_input(), &categories()).unwrap();
        assert_eq!(
            draft,
            TopicDraft {
                title: "Hello".into(),
                user_name: "Alice".into(),
                category: 2,
                message: "Hi there".into(),
            }
        );
    }

    #[test]
    fn guest_topic_requires_name() {
        let input = TopicFormInput { user_name: "  ".into(), ..valid_input() };
        let errors = validate_topic(&Schema::Guest, &input, &categories()).unwrap_err();
        assert_eq!(errors.field("user_name"), ["This field is required."]);
        assert!(errors.field("title").is_empty());
    }

    #[test]
    fn authenticated_topic_derives_name_from_user() {
        let schema = Schema::Authenticated(SessionUser { id: 7, username: "bob".into() });
        let input = TopicFormInput { user_name: "Mallory".into(), ..valid_input() };
        let draft = validate_topic(&schema, &input, &categories()).unwrap();
        assert_eq!(draft.user_name, "bob");
    }

    #[test]
    fn authenticated_topic_skips_name_requirement() {
        let schema = Schema::Authenticated(SessionUser { id: 7, username: "bob".into() });
        let input = TopicFormInput { user_name: String::new(), ..valid_input() };
        assert!(validate_topic(&schema, &input, &categories()).is_ok());
    }

    #[test]
    fn unknown_category_is_rejected() {
        let input = TopicFormInput { category: "99".into(), ..valid_input() };
        let errors = validate_topic(&Schema::Guest, &input, &categories()).unwrap_err();
        assert_eq!(errors.field("category"), ["Select a valid category."]);
    }

    #[test]
    fn non_numeric_category_is_rejected() {
        let input = TopicFormInput { category: "".into(), ..valid_input() };
        let errors = validate_topic(&Schema::Guest, &input, &categories()).unwrap_err();
        assert_eq!(errors.field("category"), ["Select a category."]);
    }

    #[test]
    fn overlong_title_is_rejected() {
        let input = TopicFormInput { title: "x".repeat(MAX_TITLE_LEN + 1), ..valid_input() };
        let errors = validate_topic(&Schema::Guest, &input, &categories()).unwrap_err();
        assert!(!errors.field("title").is_empty());
    }

    #[test]
    fn draft_round_trips_to_editable_input() {
        let draft = validate_topic(&Schema::Guest, &valid_input(), &categories()).unwrap();
        assert_eq!(draft.to_input(), valid_input());
    }

    #[test]
    fn guest_comment_requires_name_and_message() {
        let input = CommentFormInput::default();
        let errors = validate_comment(&Schema::Guest, &input).unwrap_err();
        assert!(!errors.field("user_name").is_empty());
        assert!(!errors.field("message").is_empty());
    }

    #[test]
    fn authenticated_comment_carries_user_id() {
        let schema = Schema::Authenticated(SessionUser { id: 3, username: "carol".into() });
        let input = CommentFormInput { user_name: String::new(), message: "nice".into() };
        let draft = validate_comment(&schema, &input).unwrap();
        assert_eq!(draft.user_id, Some(3));
        assert_eq!(draft.user_name, "carol");
    }

    #[test]
    fn prefill_uses_cookie_category_and_guest_name() {
        let input = TopicFormInput::prefill(Some(2));
        assert_eq!(input.category, "2");
        assert_eq!(input.user_name, GUEST_TOPIC_NAME);
        assert!(input.title.is_empty());
    }
}
