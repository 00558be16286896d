//! # Topic Creation Workflow
//!
//! The three-step create flow: input → confirm → commit. Validated but
//! unsaved drafts live in server-side session state between steps, so the
//! confirmation page can render a read-only preview without resubmitting
//! every field. Each transition is one request/response cycle; this module
//! holds the pure state machine, the controller interprets the `Outcome`.

use crate::forms::{self, FieldErrors, Schema, TopicDraft, TopicFormInput};
use crate::models::Category;

/// The `next` discriminator submitted with the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Confirm,
    Back,
    Create,
}

impl Step {
    /// `None` for anything the UI never sends; the controller rejects it.
    pub fn parse(raw: &str) -> Option<Step> {
        match raw {
            "confirm" => Some(Step::Confirm),
            "back" => Some(Step::Back),
            "create" => Some(Step::Create),
            _ => None,
        }
    }
}

/// What the controller must do after one transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Stage the draft in the session and render the read-only preview.
    Stage(TopicDraft),
    /// Validation failed: re-render the editable form with field errors.
    Reject {
        input: TopicFormInput,
        errors: FieldErrors,
    },
    /// `back` with a staged draft: re-render the editable form from it.
    /// The staged draft stays in place.
    Rehydrate(TopicDraft),
    /// `back` with nothing staged: render a fresh form.
    StartOver,
    /// Persist the draft, clear the session entry, redirect to the top
    /// page, and remember the category in the `categ_id` cookie.
    Commit(TopicDraft),
    /// `create` with nothing staged: create nothing, redirect to the top
    /// page. Logged by the controller; never reachable from the shipped UI.
    NothingToCommit,
}

/// Advances the workflow by one step.
pub fn advance(
    step: Step,
    staged: Option<TopicDraft>,
    schema: &Schema,
    input: &TopicFormInput,
    categories: &[Category],
) -> Outcome {
    match step {
        Step::Confirm => match forms::validate_topic(schema, input, categories) {
            Ok(draft) => Outcome::Stage(draft),
            Err(errors) => Outcome::Reject { input: input.clone(), errors },
        },
        Step::Back => match staged {
            Some(draft) => Outcome::Rehydrate(draft),
            None => Outcome::StartOver,
        },
        Step::Create => match staged {
            Some(draft) => Outcome::Commit(draft),
            None => Outcome::NothingToCommit,
        },
    }
}
