//! # AppError
//!
//! Centralized error handling for the rusty-forum ecosystem.

use thiserror::Error;

/// The primary error type for all rf-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Topic, Category, Comment)
    #[error("{0} not found: {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., missing title, unknown category)
    #[error("validation error: {0}")]
    Validation(String),

    /// Auth failure (e.g., bad credentials)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Infrastructure failure (e.g., DB down)
    #[error("internal service error: {0}")]
    Internal(String),

    /// Resource already exists (e.g., duplicate category slug)
    #[error("conflict: {0}")]
    Conflict(String),
}

/// A specialized Result type for rusty-forum logic.
pub type Result<T> = std::result::Result<T, AppError>;
