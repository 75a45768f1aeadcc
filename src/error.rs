//! Error types for envguard
//!
//! This module defines the error hierarchy used throughout the crate.
//! Validation problems, capability faults and isolation violations are kept
//! apart so callers can decide which ones they are able to recover from.

use crate::issue::{ErrorReport, Issue};
use thiserror::Error;

/// Errors surfaced by [`load_env`](crate::load_env)
#[derive(Error, Debug)]
pub enum EnvError {
    /// One or more variables failed validation. Carries every issue found.
    #[error("Invalid environment variables: {0}")]
    ValidationFailed(ErrorReport),

    /// A server-only value was read from a client context.
    #[error(
        "Attempted to access server-side environment variable{} from a client context",
        describe_field(.field.as_deref())
    )]
    ForbiddenAccess { field: Option<String> },

    /// The public prefix cannot safely select client variables.
    #[error("Invalid public prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    /// The validator itself failed; this is never a data problem.
    #[error("Unexpected error while parsing env: {0:#}")]
    Fault(#[source] anyhow::Error),
}

impl EnvError {
    /// The aggregated report, when this is a validation failure
    pub fn report(&self) -> Option<&ErrorReport> {
        match self {
            EnvError::ValidationFailed(report) => Some(report),
            _ => None,
        }
    }

    /// Create a forbidden-access error for a named field
    pub fn forbidden(field: impl Into<String>) -> Self {
        EnvError::ForbiddenAccess {
            field: Some(field.into()),
        }
    }
}

fn describe_field(field: Option<&str>) -> String {
    match field {
        Some(name) => format!(" '{}'", name),
        None => String::new(),
    }
}

/// Outcome of a single validator run that did not produce a value
#[derive(Error, Debug)]
pub enum ValidateError {
    #[error("{} validation issue(s)", .0.len())]
    Invalid(Vec<Issue>),

    #[error(transparent)]
    Fault(#[from] anyhow::Error),
}

impl ValidateError {
    /// Shorthand for a failure with a single issue on one field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidateError::Invalid(vec![Issue::new(field, message)])
    }
}

/// Problems with a schema definition document
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to parse schema document: {0}")]
    Parse(String),

    #[error("Invalid schema: {message}")]
    Invalid { message: String },

    #[error("Invalid definition for field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Invalid regex pattern '{pattern}' for field '{field}': {reason}")]
    InvalidPattern {
        field: String,
        pattern: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration-related errors for the command line settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for loader operations
pub type EnvResult<T> = std::result::Result<T, EnvError>;
