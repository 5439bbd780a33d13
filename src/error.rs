//! # Moderation Error Types
//!
//! Structured error handling for scopes, transitions and executors using
//! thiserror instead of string-typed variants.

use crate::config::ConfigurationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModerationError {
    /// A single-record transition targeted a key that does not exist
    #[error("Record not found: {table} with key {key}")]
    NotFound { table: String, key: String },

    /// The entity stamps moderated-by but no actor is authenticated
    #[error("No authenticated actor available to moderate {table}")]
    Unauthenticated { table: String },

    /// Where-clauses and where-bindings disagree on how many parameters exist
    #[error("Inconsistent where bindings: clauses consume {position} bindings but {available} are bound")]
    InconsistentBinding { position: usize, available: usize },

    /// The executor cannot run this query shape
    #[error("Unsupported operation: {operation}: {reason}")]
    Unsupported { operation: String, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl ModerationError {
    pub fn not_found(table: impl Into<String>, key: impl ToString) -> Self {
        Self::NotFound {
            table: table.into(),
            key: key.to_string(),
        }
    }

    pub fn unsupported(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModerationError>;
