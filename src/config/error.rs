use crate::constants::ModerationStatus;
use thiserror::Error;

/// Configuration loading and validation failures
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid label for status {status}: {reason}")]
    InvalidStatusLabel {
        status: ModerationStatus,
        reason: String,
    },

    #[error("Status label '{label}' is used by both {first} and {second}")]
    DuplicateStatusLabel {
        label: String,
        first: ModerationStatus,
        second: ModerationStatus,
    },
}

pub type ConfigResult<T> = Result<T, ConfigurationError>;
