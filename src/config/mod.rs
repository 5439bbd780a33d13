//! # Moderation Configuration
//!
//! Resolved configuration handed to [`ModerationScope`](crate::scopes::ModerationScope)
//! at construction. Core logic never reads configuration sources directly; the
//! [`ConfigLoader`] resolves defaults, an optional file and `MODERATION_*`
//! environment overrides once, and the resulting struct is passed around.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use moderation_core::config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new()
//!     .with_file("config/moderation.toml")
//!     .load()?;
//!
//! assert!(!config.status.approved.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use crate::constants::ModerationStatus;
use serde::{Deserialize, Serialize};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigLoader;

/// Root configuration for moderation scopes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Only approved records are visible by default when true
    pub strict: bool,

    /// Storage labels for each moderation status
    pub status: StatusLabels,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            strict: false,
            status: StatusLabels::default(),
        }
    }
}

impl ModerationConfig {
    /// Strict-mode configuration with default labels
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Validate labels are non-empty and unique
    pub fn validate(&self) -> ConfigResult<()> {
        self.status.validate()
    }
}

/// Mapping between [`ModerationStatus`] and the label stored in the status column
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusLabels {
    pub pending: String,
    pub approved: String,
    pub rejected: String,
    pub postponed: String,
}

impl Default for StatusLabels {
    fn default() -> Self {
        Self {
            pending: ModerationStatus::Pending.to_string(),
            approved: ModerationStatus::Approved.to_string(),
            rejected: ModerationStatus::Rejected.to_string(),
            postponed: ModerationStatus::Postponed.to_string(),
        }
    }
}

impl StatusLabels {
    /// Storage label for a status
    pub fn label(&self, status: ModerationStatus) -> &str {
        match status {
            ModerationStatus::Pending => &self.pending,
            ModerationStatus::Approved => &self.approved,
            ModerationStatus::Rejected => &self.rejected,
            ModerationStatus::Postponed => &self.postponed,
        }
    }

    /// Status for a stored label, if the label is known
    pub fn status_of(&self, label: &str) -> Option<ModerationStatus> {
        ModerationStatus::ALL
            .into_iter()
            .find(|status| self.label(*status) == label)
    }

    fn validate(&self) -> ConfigResult<()> {
        for (index, status) in ModerationStatus::ALL.iter().enumerate() {
            let label = self.label(*status);
            if label.trim().is_empty() {
                return Err(ConfigurationError::InvalidStatusLabel {
                    status: *status,
                    reason: "label must not be empty".to_string(),
                });
            }

            if let Some(other) = ModerationStatus::ALL[index + 1..]
                .iter()
                .find(|other| self.label(**other) == label)
            {
                return Err(ConfigurationError::DuplicateStatusLabel {
                    label: label.to_string(),
                    first: *status,
                    second: *other,
                });
            }
        }
        Ok(())
    }
}
