//! # Moderation Constants
//!
//! Status enum and default column names shared by scopes, executors and
//! configuration. Storage labels for each status come from
//! [`StatusLabels`](crate::config::StatusLabels), not from this module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default column names used by [`Moderatable`](crate::models::Moderatable)
pub mod columns {
    pub const PRIMARY_KEY: &str = "id";
    pub const STATUS: &str = "status";
    pub const MODERATED_AT: &str = "moderated_at";
    /// Conventional moderator column for entities that opt into recording one
    pub const MODERATED_BY: &str = "moderated_by";
}

/// Moderation status of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    /// Awaiting a moderation decision
    Pending,
    /// Visible to everyone
    Approved,
    /// Hidden unless explicitly requested
    Rejected,
    /// Decision deferred
    Postponed,
}

impl ModerationStatus {
    pub const ALL: [ModerationStatus; 4] = [
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::Postponed,
    ];

    /// Check if records in this status are visible by default (non-strict)
    pub fn is_visible_by_default(&self) -> bool {
        matches!(self, Self::Approved | Self::Pending)
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
            Self::Postponed => write!(f, "postponed"),
        }
    }
}

impl std::str::FromStr for ModerationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "postponed" => Ok(Self::Postponed),
            _ => Err(format!("Invalid moderation status: {s}")),
        }
    }
}
