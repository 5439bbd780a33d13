#![allow(dead_code)]

pub mod strategies;

use chrono::{DateTime, TimeZone, Utc};
use moderation_core::constants::columns;
use moderation_core::{MemoryExecutor, Moderatable, ModerationConfig, ModerationScope, Record};

/// Posts record the moderator and follow the global strict setting
pub struct Post;

impl Moderatable for Post {
    fn table_name() -> &'static str {
        "posts"
    }

    fn moderated_by_column() -> Option<&'static str> {
        Some(columns::MODERATED_BY)
    }
}

/// Announcements are always strict and do not record a moderator
pub struct Announcement;

impl Moderatable for Announcement {
    fn table_name() -> &'static str {
        "announcements"
    }

    fn strict_moderation() -> Option<bool> {
        Some(true)
    }
}

/// Comments with a fixed clock, for asserting stamped timestamps
pub struct Comment;

impl Moderatable for Comment {
    fn table_name() -> &'static str {
        "comments"
    }

    fn fresh_timestamp() -> DateTime<Utc> {
        frozen_now()
    }
}

pub fn frozen_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn scope() -> ModerationScope {
    ModerationScope::new(ModerationConfig::default())
}

pub fn strict_scope() -> ModerationScope {
    ModerationScope::new(ModerationConfig::strict())
}

pub fn post(id: i64, category: &str, status: &str) -> Record {
    Record::new()
        .with("id", id)
        .with("category", category)
        .with("status", status)
}

/// Six posts across every status:
///
/// | id | category | status    |
/// |----|----------|-----------|
/// | 1  | news     | approved  |
/// | 2  | news     | pending   |
/// | 3  | news     | rejected  |
/// | 4  | sport    | postponed |
/// | 5  | sport    | pending   |
/// | 6  | news     | pending   |
pub fn seeded_posts() -> MemoryExecutor {
    let executor = MemoryExecutor::new();
    for (id, category, status) in [
        (1, "news", "approved"),
        (2, "news", "pending"),
        (3, "news", "rejected"),
        (4, "sport", "postponed"),
        (5, "sport", "pending"),
        (6, "news", "pending"),
    ] {
        executor.insert("posts", post(id, category, status));
    }
    executor
}

/// Stored row for a post id
pub fn stored_post(executor: &MemoryExecutor, id: i64) -> Option<Record> {
    executor
        .rows("posts")
        .into_iter()
        .find(|row| row.value("id").as_i64() == Some(id))
}
