//! # Moderatable Entities
//!
//! Column metadata for entity types whose rows carry a moderation status.
//!
//! Schema is the host application's concern. With the default columns a
//! PostgreSQL table looks like:
//!
//! ```sql
//! CREATE TABLE posts (
//!     id           BIGSERIAL PRIMARY KEY,
//!     status       TEXT NOT NULL DEFAULT 'pending',
//!     moderated_at TIMESTAMPTZ,
//!     moderated_by BIGINT,
//!     -- entity columns
//!     category     TEXT
//! );
//! CREATE INDEX index_posts_on_status ON posts (status);
//! ```

use crate::constants::columns;
use chrono::{DateTime, Utc};

/// An entity type subject to moderation
///
/// Only [`Moderatable::table_name`] is required; the rest default to the
/// conventional `id` / `status` / `moderated_at` columns, no moderated-by
/// column and no strict-mode override.
///
/// ```rust
/// use moderation_core::constants::columns;
/// use moderation_core::models::Moderatable;
///
/// struct Post;
///
/// impl Moderatable for Post {
///     fn table_name() -> &'static str {
///         "posts"
///     }
///
///     fn moderated_by_column() -> Option<&'static str> {
///         Some(columns::MODERATED_BY)
///     }
/// }
///
/// assert_eq!(Post::qualified_status_column(), "posts.status");
/// ```
pub trait Moderatable {
    fn table_name() -> &'static str;

    fn key_name() -> &'static str {
        columns::PRIMARY_KEY
    }

    fn qualified_key_name() -> String {
        format!("{}.{}", Self::table_name(), Self::key_name())
    }

    fn status_column() -> &'static str {
        columns::STATUS
    }

    fn qualified_status_column() -> String {
        format!("{}.{}", Self::table_name(), Self::status_column())
    }

    fn moderated_at_column() -> &'static str {
        columns::MODERATED_AT
    }

    /// Column storing the acting moderator; `None` disables actor stamping
    fn moderated_by_column() -> Option<&'static str> {
        None
    }

    /// Per-entity strict mode; `None` falls back to the global setting
    fn strict_moderation() -> Option<bool> {
        None
    }

    /// Timestamp written to moderated-at
    fn fresh_timestamp() -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Article;

    impl Moderatable for Article {
        fn table_name() -> &'static str {
            "articles"
        }

        fn status_column() -> &'static str {
            "review_state"
        }
    }

    #[test]
    fn test_default_columns() {
        assert_eq!(Article::key_name(), "id");
        assert_eq!(Article::qualified_key_name(), "articles.id");
        assert_eq!(Article::moderated_at_column(), "moderated_at");
        assert_eq!(Article::moderated_by_column(), None);
        assert_eq!(Article::strict_moderation(), None);
    }

    #[test]
    fn test_overridden_status_column_is_qualified() {
        assert_eq!(Article::qualified_status_column(), "articles.review_state");
    }
}
