#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Moderation Core
//!
//! Status-based content moderation as a query scope.
//!
//! ## Overview
//!
//! Entities that opt into moderation carry a status column (pending, approved,
//! rejected or postponed), a moderated-at timestamp and optionally a
//! moderated-by actor. Every query built through the scope hides content that
//! has not been approved, modifiers widen or narrow that visibility, and
//! transitions move records between statuses one at a time or in bulk.
//!
//! ## Module Organization
//!
//! - [`scopes`] - default visibility predicate, modifiers and transitions
//! - [`query_builder`] - SQL builder with positional where-bindings
//! - [`database`] - executors the scopes run against (PostgreSQL, in-memory)
//! - [`models`] - the [`Moderatable`] trait and loaded [`Record`]s
//! - [`auth`] - resolution of the acting moderator
//! - [`config`] - strict mode and status labels
//! - [`constants`] - [`ModerationStatus`] and default column names
//! - [`error`] - structured error handling
//! - [`logging`] - tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust
//! use moderation_core::{
//!     CurrentActor, MemoryExecutor, Moderatable, ModerationConfig, ModerationScope, Record,
//! };
//!
//! struct Post;
//!
//! impl Moderatable for Post {
//!     fn table_name() -> &'static str {
//!         "posts"
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let executor = MemoryExecutor::new();
//! executor.insert("posts", Record::new().with("id", 1).with("status", "pending"));
//! executor.insert("posts", Record::new().with("id", 2).with("status", "rejected"));
//!
//! let scope = ModerationScope::new(ModerationConfig::default());
//! assert_eq!(scope.query::<Post>().count(&executor).await?, 1);
//!
//! scope
//!     .query::<Post>()
//!     .approve(&executor, &CurrentActor::anonymous(), Some(1.into()))
//!     .await?;
//! assert_eq!(scope.query::<Post>().rejected()?.count(&executor).await?, 1);
//! # Ok::<(), moderation_core::ModerationError>(())
//! # }).unwrap();
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests; the PgExecutor suite needs DATABASE_URL
//! ```

pub mod auth;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod query_builder;
pub mod scopes;

pub use auth::{ActorId, ActorResolver, CurrentActor};
pub use config::{ConfigLoader, ConfigurationError, ModerationConfig, StatusLabels};
pub use constants::ModerationStatus;
pub use database::{MemoryExecutor, PgExecutor, QueryExecutor};
pub use error::{ModerationError, Result};
pub use logging::init_structured_logging;
pub use models::{Moderatable, Record};
pub use query_builder::{BindValue, QueryBuilder, WhereClause};
pub use scopes::{ModeratedQuery, ModerationScope, TransitionOutcome};
