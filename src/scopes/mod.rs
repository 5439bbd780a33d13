//! # Moderation Scopes
//!
//! Query-level moderation for entities implementing
//! [`Moderatable`](crate::models::Moderatable).
//!
//! ## Architecture
//!
//! - [`ModerationScope`]: installs the default visibility predicate and strips
//!   moderation constraints while keeping positional bindings aligned
//! - [`ModeratedQuery`]: chainable query over one entity with visibility
//!   modifiers, reads, delete interception and the approve / reject / postpone
//!   transitions
//!
//! ## Usage Patterns
//!
//! ### Visibility
//! ```rust
//! use moderation_core::config::ModerationConfig;
//! use moderation_core::models::Moderatable;
//! use moderation_core::scopes::ModerationScope;
//!
//! struct Post;
//!
//! impl Moderatable for Post {
//!     fn table_name() -> &'static str {
//!         "posts"
//!     }
//! }
//!
//! let scope = ModerationScope::new(ModerationConfig::default());
//!
//! let visible = scope.query::<Post>();
//! assert_eq!(
//!     visible.query().to_debug_sql(),
//!     "SELECT * FROM posts WHERE posts.status IN ('approved', 'pending')"
//! );
//!
//! let review_queue = scope.query::<Post>().where_eq("category", "news").pending()?;
//! assert_eq!(
//!     review_queue.query().to_debug_sql(),
//!     "SELECT * FROM posts WHERE category = 'news' AND status = 'pending'"
//! );
//! # Ok::<(), moderation_core::ModerationError>(())
//! ```
//!
//! ### Transitions
//! ```rust,no_run
//! use moderation_core::auth::CurrentActor;
//! use moderation_core::config::ModerationConfig;
//! use moderation_core::database::PgExecutor;
//! use moderation_core::models::Moderatable;
//! use moderation_core::scopes::ModerationScope;
//!
//! struct Post;
//!
//! impl Moderatable for Post {
//!     fn table_name() -> &'static str {
//!         "posts"
//!     }
//!
//!     fn moderated_by_column() -> Option<&'static str> {
//!         Some("moderated_by")
//!     }
//! }
//!
//! # async fn example(executor: &PgExecutor) -> moderation_core::Result<()> {
//! let scope = ModerationScope::new(ModerationConfig::default());
//! let moderator = CurrentActor::authenticated(7);
//!
//! // one record by key
//! let approved = scope
//!     .query::<Post>()
//!     .approve(executor, &moderator, Some(5.into()))
//!     .await?;
//!
//! // every pending post in a category
//! let rejected = scope
//!     .query::<Post>()
//!     .where_eq("category", "spam")
//!     .pending()?
//!     .reject(executor, &moderator, None)
//!     .await?;
//! println!("{} rejected", rejected.affected());
//! # let _ = approved;
//! # Ok(())
//! # }
//! ```

pub mod moderated_query;
pub mod moderation;

pub use moderated_query::{ModeratedQuery, TransitionOutcome};
pub use moderation::ModerationScope;
