//! # Database Operations
//!
//! Storage access for moderated queries.
//!
//! ## Key Components
//!
//! - [`executor`] - the [`QueryExecutor`] trait the scopes run against
//! - [`postgres`] - [`PgExecutor`], SQLx over a PostgreSQL pool
//! - [`memory`] - [`MemoryExecutor`], rows held in process
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use moderation_core::database::{PgExecutor, QueryExecutor};
//! use moderation_core::query_builder::QueryBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = PgExecutor::connect("postgresql://localhost/moderation_development").await?;
//! let pending = executor
//!     .count(&QueryBuilder::new("posts").where_eq("status", "pending"))
//!     .await?;
//! println!("{pending} posts awaiting review");
//! # Ok(())
//! # }
//! ```

pub mod executor;
pub mod memory;
pub mod postgres;

pub use executor::QueryExecutor;
pub use memory::MemoryExecutor;
pub use postgres::PgExecutor;
