//! # Query Builder
//!
//! A deliberately small SQL builder that the moderation scopes extend. It is
//! not a general ORM: it carries selects, joins, where-clauses with positional
//! bindings, ordering and pagination, and renders SELECT / COUNT / UPDATE /
//! DELETE statements for PostgreSQL.
//!
//! ## Key Components
//!
//! - [`builder`] - [`QueryBuilder`] and statement rendering
//! - [`conditions`] - [`WhereClause`] kinds and their binding arity
//! - [`joins`] - JOIN clauses
//! - [`pagination`] - LIMIT/OFFSET
//! - [`value`] - [`BindValue`] parameters
//!
//! ## Positional Bindings
//!
//! Clause values are stored apart from the clauses, in one ordered list per
//! query. Removing a clause therefore means removing its bindings too, at the
//! position given by the binding counts of the clauses before it:
//!
//! ```rust
//! use moderation_core::query_builder::{BindValue, QueryBuilder};
//!
//! let mut query = QueryBuilder::new("posts")
//!     .where_eq("category", "x")
//!     .where_eq("status", "approved")
//!     .where_op("views", ">", 10);
//!
//! query.remove_where(1);
//! query.remove_where_binding(1);
//!
//! assert_eq!(query.build_sql(), "SELECT * FROM posts WHERE category = $1 AND views > $2");
//! assert_eq!(query.where_bindings(), &[BindValue::from("x"), BindValue::from(10)]);
//! ```

pub mod builder;
pub mod conditions;
pub mod joins;
pub mod pagination;
pub mod value;

pub use builder::{Assignment, DeleteHook, OrderBy, QueryBuilder, SortDirection};
pub use conditions::WhereClause;
pub use joins::{Join, JoinType};
pub use pagination::Pagination;
pub use value::BindValue;
