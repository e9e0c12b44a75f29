//! Parameter-safe SQL fragments.
//!
//! Two pure builders turn sparse, caller-supplied input into SQL text plus an
//! ordered parameter list:
//!
//! - [`partial_update`] renders the `SET` list of a partial update.
//! - [`compose_filters`] renders the `WHERE` body of a filtered search.
//!
//! Both return a [`Fragment`]; caller values are only ever carried in its
//! parameters, never in its text.
//!
//! # Example
//!
//! ```ignore
//! use jobly::sql::{ColumnNames, Patch, partial_update};
//!
//! let patch = Patch::new().set("title", "updated title").set("salary", 42);
//! let set = partial_update(&patch, ColumnNames::IDENTITY)?;
//! let sql = format!(
//!     "UPDATE jobs SET {} WHERE id = ${} RETURNING id",
//!     set.text(),
//!     set.next_placeholder(),
//! );
//! ```

pub mod coerce;
mod filter;
mod fragment;
mod update;


pub use filter::{
    FilterDef, FilterKind, FilterSpec, Filters, Literal, check_range, compose_filters,
    compose_filters_at, filters_from_query,
};
pub use fragment::Fragment;
pub use update::{ColumnNames, Patch, partial_update, partial_update_at};
