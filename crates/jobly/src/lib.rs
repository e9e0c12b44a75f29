//! # jobly
//!
//! Data access for a job board (companies, jobs, users, applications) over
//! Postgres.
//!
//! ## Features
//!
//! - **Partial updates**: [`sql::partial_update`] turns a sparse [`Patch`] into
//!   a `"col"=$1, ...` assignment list, translating field names to columns
//! - **Filtered search**: [`sql::compose_filters`] turns optional search
//!   filters into an AND-joined `WHERE` body, driven by a per-entity
//!   [`FilterSpec`] table
//! - **Guarded inserts**: [`GuardedInsert`] checks duplicates, then references,
//!   then inserts, reporting `Conflict` / `NotFound` distinctly
//! - **Transaction-friendly**: pass a transaction anywhere a [`GenericClient`]
//!   is expected
//!
//! Values never appear in generated SQL text; they travel as parameters.
//!
//! ```ignore
//! use jobly::{Job, Patch, sql::filters_from_query};
//!
//! let filters = filters_from_query([("title", "eng"), ("minSalary", "50000")]);
//! let jobs = Job::find_all(&client, &filters).await?;
//!
//! let job = Job::update(&client, jobs[0].id, &Patch::new().set("salary", 60000)).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod ident;
pub mod models;
pub mod record;
pub mod sql;
pub mod transaction;
pub mod value;

pub use client::GenericClient;
pub use config::DatabaseConfig;
pub use error::{JoblyError, JoblyResult};
pub use guard::GuardedInsert;
pub use ident::Ident;
pub use models::{
    Application, Company, CompanyDetail, Job, NewCompany, NewJob, NewUser, User, UserDetail,
};
pub use record::{FromRecord, FromValue, Record};
pub use sql::{ColumnNames, FilterSpec, Filters, Fragment, Patch};
pub use value::SqlValue;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::create_pool;
