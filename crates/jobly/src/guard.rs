//! Duplicate and reference checks ahead of an insert.
//!
//! An insert that links entities (a job to its company, an application to its
//! user and job) runs three strictly ordered steps:
//!
//! 1. the duplicate check: any row means [`JoblyError::Conflict`];
//! 2. each reference check, in declaration order: no row means
//!    [`JoblyError::NotFound`] naming the missing entity;
//! 3. the insert itself, whose returned row is handed back.
//!
//! A request that is both a duplicate and references something missing
//! reports the conflict. Nothing is written unless every check passes.
//!
//! The checks and the insert are separate statements. Run them through a
//! transaction (see [`crate::transaction!`]) and back them with database
//! constraints when concurrent writers matter; constraint violations raised by
//! the insert still map to `Conflict` / `NotFound` via
//! [`JoblyError::from_db_error`].

use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::record::Record;
use crate::value::SqlValue;

/// A single existence query and the message reported when it trips.
#[derive(Debug, Clone)]
struct Lookup {
    sql: String,
    params: Vec<SqlValue>,
    message: String,
}

impl Lookup {
    async fn exists(&self, client: &impl GenericClient, tag: &str) -> JoblyResult<bool> {
        let row = client
            .query_opt_tagged(tag, &self.sql, &self.params)
            .await?;
        Ok(row.is_some())
    }
}

/// Builder for a checked insert.
///
/// # Example
///
/// ```ignore
/// let row = GuardedInsert::new("job.create")
///     .reject_duplicate(
///         "SELECT title FROM jobs WHERE title = $1",
///         vec![title.into()],
///         format!("Duplicate job: {title}"),
///     )
///     .require(
///         "SELECT name FROM companies WHERE handle = $1",
///         vec![handle.into()],
///         format!("No such company: {handle}"),
///     )
///     .insert(&client, "INSERT INTO jobs ... RETURNING ...", &params)
///     .await?;
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct GuardedInsert {
    tag: String,
    duplicate: Option<Lookup>,
    references: Vec<Lookup>,
}

impl GuardedInsert {
    /// Start a guarded insert; `tag` labels every statement it logs.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            duplicate: None,
            references: Vec::new(),
        }
    }

    /// Fail with `Conflict(message)` if `sql` returns any row.
    ///
    /// Only one duplicate check is kept; a second call replaces the first.
    pub fn reject_duplicate(
        mut self,
        sql: impl Into<String>,
        params: Vec<SqlValue>,
        message: impl Into<String>,
    ) -> Self {
        self.duplicate = Some(Lookup {
            sql: sql.into(),
            params,
            message: message.into(),
        });
        self
    }

    /// Fail with `NotFound(message)` if `sql` returns no row.
    pub fn require(
        mut self,
        sql: impl Into<String>,
        params: Vec<SqlValue>,
        message: impl Into<String>,
    ) -> Self {
        self.references.push(Lookup {
            sql: sql.into(),
            params,
            message: message.into(),
        });
        self
    }

    /// Run the checks without inserting.
    pub async fn check(&self, client: &impl GenericClient) -> JoblyResult<()> {
        if let Some(dup) = &self.duplicate {
            if dup.exists(client, &self.tag).await? {
                return Err(JoblyError::conflict(dup.message.clone()));
            }
        }
        for reference in &self.references {
            if !reference.exists(client, &self.tag).await? {
                return Err(JoblyError::not_found(reference.message.clone()));
            }
        }
        Ok(())
    }

    /// Run the checks, then the insert, returning the row it produced.
    ///
    /// `sql` must return the inserted row (`RETURNING ...`); an insert that
    /// returns nothing is reported as [`JoblyError::Other`].
    pub async fn insert(
        self,
        client: &impl GenericClient,
        sql: &str,
        params: &[SqlValue],
    ) -> JoblyResult<Record> {
        self.check(client).await?;
        client
            .query_opt_tagged(&self.tag, sql, params)
            .await?
            .ok_or_else(|| JoblyError::Other(format!("{}: insert returned no row", self.tag)))
    }
}
