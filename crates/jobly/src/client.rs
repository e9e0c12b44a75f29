//! Generic client trait for unified database access.

use crate::error::{JoblyError, JoblyResult};
use crate::record::Record;
use crate::value::SqlValue;
use tokio_postgres::types::ToSql;

/// Longest SQL text (in bytes) written to a statement log event.
pub const SQL_LOG_MAX_BYTES: usize = 200;

/// A trait that unifies database clients and transactions.
///
/// Model operations accept `&impl GenericClient`, so they run the same way on
/// a plain connection, a pooled connection, or inside a transaction. Rows come
/// back already decoded into [`Record`]s.
pub trait GenericClient: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl std::future::Future<Output = JoblyResult<Vec<Record>>> + Send;

    /// Execute a query and return all rows, logging it under `tag`.
    ///
    /// Emits a `DEBUG` event at target `jobly.sql` with the tag, the parameter
    /// count and the (truncated) SQL text. Parameter values are never logged.
    fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[SqlValue],
    ) -> impl std::future::Future<Output = JoblyResult<Vec<Record>>> + Send {
        log_statement(tag, sql, params.len());
        self.query(sql, params)
    }

    /// Execute a query and return the first row, if any.
    ///
    /// Semantics:
    /// - 0 rows: returns `Ok(None)`
    /// - 1 row: returns `Ok(Some(row))`
    /// - multiple rows: returns `Ok(Some(first_row))` (does **not** error)
    fn query_opt_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[SqlValue],
    ) -> impl std::future::Future<Output = JoblyResult<Option<Record>>> + Send {
        async move {
            let rows = self.query_tagged(tag, sql, params).await?;
            Ok(rows.into_iter().next())
        }
    }

    /// Execute a query and return the first row, or `NotFound(message)`.
    fn query_one_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[SqlValue],
        message: impl Into<String> + Send,
    ) -> impl std::future::Future<Output = JoblyResult<Record>> + Send {
        async move {
            self.query_opt_tagged(tag, sql, params)
                .await?
                .ok_or_else(|| JoblyError::not_found(message))
        }
    }
}

fn log_statement(tag: &str, sql: &str, param_count: usize) {
    let sql = truncate_sql_bytes(sql, SQL_LOG_MAX_BYTES);
    tracing::debug!(target: "jobly.sql", tag, param_count, sql = %sql);
}

/// Cut `sql` to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn bind_refs(params: &[SqlValue]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

fn decode_rows(rows: Vec<tokio_postgres::Row>) -> JoblyResult<Vec<Record>> {
    rows.iter().map(Record::from_row).collect()
}

impl GenericClient for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> JoblyResult<Vec<Record>> {
        let rows = tokio_postgres::Client::query(self, sql, &bind_refs(params))
            .await
            .map_err(JoblyError::from_db_error)?;
        decode_rows(rows)
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> JoblyResult<Vec<Record>> {
        let rows = tokio_postgres::Transaction::query(self, sql, &bind_refs(params))
            .await
            .map_err(JoblyError::from_db_error)?;
        decode_rows(rows)
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Client {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> JoblyResult<Vec<Record>> {
        // Delegate to the deref target (ClientWrapper / tokio_postgres::Client).
        GenericClient::query(&**self, sql, params).await
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::ClientWrapper {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> JoblyResult<Vec<Record>> {
        GenericClient::query(&**self, sql, params).await
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> JoblyResult<Vec<Record>> {
        GenericClient::query(&**self, sql, params).await
    }
}
