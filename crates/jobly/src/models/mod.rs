//! Data-access operations for companies, jobs, users and applications.
//!
//! Every operation takes `&impl GenericClient` and tags its statements
//! `<entity>.<operation>` (e.g. `job.find_all`) for the `jobly.sql` log.
//! Searches go through [`compose_filters`](crate::sql::compose_filters) and
//! updates through [`partial_update`](crate::sql::partial_update), each
//! against the entity's own filter table and column names.

mod application;
mod company;
mod job;
mod user;

pub use application::Application;
pub use company::{
    COMPANY_COLUMNS, COMPANY_FILTERS, COMPANY_UPDATABLE, Company, CompanyDetail, NewCompany,
};
pub use job::{JOB_COLUMNS, JOB_FILTERS, JOB_UPDATABLE, Job, NewJob};
pub use user::{NewUser, USER_COLUMNS, USER_FILTERS, USER_UPDATABLE, User, UserDetail};

use crate::error::JoblyResult;
use crate::record::{FromRecord, Record};
use crate::sql::{ColumnNames, Fragment, Patch, partial_update};
use crate::value::SqlValue;

fn decode_all<T: FromRecord>(rows: Vec<Record>) -> JoblyResult<Vec<T>> {
    rows.iter().map(T::from_record).collect()
}

/// Check `patch` against `updatable` and build its `SET` list.
fn set_clause(patch: &Patch, updatable: &[&str], names: ColumnNames<'_>) -> JoblyResult<Fragment> {
    patch.ensure_fields(updatable)?;
    partial_update(patch, names)
}

/// `UPDATE <table> SET ... WHERE <key> = $n RETURNING <returning>`, with the
/// key bound last.
fn update_statement(
    table: &str,
    set: Fragment,
    key_column: &str,
    key: SqlValue,
    returning: &str,
) -> (String, Vec<SqlValue>) {
    let sql = format!(
        "UPDATE {table} SET {} WHERE {key_column} = ${} RETURNING {returning}",
        set.text(),
        set.next_placeholder()
    );
    let (_, mut params) = set.into_parts();
    params.push(key);
    (sql, params)
}
