use super::{decode_all, set_clause, update_statement};
use crate::client::GenericClient;
use crate::error::JoblyResult;
use crate::guard::GuardedInsert;
use crate::record::{FromRecord, Record};
use crate::sql::{ColumnNames, FilterDef, FilterSpec, Filters, Literal, Patch, compose_filters};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Search filters for [`Job::find_all`].
pub const JOB_FILTERS: FilterSpec = FilterSpec {
    filters: &[
        FilterDef::partial_ci("title", "title"),
        FilterDef::gte("minSalary", "salary"),
        FilterDef::presence("hasEquity", "equity", ">", Literal::Int(0)),
    ],
};

/// Job fields are named after their columns.
pub const JOB_COLUMNS: ColumnNames<'static> = ColumnNames::IDENTITY;

/// Fields [`Job::update`] accepts. The id and company are immutable.
pub const JOB_UPDATABLE: &[&str] = &["title", "salary", "equity"];

const RETURNING: &str = r#"id, title, salary, equity, company_handle AS "companyHandle""#;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRecord for Job {
    fn from_record(record: &Record) -> JoblyResult<Self> {
        Ok(Self {
            id: record.try_get("id")?,
            title: record.try_get("title")?,
            salary: record.try_get("salary")?,
            equity: record.try_get("equity")?,
            company_handle: record.try_get("companyHandle")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl Job {
    /// Insert a job for an existing company.
    ///
    /// Errors with `Conflict` if a job with the same title exists, then with
    /// `NotFound` if the company doesn't.
    pub async fn create(client: &impl GenericClient, new: &NewJob) -> JoblyResult<Job> {
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {RETURNING}"
        );
        let row = GuardedInsert::new("job.create")
            .reject_duplicate(
                "SELECT title FROM jobs WHERE title = $1",
                vec![new.title.as_str().into()],
                format!("Duplicate job: {}", new.title),
            )
            .require(
                "SELECT name FROM companies WHERE handle = $1",
                vec![new.company_handle.as_str().into()],
                format!("No such company: {}", new.company_handle),
            )
            .insert(
                client,
                &sql,
                &[
                    new.title.as_str().into(),
                    new.salary.into(),
                    new.equity.into(),
                    new.company_handle.as_str().into(),
                ],
            )
            .await?;
        Job::from_record(&row)
    }

    /// All jobs matching `filters`, ordered by title.
    ///
    /// Recognized filters: `title` (case-insensitive substring), `minSalary`,
    /// and `hasEquity` (only jobs with non-zero equity when set).
    pub async fn find_all(client: &impl GenericClient, filters: &Filters) -> JoblyResult<Vec<Job>> {
        let filter = compose_filters(filters, &JOB_FILTERS);
        let sql = format!(
            "SELECT {RETURNING} FROM jobs{} ORDER BY title",
            filter.where_clause()
        );
        let rows = client
            .query_tagged("job.find_all", &sql, filter.params())
            .await?;
        decode_all(rows)
    }

    pub async fn get(client: &impl GenericClient, id: i32) -> JoblyResult<Job> {
        let sql = format!("SELECT {RETURNING} FROM jobs WHERE id = $1");
        let row = client
            .query_one_tagged("job.get", &sql, &[id.into()], format!("No job: {id}"))
            .await?;
        Job::from_record(&row)
    }

    /// Apply a partial update. See [`JOB_UPDATABLE`].
    pub async fn update(client: &impl GenericClient, id: i32, patch: &Patch) -> JoblyResult<Job> {
        let set = set_clause(patch, JOB_UPDATABLE, JOB_COLUMNS)?;
        let (sql, params) = update_statement("jobs", set, "id", id.into(), RETURNING);
        let row = client
            .query_one_tagged("job.update", &sql, &params, format!("No job: {id}"))
            .await?;
        Job::from_record(&row)
    }

    pub async fn remove(client: &impl GenericClient, id: i32) -> JoblyResult<()> {
        client
            .query_one_tagged(
                "job.remove",
                "DELETE FROM jobs WHERE id = $1 RETURNING id",
                &[id.into()],
                format!("No job: {id}"),
            )
            .await?;
        Ok(())
    }
}
