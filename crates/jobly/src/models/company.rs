use super::{Job, decode_all, set_clause, update_statement};
use crate::client::GenericClient;
use crate::error::JoblyResult;
use crate::guard::GuardedInsert;
use crate::record::{FromRecord, Record};
use crate::sql::{
    ColumnNames, FilterDef, FilterSpec, Filters, Patch, check_range, compose_filters,
};
use serde::{Deserialize, Serialize};

/// Search filters for [`Company::find_all`].
pub const COMPANY_FILTERS: FilterSpec = FilterSpec {
    filters: &[
        FilterDef::partial_ci("name", "name"),
        FilterDef::gte("minEmployees", "num_employees"),
        FilterDef::lte("maxEmployees", "num_employees"),
    ],
};

pub const COMPANY_COLUMNS: ColumnNames<'static> =
    ColumnNames::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);

/// Fields [`Company::update`] accepts. The handle is immutable.
pub const COMPANY_UPDATABLE: &[&str] = &["name", "description", "numEmployees", "logoUrl"];

const RETURNING: &str = r#"handle, name, description, num_employees AS "numEmployees", logo_url AS "logoUrl""#;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRecord for Company {
    fn from_record(record: &Record) -> JoblyResult<Self> {
        Ok(Self {
            handle: record.try_get("handle")?,
            name: record.try_get("name")?,
            description: record.try_get("description")?,
            num_employees: record.try_get("numEmployees")?,
            logo_url: record.try_get("logoUrl")?,
        })
    }
}

/// A company with its jobs, as returned by [`Company::get`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Company {
    /// Insert a company.
    ///
    /// Errors with `Conflict` if the handle is taken.
    pub async fn create(client: &impl GenericClient, new: &NewCompany) -> JoblyResult<Company> {
        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {RETURNING}"
        );
        let row = GuardedInsert::new("company.create")
            .reject_duplicate(
                "SELECT handle FROM companies WHERE handle = $1",
                vec![new.handle.as_str().into()],
                format!("Duplicate company: {}", new.handle),
            )
            .insert(
                client,
                &sql,
                &[
                    new.handle.as_str().into(),
                    new.name.as_str().into(),
                    new.description.as_str().into(),
                    new.num_employees.into(),
                    new.logo_url.as_deref().into(),
                ],
            )
            .await?;
        Company::from_record(&row)
    }

    /// All companies matching `filters`, ordered by name.
    ///
    /// Recognized filters: `name` (case-insensitive substring), `minEmployees`
    /// and `maxEmployees`. A `minEmployees` above `maxEmployees` is rejected
    /// with `Validation` before anything is queried.
    pub async fn find_all(
        client: &impl GenericClient,
        filters: &Filters,
    ) -> JoblyResult<Vec<Company>> {
        if let Err(err) = check_range(filters, "minEmployees", "maxEmployees") {
            tracing::warn!(error = %err, "rejected company search");
            return Err(err);
        }

        let filter = compose_filters(filters, &COMPANY_FILTERS);
        let sql = format!(
            "SELECT {RETURNING} FROM companies{} ORDER BY name",
            filter.where_clause()
        );
        let rows = client
            .query_tagged("company.find_all", &sql, filter.params())
            .await?;
        decode_all(rows)
    }

    /// A company and its jobs (by id).
    pub async fn get(client: &impl GenericClient, handle: &str) -> JoblyResult<CompanyDetail> {
        let sql = format!("SELECT {RETURNING} FROM companies WHERE handle = $1");
        let row = client
            .query_one_tagged(
                "company.get",
                &sql,
                &[handle.into()],
                format!("No company: {handle}"),
            )
            .await?;
        let company = Company::from_record(&row)?;

        let jobs = client
            .query_tagged(
                "company.get_jobs",
                r#"SELECT id, title, salary, equity, company_handle AS "companyHandle"
                   FROM jobs WHERE company_handle = $1 ORDER BY id"#,
                &[handle.into()],
            )
            .await?;

        Ok(CompanyDetail {
            company,
            jobs: decode_all(jobs)?,
        })
    }

    /// Apply a partial update. See [`COMPANY_UPDATABLE`].
    pub async fn update(
        client: &impl GenericClient,
        handle: &str,
        patch: &Patch,
    ) -> JoblyResult<Company> {
        let set = set_clause(patch, COMPANY_UPDATABLE, COMPANY_COLUMNS)?;
        let (sql, params) = update_statement("companies", set, "handle", handle.into(), RETURNING);
        let row = client
            .query_one_tagged(
                "company.update",
                &sql,
                &params,
                format!("No company: {handle}"),
            )
            .await?;
        Company::from_record(&row)
    }

    /// Delete a company (its jobs go with it).
    pub async fn remove(client: &impl GenericClient, handle: &str) -> JoblyResult<()> {
        client
            .query_one_tagged(
                "company.remove",
                "DELETE FROM companies WHERE handle = $1 RETURNING handle",
                &[handle.into()],
                format!("No company: {handle}"),
            )
            .await?;
        Ok(())
    }
}
