//! End-to-end tests against a real database.
//!
//! Skipped unless `DATABASE_URL` is set. Each test works in its own schema,
//! dropped afterwards.

use jobly::sql::filters_from_query;
use jobly::{
    Application, Company, GenericClient, Job, JoblyResult, NewCompany, NewJob, NewUser, Patch,
    SqlValue, User,
};
use rust_decimal::Decimal;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_postgres::NoTls;

const SCHEMA: &str = include_str!("../sql/schema.sql");

async fn try_connect(test: &str) -> JoblyResult<Option<(tokio_postgres::Client, String)>> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping {test}");
            return Ok(None);
        }
    };

    let (client, connection) = tokio_postgres::connect(&database_url, NoTls).await?;
    tokio::spawn(async move {
        let _ = connection.await;
    });

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX_EPOCH")
        .as_nanos();
    let schema = format!("jobly_test_{test}_{}_{nanos}", std::process::id());
    client
        .batch_execute(&format!(
            "CREATE SCHEMA {schema}; SET search_path TO {schema}; {SCHEMA}"
        ))
        .await?;
    Ok(Some((client, schema)))
}

async fn drop_schema(client: &tokio_postgres::Client, schema: &str) -> JoblyResult<()> {
    client
        .batch_execute(&format!("DROP SCHEMA {schema} CASCADE"))
        .await?;
    Ok(())
}

async fn seed(client: &tokio_postgres::Client) -> JoblyResult<Job> {
    Company::create(
        client,
        &NewCompany {
            handle: "c1".into(),
            name: "C1".into(),
            description: "Desc1".into(),
            num_employees: Some(1),
            logo_url: None,
        },
    )
    .await?;
    User::create(
        client,
        &NewUser {
            username: "u1".into(),
            password: "password1".into(),
            first_name: "U1F".into(),
            last_name: "U1L".into(),
            email: "u1@email.com".into(),
            is_admin: false,
        },
    )
    .await?;
    Job::create(
        client,
        &NewJob {
            title: "j1".into(),
            salary: Some(100),
            equity: Some(Decimal::new(1, 1)),
            company_handle: "c1".into(),
        },
    )
    .await
}

#[tokio::test]
async fn applications_round_trip() -> JoblyResult<()> {
    let Some((mut client, schema)) = try_connect("applications").await? else {
        return Ok(());
    };
    let job = seed(&client).await?;

    let app = Application::create(&client, "u1", job.id).await?;
    assert_eq!(app.job_id, job.id);

    let err = Application::create(&client, "u1", job.id).await.unwrap_err();
    assert!(err.is_conflict());

    let err = Application::create(&client, "u1", 0).await.unwrap_err();
    assert_eq!(err.to_string(), "Not found: No such job: 0");

    let err = Application::create(&client, "nope", job.id).await.unwrap_err();
    assert_eq!(err.to_string(), "Not found: No such user: nope");

    let err = Application::create_atomic(&mut client, "nope", job.id)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(User::get(&client, "u1").await?.jobs, vec![job.id]);

    drop_schema(&client, &schema).await
}

#[tokio::test]
async fn filters_and_updates_bind_against_real_columns() -> JoblyResult<()> {
    let Some((client, schema)) = try_connect("filters").await? else {
        return Ok(());
    };
    let job = seed(&client).await?;

    // Text thresholds bind to an integer column.
    let hits = Job::find_all(&client, &filters_from_query([("minSalary", "20")])).await?;
    assert_eq!(hits.len(), 1);
    let misses = Job::find_all(&client, &filters_from_query([("minSalary", "1000")])).await?;
    assert!(misses.is_empty());

    // Fractional and oversized thresholds degrade instead of failing to bind.
    let hits = Job::find_all(&client, &filters_from_query([("minSalary", "99.9")])).await?;
    assert_eq!(hits.len(), 1);
    let all = Job::find_all(&client, &filters_from_query([("minSalary", "99999999999")])).await?;
    assert_eq!(all.len(), 1);
    let equity = Job::find_all(&client, &filters_from_query([("hasEquity", "true")])).await?;
    assert_eq!(equity.len(), 1);

    // A float binds to a numeric column exactly.
    let patch = Patch::new().set("equity", 0.5).set("salary", 200);
    let updated = Job::update(&client, job.id, &patch).await?;
    assert_eq!(updated.equity, Some(Decimal::new(5, 1)));
    assert_eq!(updated.salary, Some(200));

    let companies = Company::find_all(
        &client,
        &filters_from_query([("name", "c"), ("maxEmployees", "5")]),
    )
    .await?;
    assert_eq!(companies.len(), 1);

    let err = Job::get(&client, 0).await.unwrap_err();
    assert!(err.is_not_found());

    drop_schema(&client, &schema).await
}

#[tokio::test]
async fn unique_job_title_backs_the_duplicate_check() -> JoblyResult<()> {
    let Some((client, schema)) = try_connect("job_title").await? else {
        return Ok(());
    };
    seed(&client).await?;

    // Skip the guarded create, as a racing writer would.
    let params = [SqlValue::from("j1"), SqlValue::from("c1")];
    let err = client
        .query_tagged(
            "jobs.insert",
            "INSERT INTO jobs (title, company_handle) VALUES ($1, $2) RETURNING id",
            &params,
        )
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert!(err.to_string().starts_with("Conflict: jobs_title_key"));

    drop_schema(&client, &schema).await
}
