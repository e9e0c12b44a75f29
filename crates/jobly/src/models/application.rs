use crate::client::GenericClient;
use crate::error::JoblyResult;
use crate::guard::GuardedInsert;
use crate::record::{FromRecord, Record};
use serde::Serialize;

/// A user's application to a job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub username: String,
    pub job_id: i32,
}

impl FromRecord for Application {
    fn from_record(record: &Record) -> JoblyResult<Self> {
        Ok(Self {
            username: record.try_get("username")?,
            job_id: record.try_get("jobId")?,
        })
    }
}

impl Application {
    /// Record that `username` applied to job `job_id`.
    ///
    /// Checks run in order and the first failure wins:
    /// - an existing application for the pair is a `Conflict`;
    /// - an unknown user is `NotFound("No such user: ..")`;
    /// - an unknown job is `NotFound("No such job: ..")`.
    pub async fn create(
        client: &impl GenericClient,
        username: &str,
        job_id: i32,
    ) -> JoblyResult<Application> {
        let row = GuardedInsert::new("application.create")
            .reject_duplicate(
                "SELECT job_id FROM applications WHERE username = $1 AND job_id = $2",
                vec![username.into(), job_id.into()],
                format!("Duplicate application: {username} to job {job_id}"),
            )
            .require(
                "SELECT username FROM users WHERE username = $1",
                vec![username.into()],
                format!("No such user: {username}"),
            )
            .require(
                "SELECT title FROM jobs WHERE id = $1",
                vec![job_id.into()],
                format!("No such job: {job_id}"),
            )
            .insert(
                client,
                r#"INSERT INTO applications (username, job_id) VALUES ($1, $2)
                   RETURNING username, job_id AS "jobId""#,
                &[username.into(), job_id.into()],
            )
            .await?;
        Application::from_record(&row)
    }

    /// [`Application::create`] inside a single transaction.
    ///
    /// A pooled `deadpool_postgres::Client` works too, via `&mut *client`.
    pub async fn create_atomic(
        client: &mut tokio_postgres::Client,
        username: &str,
        job_id: i32,
    ) -> JoblyResult<Application> {
        crate::transaction!(client, tx, {
            Application::create(&tx, username, job_id).await
        })
    }
}
