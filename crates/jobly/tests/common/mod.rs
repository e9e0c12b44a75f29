//! Shared helpers for integration tests.

#![allow(dead_code)]

use jobly::{GenericClient, JoblyError, JoblyResult, Record, SqlValue};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One statement seen by a [`ScriptedClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// In-memory client that answers queries from a script, in order, and
/// records every statement it receives. Once the script runs out, every query
/// returns no rows.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<JoblyResult<Vec<Record>>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply with these rows.
    pub fn reply(self, rows: Vec<Record>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(rows));
        self
    }

    /// Queue a reply with no rows.
    pub fn empty(self) -> Self {
        self.reply(Vec::new())
    }

    /// Queue a failing reply.
    pub fn fail(self, err: JoblyError) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// The SQL of every call, whitespace-normalized.
    pub fn statements(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| c.sql.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect()
    }

    pub fn inserted(&self) -> bool {
        self.statements().iter().any(|s| s.starts_with("INSERT"))
    }
}

impl GenericClient for ScriptedClient {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> JoblyResult<Vec<Record>> {
        self.calls.lock().unwrap().push(Call {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub fn row(pairs: &[(&str, SqlValue)]) -> Record {
    Record::from_pairs(pairs.iter().cloned())
}

pub fn job_row(id: i32, title: &str, company: &str) -> Record {
    row(&[
        ("id", id.into()),
        ("title", title.into()),
        ("salary", 100.into()),
        ("equity", SqlValue::Null),
        ("companyHandle", company.into()),
    ])
}

pub fn company_row(handle: &str) -> Record {
    row(&[
        ("handle", handle.into()),
        ("name", format!("C{handle}").into()),
        ("description", "Desc".into()),
        ("numEmployees", 1.into()),
        ("logoUrl", SqlValue::Null),
    ])
}

pub fn user_row(username: &str) -> Record {
    row(&[
        ("username", username.into()),
        ("firstName", "U1F".into()),
        ("lastName", "U1L".into()),
        ("email", "u1@email.com".into()),
        ("isAdmin", false.into()),
    ])
}
