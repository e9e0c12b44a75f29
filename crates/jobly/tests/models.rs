//! Model operations against a scripted client: generated SQL, bound
//! parameters, and error kinds.

mod common;

use common::{ScriptedClient, company_row, job_row, row, user_row};
use jobly::sql::filters_from_query;
use jobly::{Company, Filters, Job, JoblyError, Patch, SqlValue, User};
use serde_json::json;

fn filters(value: serde_json::Value) -> Filters {
    value.as_object().cloned().unwrap()
}

// ==================== jobs ====================

#[tokio::test]
async fn job_search_composes_where_and_order() {
    let client = ScriptedClient::new().reply(vec![job_row(1, "j1", "c1")]);
    let query = filters_from_query([("title", "J"), ("minSalary", "20"), ("hasEquity", "true")]);

    let jobs = Job::find_all(&client, &query).await.unwrap();

    assert_eq!(jobs.len(), 1);
    let call = &client.calls()[0];
    assert!(call.sql.ends_with(
        " FROM jobs WHERE LOWER(title) LIKE $1 AND salary >= $2 AND equity > $3 ORDER BY title"
    ));
    assert_eq!(
        call.params,
        vec![SqlValue::from("%j%"), SqlValue::from("20"), SqlValue::Int(0)]
    );
}

#[tokio::test]
async fn job_search_degrades_on_unusable_thresholds() {
    let client = ScriptedClient::new().empty();
    let query = filters_from_query([("minSalary", "2.5")]);
    Job::find_all(&client, &query).await.unwrap();
    let call = &client.calls()[0];
    assert!(call.sql.ends_with(" FROM jobs WHERE salary >= $1 ORDER BY title"));
    assert_eq!(call.params, vec![SqlValue::from("2")]);

    let client = ScriptedClient::new().empty();
    let query = filters_from_query([("minSalary", "99999999999")]);
    Job::find_all(&client, &query).await.unwrap();
    assert!(client.calls()[0].sql.ends_with(" FROM jobs ORDER BY title"));
}

#[tokio::test]
async fn job_search_without_filters_has_no_where() {
    let client = ScriptedClient::new();

    let jobs = Job::find_all(&client, &Filters::new()).await.unwrap();

    assert!(jobs.is_empty());
    let call = &client.calls()[0];
    assert!(!call.sql.contains("WHERE"));
    assert!(call.sql.ends_with(" FROM jobs ORDER BY title"));
    assert!(call.params.is_empty());
}

#[tokio::test]
async fn job_update_binds_id_last() {
    let client = ScriptedClient::new().reply(vec![job_row(3, "New", "c1")]);
    let patch = Patch::new().set("title", "New").set("salary", 500);

    let job = Job::update(&client, 3, &patch).await.unwrap();

    assert_eq!(job.title, "New");
    let call = &client.calls()[0];
    assert!(call.sql.starts_with(r#"UPDATE jobs SET "title"=$1, "salary"=$2 WHERE id = $3"#));
    assert_eq!(
        call.params,
        vec![SqlValue::from("New"), SqlValue::Int(500), SqlValue::Int(3)]
    );
}

#[tokio::test]
async fn job_update_missing_is_not_found() {
    let client = ScriptedClient::new();
    let err = Job::update(&client, 0, &Patch::new().set("title", "x"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Not found: No job: 0");
}

#[tokio::test]
async fn empty_update_is_rejected_before_querying() {
    let client = ScriptedClient::new();
    let err = Job::update(&client, 1, &Patch::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "Validation error: No data");
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn immutable_job_fields_are_rejected() {
    let client = ScriptedClient::new();
    let patch = Patch::new().set("companyHandle", "c2");
    let err = Job::update(&client, 1, &patch).await.unwrap_err();
    assert!(err.is_validation());
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn job_get_and_remove() {
    let client = ScriptedClient::new()
        .reply(vec![job_row(9, "j9", "c1")])
        .reply(vec![row(&[("id", 9.into())])]);

    assert_eq!(Job::get(&client, 9).await.unwrap().id, 9);
    Job::remove(&client, 9).await.unwrap();

    let err = Job::remove(&client, 9).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn job_row_with_wrong_type_is_a_decode_error() {
    let client = ScriptedClient::new().reply(vec![row(&[
        ("id", "not a number".into()),
        ("title", "j1".into()),
        ("salary", SqlValue::Null),
        ("equity", SqlValue::Null),
        ("companyHandle", "c1".into()),
    ])]);

    let err = Job::get(&client, 1).await.unwrap_err();
    assert!(matches!(err, JoblyError::Decode { ref column, .. } if column == "id"));
}

// ==================== companies ====================

#[tokio::test]
async fn company_search_with_range() {
    let client = ScriptedClient::new().reply(vec![company_row("c1")]);

    let companies = Company::find_all(
        &client,
        &filters(json!({"name": "C", "minEmployees": 1, "maxEmployees": "3"})),
    )
    .await
    .unwrap();

    assert_eq!(companies[0].handle, "c1");
    let call = &client.calls()[0];
    assert!(call.sql.ends_with(
        " FROM companies WHERE LOWER(name) LIKE $1 AND num_employees >= $2 \
         AND num_employees <= $3 ORDER BY name"
    ));
    assert_eq!(
        call.params,
        vec![SqlValue::from("%c%"), SqlValue::from("1"), SqlValue::from("3")]
    );
}

#[tokio::test]
async fn impossible_company_range_is_rejected_before_querying() {
    let client = ScriptedClient::new();

    let err = Company::find_all(
        &client,
        &filters(json!({"minEmployees": "10", "maxEmployees": "2"})),
    )
    .await
    .unwrap_err();

    assert!(err.is_validation());
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn company_update_translates_columns() {
    let client = ScriptedClient::new().reply(vec![company_row("c1")]);
    let patch = Patch::new().set("numEmployees", 10).set("logoUrl", "http://x");

    Company::update(&client, "c1", &patch).await.unwrap();

    let call = &client.calls()[0];
    assert!(call.sql.starts_with(
        r#"UPDATE companies SET "num_employees"=$1, "logo_url"=$2 WHERE handle = $3"#
    ));
    assert_eq!(call.params[2], SqlValue::from("c1"));
}

#[tokio::test]
async fn company_get_includes_jobs() {
    let client = ScriptedClient::new()
        .reply(vec![company_row("c1")])
        .reply(vec![job_row(1, "j1", "c1"), job_row(2, "j2", "c1")]);

    let detail = Company::get(&client, "c1").await.unwrap();

    assert_eq!(detail.company.handle, "c1");
    assert_eq!(
        detail.jobs.iter().map(|j| j.id).collect::<Vec<_>>(),
        [1, 2]
    );

    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json["numEmployees"], json!(1));
    assert_eq!(json["jobs"][0]["companyHandle"], json!("c1"));
}

#[tokio::test]
async fn missing_company_is_not_found_without_job_lookup() {
    let client = ScriptedClient::new();
    let err = Company::get(&client, "nope").await.unwrap_err();
    assert_eq!(err.to_string(), "Not found: No company: nope");
    assert_eq!(client.calls().len(), 1);
}

// ==================== users ====================

#[tokio::test]
async fn admin_filter_binds_literal() {
    let client = ScriptedClient::new().reply(vec![user_row("u1")]);

    User::find_all(&client, &filters(json!({"isAdmin": "true"})))
        .await
        .unwrap();

    let call = &client.calls()[0];
    assert!(call.sql.ends_with(" FROM users WHERE is_admin = $1 ORDER BY username"));
    assert_eq!(call.params, vec![SqlValue::Bool(true)]);
}

#[tokio::test]
async fn user_get_lists_applied_jobs() {
    let client = ScriptedClient::new()
        .reply(vec![user_row("u1")])
        .reply(vec![
            row(&[("job_id", 1.into())]),
            row(&[("job_id", 3.into())]),
        ]);

    let detail = User::get(&client, "u1").await.unwrap();

    assert_eq!(detail.user.first_name, "U1F");
    assert_eq!(detail.jobs, vec![1, 3]);
}

#[tokio::test]
async fn user_update_translates_and_allows_password() {
    let client = ScriptedClient::new().reply(vec![user_row("u1")]);
    let patch = Patch::from_json(json!({"firstName": "New", "password": "hashed"})).unwrap();

    User::update(&client, "u1", &patch).await.unwrap();

    let call = &client.calls()[0];
    assert!(call.sql.starts_with(
        r#"UPDATE users SET "first_name"=$1, "password"=$2 WHERE username = $3"#
    ));
    assert!(!call.sql.contains("hashed"));
}

#[tokio::test]
async fn username_is_immutable() {
    let client = ScriptedClient::new();
    let patch = Patch::new().set("username", "other");
    assert!(User::update(&client, "u1", &patch).await.unwrap_err().is_validation());
}
