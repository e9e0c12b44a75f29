use super::{decode_all, set_clause, update_statement};
use crate::client::GenericClient;
use crate::error::JoblyResult;
use crate::guard::GuardedInsert;
use crate::record::{FromRecord, Record};
use crate::sql::{ColumnNames, FilterDef, FilterSpec, Filters, Literal, Patch, compose_filters};
use serde::{Deserialize, Serialize};

/// Search filters for [`User::find_all`].
pub const USER_FILTERS: FilterSpec = FilterSpec {
    filters: &[
        FilterDef::partial_ci("username", "username"),
        FilterDef::presence("isAdmin", "is_admin", "=", Literal::Bool(true)),
    ],
};

pub const USER_COLUMNS: ColumnNames<'static> = ColumnNames::new(&[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("isAdmin", "is_admin"),
]);

/// Fields [`User::update`] accepts. The username is immutable.
pub const USER_UPDATABLE: &[&str] = &["firstName", "lastName", "password", "email", "isAdmin"];

const RETURNING: &str = r#"username, first_name AS "firstName", last_name AS "lastName", email, is_admin AS "isAdmin""#;

/// A user as exposed to callers. The password never leaves the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl FromRecord for User {
    fn from_record(record: &Record) -> JoblyResult<Self> {
        Ok(Self {
            username: record.try_get("username")?,
            first_name: record.try_get("firstName")?,
            last_name: record.try_get("lastName")?,
            email: record.try_get("email")?,
            is_admin: record.try_get("isAdmin")?,
        })
    }
}

/// A user with the ids of the jobs they applied to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub jobs: Vec<i32>,
}

/// A user to insert.
///
/// `password` is stored as given; hash it before calling [`User::create`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Errors with `Conflict` if the username is taken.
    pub async fn create(client: &impl GenericClient, new: &NewUser) -> JoblyResult<User> {
        let sql = format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {RETURNING}"
        );
        let row = GuardedInsert::new("user.create")
            .reject_duplicate(
                "SELECT username FROM users WHERE username = $1",
                vec![new.username.as_str().into()],
                format!("Duplicate username: {}", new.username),
            )
            .insert(
                client,
                &sql,
                &[
                    new.username.as_str().into(),
                    new.password.as_str().into(),
                    new.first_name.as_str().into(),
                    new.last_name.as_str().into(),
                    new.email.as_str().into(),
                    new.is_admin.into(),
                ],
            )
            .await?;
        User::from_record(&row)
    }

    /// All users matching `filters`, ordered by username.
    ///
    /// Recognized filters: `username` (case-insensitive substring) and
    /// `isAdmin` (only admins when set).
    pub async fn find_all(client: &impl GenericClient, filters: &Filters) -> JoblyResult<Vec<User>> {
        let filter = compose_filters(filters, &USER_FILTERS);
        let sql = format!(
            "SELECT {RETURNING} FROM users{} ORDER BY username",
            filter.where_clause()
        );
        let rows = client
            .query_tagged("user.find_all", &sql, filter.params())
            .await?;
        decode_all(rows)
    }

    pub async fn get(client: &impl GenericClient, username: &str) -> JoblyResult<UserDetail> {
        let sql = format!("SELECT {RETURNING} FROM users WHERE username = $1");
        let row = client
            .query_one_tagged(
                "user.get",
                &sql,
                &[username.into()],
                format!("No user: {username}"),
            )
            .await?;
        let user = User::from_record(&row)?;

        let applied = client
            .query_tagged(
                "user.get_applications",
                "SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id",
                &[username.into()],
            )
            .await?;
        let jobs = applied
            .iter()
            .map(|r| r.try_get("job_id"))
            .collect::<JoblyResult<Vec<i32>>>()?;

        Ok(UserDetail { user, jobs })
    }

    /// Apply a partial update. See [`USER_UPDATABLE`].
    pub async fn update(
        client: &impl GenericClient,
        username: &str,
        patch: &Patch,
    ) -> JoblyResult<User> {
        let set = set_clause(patch, USER_UPDATABLE, USER_COLUMNS)?;
        let (sql, params) = update_statement("users", set, "username", username.into(), RETURNING);
        let row = client
            .query_one_tagged(
                "user.update",
                &sql,
                &params,
                format!("No user: {username}"),
            )
            .await?;
        User::from_record(&row)
    }

    pub async fn remove(client: &impl GenericClient, username: &str) -> JoblyResult<()> {
        client
            .query_one_tagged(
                "user.remove",
                "DELETE FROM users WHERE username = $1 RETURNING username",
                &[username.into()],
                format!("No user: {username}"),
            )
            .await?;
        Ok(())
    }
}
