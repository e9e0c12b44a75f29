//! Connection pool utilities

use crate::config::DatabaseConfig;
use crate::error::{JoblyError, JoblyResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Create a connection pool from a [`DatabaseConfig`].
///
/// Uses `NoTls` and fast recycling. Connections are opened lazily, so a bad
/// host only surfaces on the first `pool.get()`; a malformed url fails here.
///
/// # Example
///
/// ```ignore
/// let pool = jobly::create_pool(&DatabaseConfig::from_env()?)?;
/// let client = pool.get().await?;
/// let jobs = Job::find_all(&client, &Filters::new()).await?;
/// ```
pub fn create_pool(config: &DatabaseConfig) -> JoblyResult<Pool> {
    let pg_config: tokio_postgres::Config = config
        .url
        .parse()
        .map_err(|e: tokio_postgres::Error| JoblyError::Connection(e.to_string()))?;

    let mgr = Manager::from_config(
        pg_config,
        NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );
    Pool::builder(mgr)
        .max_size(config.max_size)
        .build()
        .map_err(|e| JoblyError::Pool(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_url_is_a_connection_error() {
        let err = create_pool(&DatabaseConfig::new("not a url at all=")).unwrap_err();
        assert!(matches!(err, JoblyError::Connection(_)));
    }
}
