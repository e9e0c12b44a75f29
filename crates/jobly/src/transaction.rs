//! Transaction helper macro.
//!
//! Model operations take any [`GenericClient`](crate::GenericClient), and a
//! `tokio_postgres::Transaction` is one, so the same operation runs with or
//! without a transaction. [`transaction!`] handles commit and rollback.
//!
//! # Example
//!
//! ```ignore
//! use jobly::{Application, JoblyResult};
//!
//! # async fn demo(client: &mut tokio_postgres::Client) -> JoblyResult<()> {
//! let app = jobly::transaction!(client, tx, {
//!     Application::create(&tx, "u1", 7).await
//! })?;
//! # Ok(()) }
//! ```

/// Runs the given block inside a database transaction.
///
/// - Begins a transaction via `$client.transaction().await`.
/// - Commits on `Ok(_)`.
/// - Rolls back on `Err(_)`, returning the block's error.
///
/// The block must evaluate to `jobly::JoblyResult<T>`. A failed rollback is
/// reported as [`JoblyError::Other`](crate::JoblyError::Other) carrying both
/// messages.
#[macro_export]
macro_rules! transaction {
    ($client:expr, $tx:ident, $body:block) => {{
        let $tx = ($client)
            .transaction()
            .await
            .map_err($crate::JoblyError::from_db_error)?;

        let __jobly_tx_body_result = async { $body }.await;
        match __jobly_tx_body_result {
            Ok(value) => {
                $tx.commit()
                    .await
                    .map_err($crate::JoblyError::from_db_error)?;
                Ok(value)
            }
            Err(error) => match $tx.rollback().await {
                Ok(()) => Err(error),
                Err(rollback_err) => Err($crate::JoblyError::Other(format!(
                    "{error} (rollback failed: {rollback_err})"
                ))),
            },
        }
    }};
}
