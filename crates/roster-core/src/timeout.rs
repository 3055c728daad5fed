//! Deadline wrapper for async operations.

use crate::{RosterError, RosterResult};
use std::future::Future;
use std::time::Duration;

/// Runs `fut` with a deadline, mapping expiry to [`RosterError::Timeout`].
///
/// `operation` names the call in the error message.
pub async fn with_timeout<Fut, T>(operation: &str, duration: Duration, fut: Fut) -> RosterResult<T>
where
    Fut: Future<Output = RosterResult<T>>,
{
    tokio::time::timeout(duration, fut)
        .await
        .map_err(|_| RosterError::Timeout(format!("{operation} exceeded {duration:?}")))?
}
