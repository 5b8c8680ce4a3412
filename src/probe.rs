//! Database readiness prober.
//!
//! Repeatedly attempts to open a connection to the configured target,
//! bounded by a fixed attempt budget, a per-attempt timeout, and a
//! fixed delay between failed attempts. A successful attempt closes
//! its connection immediately: this is a liveness check, not a held
//! resource.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ConstantBuilder, Retryable};
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use tracing::{debug, warn};

use crate::config::ConnectionTarget;
use crate::error::{EntrykitError, IsRetryable};

/// Retry schedule for the readiness wait. The defaults are the fixed
/// startup policy; tests construct other values to exercise boundaries.
#[derive(Clone, Debug)]
pub struct ProbePolicy {
    /// Total connection attempts before giving up.
    pub max_attempts: u32,
    /// Deadline for a single attempt.
    pub attempt_timeout: Duration,
    /// Sleep between a failed attempt and the next one.
    pub retry_delay: Duration,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            attempt_timeout: Duration::from_secs(2),
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Successful probe outcome; `attempt` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connected {
    pub attempt: u32,
}

/// Open one connection to the target and close it again.
pub async fn connect_once(target: &ConnectionTarget) -> Result<(), EntrykitError> {
    let conn = match &target.url {
        Some(url) => PgConnection::connect(url).await?,
        None => {
            let opts = PgConnectOptions::new()
                .host(&target.host)
                .port(target.port)
                .database(&target.database)
                .username(&target.username)
                .password(&target.password);
            PgConnection::connect_with(&opts).await?
        }
    };
    conn.close().await?;
    Ok(())
}

/// Wait until `connect` succeeds once, retrying transient failures per
/// `policy`.
///
/// Returns [`Connected`] with the attempt index on first success. A
/// non-transient error aborts immediately without consuming the
/// remaining budget. When the budget runs out the last observed error
/// is returned inside [`EntrykitError::Exhausted`].
pub async fn wait_until_ready<C, Fut>(
    policy: &ProbePolicy,
    mut connect: C,
) -> Result<Connected, EntrykitError>
where
    C: FnMut() -> Fut,
    Fut: Future<Output = Result<(), EntrykitError>>,
{
    let attempts = AtomicU32::new(0);
    let retry_policy = ConstantBuilder::default()
        .with_delay(policy.retry_delay)
        .with_max_times(policy.max_attempts.saturating_sub(1) as usize);
    let attempt_timeout = policy.attempt_timeout;

    let result = (|| {
        let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
        let fut = connect();
        async move {
            match tokio::time::timeout(attempt_timeout, fut).await {
                Ok(Ok(())) => {
                    debug!(attempt, "connection attempt succeeded");
                    Ok(attempt)
                }
                Ok(Err(e)) => Err(e),
                Err(_) => Err(EntrykitError::AttemptTimeout(attempt_timeout)),
            }
        }
    })
    .retry(retry_policy)
    .when(|e: &EntrykitError| e.is_retryable())
    .notify(|err, dur: Duration| {
        warn!(
            attempt = attempts.load(Ordering::Relaxed),
            error = %err,
            "database not ready, retrying in {:?}",
            dur
        );
    })
    .await;

    match result {
        Ok(attempt) => Ok(Connected { attempt }),
        Err(e) if e.is_retryable() => Err(EntrykitError::Exhausted {
            attempts: attempts.load(Ordering::Relaxed),
            source: Box::new(e),
        }),
        Err(e) => Err(e),
    }
}
