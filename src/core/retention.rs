//! Retention job - periodic deletion of old transactions.
//!
//! The job runs as one Tokio task per process and stops when its
//! [`CancellationToken`] fires. Each tick is a single bulk delete, so
//! cancelling never leaves a pass half-applied.

use crate::{
    entities::{Transaction, transaction},
    errors::{Error, Result},
};
use sea_orm::prelude::*;
use std::time::Duration;
use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// How old a transaction may get and how often the job checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    older_than: Duration,
    interval: Duration,
}

impl RetentionPolicy {
    /// Builds a policy.
    ///
    /// # Errors
    /// Returns `Validation` for a zero interval or an age too large to subtract
    /// from the current time.
    pub fn new(older_than: Duration, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::Validation {
                message: "retention interval must be greater than zero".to_string(),
            });
        }
        cutoff(older_than)?;

        Ok(Self {
            older_than,
            interval,
        })
    }

    /// Minimum age of a transaction before it is pruned
    #[must_use]
    pub const fn older_than(&self) -> Duration {
        self.older_than
    }

    /// Time between retention passes
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

fn cutoff(older_than: Duration) -> Result<DateTimeUtc> {
    chrono::Duration::from_std(older_than)
        .ok()
        .and_then(|age| chrono::Utc::now().checked_sub_signed(age))
        .ok_or_else(|| Error::Validation {
            message: format!("retention age {older_than:?} is out of range"),
        })
}

/// Deletes every transaction created more than `older_than` ago.
///
/// Returns the number of transactions removed.
#[instrument(skip(db))]
pub async fn prune_transactions_older_than<C>(db: &C, older_than: Duration) -> Result<u64>
where
    C: ConnectionTrait,
{
    let cutoff = cutoff(older_than)?;

    let result = Transaction::delete_many()
        .filter(transaction::Column::CreatedAt.lt(cutoff))
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        info!(
            "Pruned {} transactions created before {}",
            result.rows_affected, cutoff
        );
    }
    Ok(result.rows_affected)
}

/// Spawns the retention loop on the Tokio runtime.
///
/// The first pass runs one interval after start. The returned handle completes
/// once `cancel` has fired.
pub fn start_retention_job(
    db: DatabaseConnection,
    policy: RetentionPolicy,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(run_retention_job(db, policy, cancel))
}

async fn run_retention_job(db: DatabaseConnection, policy: RetentionPolicy, cancel: CancellationToken) {
    info!(
        "Retention job started (older than {:?}, every {:?})",
        policy.older_than, policy.interval
    );

    let mut ticker = tokio::time::interval_at(Instant::now() + policy.interval, policy.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                match prune_transactions_older_than(&db, policy.older_than).await {
                    Ok(count) => debug!("Retention pass removed {} transactions", count),
                    Err(e) => warn!("Retention pass failed: {}", e),
                }
            }
        }
    }

    info!("Retention job stopped");
}
