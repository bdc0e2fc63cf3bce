//! Reconciler (C11): periodic, read-only drift detector between the
//! primary chunk count and the secondary point count.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::vectordb::{PrimaryStore, SecondaryStore, VectorDbError};

/// Default interval between reconciliation runs.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// One reconciliation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriftReport {
    pub primary_count: i64,
    pub secondary_count: i64,
    pub drift: i64,
}

/// Runs the drift check against both stores and logs a warning when nonzero.
/// Never mutates either store; repair is an operator action (§4.11).
pub struct Reconciler {
    primary: Arc<PrimaryStore>,
    secondary: Arc<SecondaryStore>,
    last_drift: AtomicI64,
}

impl Reconciler {
    pub fn new(primary: Arc<PrimaryStore>, secondary: Arc<SecondaryStore>) -> Self {
        Self {
            primary,
            secondary,
            last_drift: AtomicI64::new(0),
        }
    }

    /// Runs one reconciliation pass.
    pub async fn run_once(&self) -> Result<DriftReport, VectorDbError> {
        let primary_count = self.primary.count_chunks().await?;
        let secondary_count = self.secondary.count_points().await? as i64;
        let drift = (primary_count - secondary_count).abs();

        self.last_drift.store(drift, Ordering::Relaxed);

        if drift == 0 {
            info!(primary_count, secondary_count, "reconciliation: no drift");
        } else {
            warn!(
                event = "reconcile.drift",
                primary_count,
                secondary_count,
                drift,
                "primary/secondary chunk counts have diverged"
            );
        }

        Ok(DriftReport {
            primary_count,
            secondary_count,
            drift,
        })
    }

    /// Drift observed on the last completed run, or 0 before any run.
    pub fn last_drift(&self) -> i64 {
        self.last_drift.load(Ordering::Relaxed)
    }

    /// Runs `run_once` on a fixed interval until the process exits. Intended
    /// to be spawned as its own task at boot.
    pub async fn run_forever(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Err(e) = self.run_once().await {
                warn!(error = %e, "reconciliation pass failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drift_report_computes_absolute_difference() {
        let report = DriftReport {
            primary_count: 10,
            secondary_count: 7,
            drift: 3,
        };
        assert_eq!(report.drift, (report.primary_count - report.secondary_count).abs());
    }

}
