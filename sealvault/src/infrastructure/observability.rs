// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Operation-level observability (§1 `[AMBIENT]`): timers and a rolling
//! health snapshot around `open`/`save`/`merge_in`, modeled on the
//! teacher's `infrastructure/logging/observability.rs`. Key-strengthening
//! is the one CPU-bound operation in this library slow enough to need an
//! alert threshold of its own — a vault unlocking in 30 seconds instead of
//! 300ms is the signal something regressed (a much larger round count, or
//! a starved CPU), not a reason to fail the open.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{info, warn};

/// Thresholds past which `ObservabilityService` logs a warning instead of
/// staying silent. No threshold here ever turns into a hard failure —
/// observability never changes control flow.
#[derive(Debug, Clone, Copy)]
pub struct AlertThresholds {
    pub slow_key_derivation: Duration,
    pub max_error_rate_percent: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            slow_key_derivation: Duration::from_secs(5),
            max_error_rate_percent: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Tracker {
    active_operations: u32,
    total_operations: u64,
    failed_operations: u64,
    last_update: Instant,
}

impl Default for Tracker {
    fn default() -> Self {
        Self {
            active_operations: 0,
            total_operations: 0,
            failed_operations: 0,
            last_update: Instant::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy)]
pub struct SystemHealth {
    pub status: HealthStatus,
    pub active_operations: u32,
    pub total_operations: u64,
    pub error_rate_percent: f64,
}

/// Tracks in-flight `open`/`save`/`merge_in` operations and exposes a
/// point-in-time health snapshot. Cheaply `Clone`: the tracker itself lives
/// behind an `Arc<RwLock<_>>`, the same sharing pattern the teacher's
/// `ObservabilityService` uses for its performance tracker.
#[derive(Clone)]
pub struct ObservabilityService {
    tracker: Arc<RwLock<Tracker>>,
    thresholds: AlertThresholds,
}

impl ObservabilityService {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self {
            tracker: Arc::new(RwLock::new(Tracker::default())),
            thresholds,
        }
    }

    /// Begins tracking `operation_name`; the returned guard completes the
    /// operation (success or failure) when dropped, unless explicitly
    /// finished first.
    pub async fn start_operation(&self, operation_name: &'static str) -> OperationGuard {
        let mut tracker = self.tracker.write().await;
        tracker.active_operations += 1;
        tracker.total_operations += 1;
        tracker.last_update = Instant::now();
        OperationGuard {
            operation_name,
            start: Instant::now(),
            service: self.clone(),
            finished: false,
        }
    }

    async fn complete_operation(&self, operation_name: &str, elapsed: Duration, success: bool) {
        let mut tracker = self.tracker.write().await;
        if tracker.active_operations > 0 {
            tracker.active_operations -= 1;
        }
        if !success {
            tracker.failed_operations += 1;
        }
        tracker.last_update = Instant::now();

        info!(operation = operation_name, elapsed_ms = elapsed.as_millis() as u64, success, "operation completed");

        if operation_name == "derive_composite_key" && elapsed > self.thresholds.slow_key_derivation {
            warn!(
                operation = operation_name,
                elapsed_ms = elapsed.as_millis() as u64,
                threshold_ms = self.thresholds.slow_key_derivation.as_millis() as u64,
                "key derivation slower than the configured threshold"
            );
        }

        let error_rate = error_rate_percent(tracker.failed_operations, tracker.total_operations);
        if error_rate > self.thresholds.max_error_rate_percent {
            warn!(error_rate_percent = error_rate, "operation error rate above threshold");
        }
    }

    pub async fn health(&self) -> SystemHealth {
        let tracker = self.tracker.read().await;
        let error_rate = error_rate_percent(tracker.failed_operations, tracker.total_operations);
        let status = if error_rate > self.thresholds.max_error_rate_percent {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };
        SystemHealth {
            status,
            active_operations: tracker.active_operations,
            total_operations: tracker.total_operations,
            error_rate_percent: error_rate,
        }
    }
}

fn error_rate_percent(failed: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (failed as f64 / total as f64) * 100.0
    }
}

/// RAII operation tracker returned by `start_operation`. Marks the
/// operation as failed if dropped without an explicit `finish` call — the
/// same "unwind counts as failure" discipline the teacher's
/// `OperationTracker::drop` uses, so a `?`-propagated error out of a
/// `tracing::instrument`-ed function is still accounted for.
pub struct OperationGuard {
    operation_name: &'static str,
    start: Instant,
    service: ObservabilityService,
    finished: bool,
}

impl OperationGuard {
    pub async fn finish(mut self, success: bool) {
        self.finished = true;
        self.service.complete_operation(self.operation_name, self.start.elapsed(), success).await;
    }
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        if !self.finished {
            let service = self.service.clone();
            let operation_name = self.operation_name;
            let elapsed = self.start.elapsed();
            tokio::spawn(async move {
                service.complete_operation(operation_name, elapsed, false).await;
            });
        }
    }
}
