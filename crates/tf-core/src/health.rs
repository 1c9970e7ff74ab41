// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Service health monitor
//!
//! A process-wide binary health flag with optimistic auto-recovery.
//! Transport failures and degraded-service responses flip the flag to
//! `Offline` and arm a single recovery timer; when it elapses the flag
//! returns to `Online` without re-probing the service. A failure while
//! already offline re-arms the timer instead of stacking a second one.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Observed health of the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceHealth {
    Online,
    Offline,
}

struct HealthInner {
    health: ServiceHealth,
    notice: Option<String>,
    recovery: Option<JoinHandle<()>>,
    // Bumped on every transition request; a recovery task only applies
    // if its captured epoch is still current. Aborting the task handle
    // alone is not enough: an aborted task past its sleep could still
    // win the lock and flip the flag early.
    epoch: u64,
}

/// Health flag plus the armed/unarmed recovery timer
#[derive(Clone)]
pub struct HealthMonitor {
    inner: Arc<Mutex<HealthInner>>,
    recovery_delay: Duration,
}

impl HealthMonitor {
    /// Delay before an offline service is optimistically considered
    /// recovered.
    pub const DEFAULT_RECOVERY_DELAY: Duration = Duration::from_secs(5);

    pub fn new(recovery_delay: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HealthInner {
                health: ServiceHealth::Online,
                notice: None,
                recovery: None,
                epoch: 0,
            })),
            recovery_delay,
        }
    }

    pub fn health(&self) -> ServiceHealth {
        self.lock().health
    }

    pub fn is_online(&self) -> bool {
        self.health() == ServiceHealth::Online
    }

    /// The outage notice currently shown to the user, if any.
    pub fn notice(&self) -> Option<String> {
        self.lock().notice.clone()
    }

    /// Record a successful gateway exchange: the service is reachable,
    /// so any pending recovery is moot.
    pub fn report_online(&self) {
        let mut inner = self.lock();
        inner.epoch += 1;
        if let Some(handle) = inner.recovery.take() {
            handle.abort();
        }
        inner.health = ServiceHealth::Online;
        inner.notice = None;
    }

    /// Record a service outage and (re-)arm the recovery timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn report_outage(&self, notice: impl Into<String>) {
        let notice = notice.into();
        let mut inner = self.lock();
        inner.epoch += 1;
        let epoch = inner.epoch;
        if let Some(handle) = inner.recovery.take() {
            handle.abort();
        }
        if inner.health == ServiceHealth::Online {
            tracing::warn!(%notice, "remote service degraded");
        }
        inner.health = ServiceHealth::Offline;
        inner.notice = Some(notice);

        let shared = Arc::clone(&self.inner);
        let delay = self.recovery_delay;
        inner.recovery = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut inner = shared.lock().expect("health state poisoned");
            if inner.epoch == epoch {
                tracing::info!("assuming remote service recovered");
                inner.health = ServiceHealth::Online;
                inner.notice = None;
                inner.recovery = None;
            }
        }));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HealthInner> {
        self.inner.lock().expect("health state poisoned")
    }
}

impl Drop for HealthInner {
    fn drop(&mut self) {
        if let Some(handle) = self.recovery.take() {
            handle.abort();
        }
    }
}
