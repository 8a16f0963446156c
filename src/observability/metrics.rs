//! Thread-safe metrics collection system
//!
//! Atomic counters tracking task handling, dispatch activity, and registry
//! churn, exported as a JSON snapshot at `/metrics`.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Global metrics collector instance
pub static METRICS: Lazy<MetricsCollector> = Lazy::new(MetricsCollector::new);

/// Get reference to global metrics collector
pub fn metrics() -> &'static MetricsCollector {
    &METRICS
}

/// Thread-safe metrics collector using atomics
pub struct MetricsCollector {
    // Task handling metrics
    tasks_received: AtomicU64,
    tasks_completed: AtomicU64,
    tasks_failed: AtomicU64,
    tasks_canceled: AtomicU64,
    tasks_input_required: AtomicU64,

    // Dispatch metrics
    dispatches_sent: AtomicU64,
    dispatch_failures: AtomicU64,
    dispatch_timeouts: AtomicU64,

    // Registry metrics
    agents_registered: AtomicU64,
    agents_deregistered: AtomicU64,

    // Lifecycle metrics
    server_state: Mutex<String>,
    uptime_start: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            tasks_received: AtomicU64::new(0),
            tasks_completed: AtomicU64::new(0),
            tasks_failed: AtomicU64::new(0),
            tasks_canceled: AtomicU64::new(0),
            tasks_input_required: AtomicU64::new(0),
            dispatches_sent: AtomicU64::new(0),
            dispatch_failures: AtomicU64::new(0),
            dispatch_timeouts: AtomicU64::new(0),
            agents_registered: AtomicU64::new(0),
            agents_deregistered: AtomicU64::new(0),
            server_state: Mutex::new("initializing".to_string()),
            uptime_start: AtomicU64::new(current_timestamp()),
        }
    }

    pub fn record_task_received(&self) {
        self.tasks_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_task_completed(&self) {
        self.tasks_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_task_failed(&self) {
        self.tasks_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_task_canceled(&self) {
        self.tasks_canceled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_task_input_required(&self) {
        self.tasks_input_required.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dispatch_sent(&self) {
        self.dispatches_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dispatch_failure(&self) {
        self.dispatch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dispatch_timeout(&self) {
        self.dispatch_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_agent_registered(&self) {
        self.agents_registered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_agent_deregistered(&self) {
        self.agents_deregistered.fetch_add(1, Ordering::Relaxed);
    }

    /// Update server lifecycle state ("initializing", "running", "stopping", ...)
    pub fn set_server_state(&self, state: &str) {
        let mut current = self.server_state.lock().unwrap();
        *current = state.to_string();
    }

    /// Get a serializable snapshot of all metrics
    pub fn get_metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tasks: TaskMetrics {
                received: self.tasks_received.load(Ordering::Relaxed),
                completed: self.tasks_completed.load(Ordering::Relaxed),
                failed: self.tasks_failed.load(Ordering::Relaxed),
                canceled: self.tasks_canceled.load(Ordering::Relaxed),
                input_required: self.tasks_input_required.load(Ordering::Relaxed),
            },
            dispatch: DispatchMetrics {
                sent: self.dispatches_sent.load(Ordering::Relaxed),
                failures: self.dispatch_failures.load(Ordering::Relaxed),
                timeouts: self.dispatch_timeouts.load(Ordering::Relaxed),
            },
            registry: RegistryMetrics {
                registered: self.agents_registered.load(Ordering::Relaxed),
                deregistered: self.agents_deregistered.load(Ordering::Relaxed),
            },
            lifecycle: LifecycleMetrics {
                server_state: self.server_state.lock().unwrap().clone(),
                uptime_seconds: current_timestamp()
                    .saturating_sub(self.uptime_start.load(Ordering::Relaxed)),
            },
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable snapshot of all metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub tasks: TaskMetrics,
    pub dispatch: DispatchMetrics,
    pub registry: RegistryMetrics,
    pub lifecycle: LifecycleMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskMetrics {
    pub received: u64,
    pub completed: u64,
    pub failed: u64,
    pub canceled: u64,
    pub input_required: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchMetrics {
    pub sent: u64,
    pub failures: u64,
    pub timeouts: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistryMetrics {
    pub registered: u64,
    pub deregistered: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LifecycleMetrics {
    pub server_state: String,
    pub uptime_seconds: u64,
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
