//! Observability for the orchestration server
//!
//! Structured logging, metrics collection, and the health/metrics endpoints
//! served alongside the A2A endpoint.

pub mod logging;
pub mod metrics;

// Re-export for convenience
pub use logging::{init_default_logging, init_logging, LogFormat};
pub use metrics::{metrics, MetricsCollector, MetricsSnapshot};

// Span macros for structured logging
pub use logging::{dispatch_span, registry_span, task_span};
