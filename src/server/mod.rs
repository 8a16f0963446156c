//! HTTP server for the A2A endpoint
//!
//! Serves the JSON-RPC endpoint at `POST /`, the orchestrator's agent card at
//! the well-known path, and health/metrics endpoints for container
//! orchestration.

pub mod rpc_handler;

use crate::observability::metrics;
use crate::orchestrator::Orchestrator;
use serde::Serialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;
use warp::Filter;

/// The A2A orchestration HTTP server
pub struct A2aServer {
    orchestrator: Arc<Orchestrator>,
    ready: Arc<AtomicBool>,
}

impl A2aServer {
    /// Create a server for the given orchestrator
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Mark the server ready (flips the `/ready` probe)
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Relaxed);
    }

    /// Build the complete route tree
    pub fn routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let orchestrator = self.orchestrator.clone();
        let ready = self.ready.clone();

        // POST / - JSON-RPC endpoint
        let rpc_route = warp::path::end()
            .and(warp::post())
            .and(warp::body::bytes())
            .and(with_orchestrator(orchestrator.clone()))
            .and_then(|body: warp::hyper::body::Bytes, orchestrator: Arc<Orchestrator>| async move {
                let response = rpc_handler::dispatch(&body, orchestrator).await;
                Ok::<_, Infallible>(warp::reply::json(&response))
            });

        // GET /.well-known/agent.json - orchestrator agent card
        let card_route = warp::path!(".well-known" / "agent.json")
            .and(warp::get())
            .and(with_orchestrator(orchestrator.clone()))
            .and_then(|orchestrator: Arc<Orchestrator>| async move {
                Ok::<_, Infallible>(warp::reply::json(&orchestrator.own_card()))
            });

        // GET /health - overall health status
        let health_route = warp::path("health")
            .and(warp::get())
            .and(with_orchestrator(orchestrator))
            .and_then(|orchestrator: Arc<Orchestrator>| async move {
                let live_agents = orchestrator.registry().live_count();
                let status = HealthStatus {
                    status: "healthy".to_string(),
                    orchestrator_id: orchestrator.config().orchestrator.id.clone(),
                    live_agents,
                    timestamp: current_timestamp(),
                };
                Ok::<_, Infallible>(warp::reply::json(&status))
            });

        // GET /ready - readiness probe, true once bootstrap finished
        let ready_route = warp::path("ready")
            .and(warp::get())
            .and_then(move || {
                let ready = ready.clone();
                async move {
                    let is_ready = ready.load(Ordering::Relaxed);
                    let response = ReadinessResponse {
                        ready: is_ready,
                        timestamp: current_timestamp(),
                    };
                    let status_code = if is_ready { 200 } else { 503 };
                    Ok::<_, Infallible>(warp::reply::with_status(
                        warp::reply::json(&response),
                        warp::http::StatusCode::from_u16(status_code)
                            .unwrap_or(warp::http::StatusCode::OK),
                    ))
                }
            });

        // GET /live - liveness probe
        let live_route = warp::path("live").and(warp::get()).and_then(|| async move {
            let response = LivenessResponse {
                alive: true,
                timestamp: current_timestamp(),
            };
            Ok::<_, Infallible>(warp::reply::json(&response))
        });

        // GET /metrics - metrics snapshot
        let metrics_route = warp::path("metrics")
            .and(warp::get())
            .and_then(|| async move {
                Ok::<_, Infallible>(warp::reply::json(&metrics().get_metrics()))
            });

        rpc_route
            .or(card_route)
            .or(health_route)
            .or(ready_route)
            .or(live_route)
            .or(metrics_route)
            .with(warp::cors().allow_any_origin())
    }

    /// Run the server until the shutdown future resolves
    pub async fn run(
        self,
        addr: SocketAddr,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) {
        let routes = self.routes();
        self.set_ready(true);
        metrics().set_server_state("running");

        info!("A2A server listening on {}", addr);
        let (bound, serving) = warp::serve(routes).bind_with_graceful_shutdown(addr, shutdown);
        info!("Bound to {}", bound);
        serving.await;

        metrics().set_server_state("stopped");
        info!("A2A server stopped");
    }
}

fn with_orchestrator(
    orchestrator: Arc<Orchestrator>,
) -> impl Filter<Extract = (Arc<Orchestrator>,), Error = Infallible> + Clone {
    warp::any().map(move || orchestrator.clone())
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: String,
    orchestrator_id: String,
    live_agents: usize,
    timestamp: u64,
}

#[derive(Debug, Serialize)]
struct ReadinessResponse {
    ready: bool,
    timestamp: u64,
}

#[derive(Debug, Serialize)]
struct LivenessResponse {
    alive: bool,
    timestamp: u64,
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
