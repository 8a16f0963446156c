//! Orchestrator task manager
//!
//! Ties the registry, router, aggregator, and task store together behind the
//! operations the RPC surface exposes: send, get, cancel, register, list.

use crate::aggregator::{OutcomeKind, ResponseAggregator};
use crate::client::{AgentConnection, CardResolver};
use crate::config::OrchestratorConfig;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::observability::metrics;
use crate::orchestrator::factory::ConnectionFactory;
use crate::orchestrator::task_store::TaskStore;
use crate::protocol::messages::{
    AgentCapabilities, AgentCard, AgentSkill, Message, Task, TaskSendParams, TaskState, TaskStatus,
};
use crate::registry::AgentRegistry;
use crate::routing::{DispatchRequest, Router, SkillRouter};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Coordinates task dispatch across registered remote agents
pub struct Orchestrator {
    config: OrchestratorConfig,
    registry: AgentRegistry,
    router: Arc<dyn Router>,
    aggregator: ResponseAggregator,
    factory: Arc<dyn ConnectionFactory>,
    resolver: CardResolver,
    tasks: TaskStore,
}

impl Orchestrator {
    /// Create an orchestrator from configuration and a connection factory
    pub fn new(
        config: OrchestratorConfig,
        factory: Arc<dyn ConnectionFactory>,
    ) -> OrchestratorResult<Self> {
        let registry = AgentRegistry::new(Duration::from_secs(config.agents.registry_ttl_secs));
        let router = Arc::new(SkillRouter::new(
            config.dispatch.mode,
            config.dispatch.max_targets,
        ));
        let aggregator =
            ResponseAggregator::new(Duration::from_secs(config.agents.dispatch_timeout_secs));
        let resolver = CardResolver::new(Duration::from_secs(config.agents.card_timeout_secs))?;

        Ok(Self {
            config,
            registry,
            router,
            aggregator,
            factory,
            resolver,
            tasks: TaskStore::new(),
        })
    }

    /// The registry backing this orchestrator
    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// The configuration this orchestrator was built from
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Resolve and register all configured remote agents
    ///
    /// Unreachable agents are logged and skipped; the server starts with
    /// whatever subset of the configured fleet is up.
    pub async fn bootstrap(&self) {
        let addresses = &self.config.agents.addresses;
        if addresses.is_empty() {
            info!("No remote agent addresses configured");
            return;
        }

        info!("Resolving {} configured remote agents", addresses.len());
        let cards = self.resolver.resolve_all(addresses).await;
        for card in cards {
            self.register_agent(card);
        }
        info!(
            live = self.registry.live_count(),
            agents = ?self.registry.agent_names(),
            "Agent bootstrap complete"
        );
    }

    /// Spawn the background liveness refresher
    ///
    /// Periodically re-resolves the configured addresses so recovered agents
    /// rejoin the registry and their `last_seen` stays fresh, then sweeps
    /// expired entries. Agents registered via `agents/register` are expected
    /// to re-register within the TTL themselves.
    pub fn spawn_liveness_refresher(&self) -> tokio::task::JoinHandle<()> {
        let resolver = self.resolver.clone();
        let registry = self.registry.clone();
        let addresses = self.config.agents.addresses.clone();
        let interval = Duration::from_secs(self.config.agents.refresh_interval_secs);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; bootstrap already covered it
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let cards = resolver.resolve_all(&addresses).await;
                for card in cards {
                    registry.register(card);
                }
                registry.cleanup_expired();
                debug!(live = registry.live_count(), "Liveness refresh complete");
            }
        })
    }

    /// Handle `tasks/send`: route, dispatch, aggregate, and store the task
    pub async fn send_task(&self, params: TaskSendParams) -> OrchestratorResult<Task> {
        validate_send_params(&params)?;
        metrics().record_task_received();

        let mut params = params;
        if params.session_id.is_none() {
            params.session_id = Some(Uuid::new_v4().to_string());
        }

        info!(
            task_id = %params.id,
            session_id = ?params.session_id,
            "Task received"
        );

        // Visible as working through tasks/get while dispatches are in flight
        self.tasks.upsert(Task {
            id: params.id.clone(),
            session_id: params.session_id.clone(),
            status: TaskStatus::now(TaskState::Working),
            artifacts: None,
            metadata: params.metadata.clone(),
        });

        let request = DispatchRequest::from_params(&params);
        let plan = match self.router.plan(&request, &self.registry) {
            Ok(plan) => plan,
            Err(e) => {
                self.fail_task(&params, &e);
                return Err(e);
            }
        };

        info!(
            task_id = %params.id,
            targets = ?plan.target_names(),
            reason = %plan.reason,
            "Dispatch plan ready"
        );

        let mut connections: Vec<Arc<dyn AgentConnection>> = Vec::new();
        for entry in &plan.targets {
            match self.factory.connect(&entry.card) {
                Ok(connection) => {
                    metrics().record_dispatch_sent();
                    connections.push(connection);
                }
                Err(e) => {
                    warn!(agent = %entry.card.name, error = %e, "Could not build connection");
                    metrics().record_dispatch_failure();
                }
            }
        }

        if connections.is_empty() {
            let e = OrchestratorError::internal("no dispatch connections could be created");
            self.fail_task(&params, &e);
            return Err(e);
        }

        let result = self.aggregator.dispatch_and_collect(&params, connections).await;

        for outcome in &result.outcomes {
            match outcome.kind {
                OutcomeKind::Failed => metrics().record_dispatch_failure(),
                OutcomeKind::TimedOut => metrics().record_dispatch_timeout(),
                _ => {}
            }
        }
        // A concurrent cancel may have gone terminal first; the stored
        // snapshot wins over the settled result
        let settled = self.tasks.settle(result.task);

        match settled.status.state {
            TaskState::Completed => metrics().record_task_completed(),
            TaskState::Failed => metrics().record_task_failed(),
            TaskState::InputRequired => metrics().record_task_input_required(),
            _ => {}
        }

        Ok(settled)
    }

    /// Handle `tasks/get`
    pub fn get_task(&self, task_id: &str) -> OrchestratorResult<Task> {
        self.tasks
            .get(task_id)
            .ok_or_else(|| OrchestratorError::task_not_found(task_id))
    }

    /// Handle `tasks/cancel`
    ///
    /// Cancellation is local: dispatches settle within `tasks/send`, so by the
    /// time a cancel can observe a task it is either still working (no remote
    /// copy to revoke yet) or already terminal.
    pub fn cancel_task(&self, task_id: &str) -> OrchestratorResult<Task> {
        let task = self.tasks.mark_canceled(task_id)?;
        metrics().record_task_canceled();
        info!(task_id = %task_id, "Task canceled");
        Ok(task)
    }

    /// Handle `agents/register`: accept a card pushed by a remote agent
    pub fn register_agent(&self, card: AgentCard) -> AgentCard {
        let is_new = self.registry.get(&card.name).is_none();
        self.registry.register(card.clone());
        if is_new {
            metrics().record_agent_registered();
        }
        card
    }

    /// Handle `agents/list`: live agent cards, sorted by name
    pub fn list_agents(&self) -> Vec<AgentCard> {
        self.registry
            .list_live()
            .into_iter()
            .map(|entry| entry.card)
            .collect()
    }

    /// The orchestrator's own agent card, served at the well-known path
    pub fn own_card(&self) -> AgentCard {
        AgentCard {
            name: self.config.orchestrator.name.clone(),
            description: self.config.orchestrator.description.clone(),
            url: self.config.public_url(),
            version: self.config.orchestrator.version.clone(),
            default_input_modes: vec!["text".to_string(), "text/plain".to_string()],
            default_output_modes: vec!["text".to_string(), "text/plain".to_string()],
            capabilities: AgentCapabilities::default(),
            skills: vec![AgentSkill {
                id: "orchestrate".to_string(),
                name: "Task orchestration".to_string(),
                description: Some(
                    "Routes tasks to registered specialist agents and aggregates their replies"
                        .to_string(),
                ),
                tags: vec!["orchestration".to_string(), "routing".to_string()],
                examples: None,
            }],
        }
    }

    fn fail_task(&self, params: &TaskSendParams, error: &OrchestratorError) {
        metrics().record_task_failed();
        self.tasks.settle(Task {
            id: params.id.clone(),
            session_id: params.session_id.clone(),
            status: TaskStatus::now(TaskState::Failed)
                .with_message(Message::agent_text(error.to_string())),
            artifacts: None,
            metadata: params.metadata.clone(),
        });
    }
}

fn validate_send_params(params: &TaskSendParams) -> OrchestratorResult<()> {
    if params.id.trim().is_empty() {
        return Err(OrchestratorError::invalid_params("task id must not be empty"));
    }
    if params.message.parts.is_empty() {
        return Err(OrchestratorError::invalid_params(
            "message must contain at least one part",
        ));
    }
    Ok(())
}
