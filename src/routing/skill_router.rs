//! Skill-based dispatch router
//!
//! Selection order:
//! 1. An explicit agent pin routes to that agent or fails.
//! 2. A requested skill selects live agents advertising it.
//! 3. With no hints, all live agents are candidates.
//!
//! Candidates come out of the registry sorted by name, so ties break the same
//! way on every node. Single mode takes the first candidate; broadcast mode
//! takes up to `max_targets`.

use crate::config::DispatchMode;
use crate::error::OrchestratorError;
use crate::registry::{AgentEntry, AgentRegistry};
use crate::routing::router::{DispatchPlan, DispatchRequest, Router};
use tracing::{debug, info, warn};

/// Router that matches requested skills against registry entries
#[derive(Debug, Clone)]
pub struct SkillRouter {
    mode: DispatchMode,
    max_targets: usize,
}

impl SkillRouter {
    /// Create a router with the given dispatch mode and fan-out cap
    pub fn new(mode: DispatchMode, max_targets: usize) -> Self {
        Self { mode, max_targets }
    }

    fn candidates(
        &self,
        request: &DispatchRequest,
        registry: &AgentRegistry,
    ) -> Result<(Vec<AgentEntry>, String), OrchestratorError> {
        if let Some(name) = &request.target_agent {
            return match registry.get(name) {
                Some(entry) => {
                    let reason = format!("pinned to agent '{name}'");
                    Ok((vec![entry], reason))
                }
                None => {
                    warn!("Pinned agent '{}' not found or expired", name);
                    Err(OrchestratorError::agent_not_found(name))
                }
            };
        }

        if let Some(skill) = &request.skill {
            let matches = registry.find_by_skill(skill);
            if matches.is_empty() {
                warn!("No live agents advertise skill '{}'", skill);
                return Err(OrchestratorError::no_agent_available(skill));
            }
            let reason = format!("matched skill '{skill}' ({} candidates)", matches.len());
            return Ok((matches, reason));
        }

        let all = registry.list_live();
        if all.is_empty() {
            warn!("Registry has no live agents for unhinted dispatch");
            return Err(OrchestratorError::no_agent_available("any"));
        }
        let reason = format!("no routing hints ({} live agents)", all.len());
        Ok((all, reason))
    }
}

impl Router for SkillRouter {
    fn plan(
        &self,
        request: &DispatchRequest,
        registry: &AgentRegistry,
    ) -> Result<DispatchPlan, OrchestratorError> {
        debug!(
            task_id = %request.task_id,
            skill = ?request.skill,
            target_agent = ?request.target_agent,
            "Planning dispatch"
        );

        let (mut candidates, reason) = self.candidates(request, registry)?;

        let selected_reason = match self.mode {
            DispatchMode::Single => {
                candidates.truncate(1);
                format!("{reason}; single mode selected '{}'", candidates[0].card.name)
            }
            DispatchMode::Broadcast => {
                candidates.truncate(self.max_targets);
                format!(
                    "{reason}; broadcast to {} agent(s)",
                    candidates.len()
                )
            }
        };

        info!(
            task_id = %request.task_id,
            targets = ?candidates.iter().map(|e| e.card.name.as_str()).collect::<Vec<_>>(),
            "Dispatch plan: {}",
            selected_reason
        );

        Ok(DispatchPlan {
            targets: candidates,
            reason: selected_reason,
        })
    }
}
