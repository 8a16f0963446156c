//! Agent descriptor registry
//!
//! Tracks which remote agents exist, their advertised skills, and liveness.
//! Thread-safe registry with TTL-based expiry: entries go stale when the
//! liveness refresher has not confirmed the agent within the configured TTL,
//! and a rate-limited sweep removes them.

use crate::observability::metrics;
use crate::protocol::messages::AgentCard;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

/// Minimum interval between expiry sweeps
const CLEANUP_INTERVAL: Duration = Duration::from_secs(5);

/// A registered remote agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentEntry {
    /// The agent's card as last resolved
    pub card: AgentCard,
    /// When the agent first registered
    pub registered_at: DateTime<Utc>,
    /// Last successful card resolution or registration
    pub last_seen: DateTime<Utc>,
}

impl AgentEntry {
    /// Create a fresh entry for a newly resolved card
    pub fn new(card: AgentCard) -> Self {
        let now = Utc::now();
        Self {
            card,
            registered_at: now,
            last_seen: now,
        }
    }

    /// Check if this entry is expired relative to the given TTL
    pub fn is_expired(&self, ttl: Duration) -> bool {
        let age = Utc::now().signed_duration_since(self.last_seen);
        age.num_seconds() > ttl.as_secs() as i64
    }
}

/// Thread-safe registry of remote agent descriptors
///
/// # Examples
/// ```
/// use a2a_orchestrator::registry::AgentRegistry;
/// use a2a_orchestrator::protocol::AgentCard;
/// use std::time::Duration;
///
/// let registry = AgentRegistry::new(Duration::from_secs(180));
/// assert_eq!(registry.agent_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    /// Map of agent name to entry
    agents: Arc<RwLock<HashMap<String, AgentEntry>>>,
    /// Entry TTL before an agent is considered gone
    ttl: Duration,
    /// Last cleanup time for sweep rate limiting
    last_cleanup: Arc<RwLock<SystemTime>>,
}

impl AgentRegistry {
    /// Create a new empty registry with the given entry TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            agents: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            last_cleanup: Arc::new(RwLock::new(SystemTime::now())),
        }
    }

    /// Register or refresh an agent from its card
    ///
    /// The card name is the registry key. Re-registration refreshes
    /// `last_seen` and replaces the stored card, so capability changes on the
    /// remote side are picked up on the next liveness sweep.
    pub fn register(&self, card: AgentCard) {
        let name = card.name.clone();

        {
            let mut agents = self.agents.write().unwrap();
            match agents.get_mut(&name) {
                Some(entry) => {
                    entry.card = card;
                    entry.last_seen = Utc::now();
                    debug!("Refreshed agent entry: {}", name);
                }
                None => {
                    agents.insert(name.clone(), AgentEntry::new(card));
                    info!("Registered new agent: {}", name);
                }
            }
        }

        self.cleanup_expired();
    }

    /// Remove an agent by name, returning whether it was present
    pub fn deregister(&self, name: &str) -> bool {
        let mut agents = self.agents.write().unwrap();
        let removed = agents.remove(name).is_some();
        if removed {
            metrics().record_agent_deregistered();
            info!("Deregistered agent: {}", name);
        }
        removed
    }

    /// Get a live agent entry by name
    ///
    /// Expired entries are treated as absent even before the sweep removes
    /// them.
    pub fn get(&self, name: &str) -> Option<AgentEntry> {
        let agents = self.agents.read().unwrap();
        agents
            .get(name)
            .filter(|entry| !entry.is_expired(self.ttl))
            .cloned()
    }

    /// List all live agent entries, sorted by name for deterministic output
    pub fn list_live(&self) -> Vec<AgentEntry> {
        let agents = self.agents.read().unwrap();
        let mut live: Vec<AgentEntry> = agents
            .values()
            .filter(|entry| !entry.is_expired(self.ttl))
            .cloned()
            .collect();
        live.sort_by(|a, b| a.card.name.cmp(&b.card.name));
        live
    }

    /// Find live agents advertising a skill matching the given tag
    pub fn find_by_skill(&self, skill: &str) -> Vec<AgentEntry> {
        self.list_live()
            .into_iter()
            .filter(|entry| entry.card.has_skill(skill))
            .collect()
    }

    /// Get count of registered agents (including not-yet-swept expired ones)
    pub fn agent_count(&self) -> usize {
        let agents = self.agents.read().unwrap();
        agents.len()
    }

    /// Get count of live agents
    pub fn live_count(&self) -> usize {
        self.list_live().len()
    }

    /// All registered agent names (for logging)
    pub fn agent_names(&self) -> Vec<String> {
        let agents = self.agents.read().unwrap();
        let mut names: Vec<String> = agents.keys().cloned().collect();
        names.sort();
        names
    }

    /// Remove expired entries, rate-limited to one sweep per interval
    pub fn cleanup_expired(&self) {
        let now = SystemTime::now();

        let should_cleanup = {
            let mut last_cleanup = self.last_cleanup.write().unwrap();
            let since_last = now
                .duration_since(*last_cleanup)
                .unwrap_or(Duration::from_secs(0));

            if since_last >= CLEANUP_INTERVAL {
                *last_cleanup = now;
                true
            } else {
                false
            }
        };

        if !should_cleanup {
            return;
        }

        self.sweep();
    }

    fn sweep(&self) {
        let ttl = self.ttl;
        let (initial_count, removed_count) = {
            let mut agents = self.agents.write().unwrap();
            let initial_count = agents.len();
            let mut removed_count = 0;

            agents.retain(|name, entry| {
                if entry.is_expired(ttl) {
                    debug!("Removing expired agent: {}", name);
                    metrics().record_agent_deregistered();
                    removed_count += 1;
                    false
                } else {
                    true
                }
            });

            (initial_count, removed_count)
        };

        if removed_count > 0 {
            info!(
                "Cleaned up {} expired agents ({} -> {})",
                removed_count,
                initial_count,
                initial_count - removed_count
            );
        }
    }

    /// Insert an entry verbatim without refreshing its timestamps
    ///
    /// Bypasses the `last_seen` refresh so TTL expiry can be exercised
    /// directly. Production code registers through `register()`.
    #[doc(hidden)]
    pub fn insert_entry_unrefreshed(&self, entry: AgentEntry) {
        let name = entry.card.name.clone();
        let mut agents = self.agents.write().unwrap();
        agents.insert(name, entry);
    }

    /// Force an expiry sweep, bypassing the rate limit (tests only)
    #[doc(hidden)]
    pub fn force_sweep_for_test(&self) {
        self.sweep();
    }
}
