//! In-memory task state store
//!
//! Tracks every task the orchestrator has accepted, keyed by task id. The
//! store holds the orchestrator's view of a task, not the remote agents'
//! copies; the aggregator writes the reconciled snapshot back here after each
//! dispatch settles.

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::protocol::messages::{Task, TaskState, TaskStatus};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Thread-safe store of orchestrator task snapshots
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Arc<RwLock<HashMap<String, Task>>>,
}

impl TaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a task snapshot
    pub fn upsert(&self, task: Task) {
        let mut tasks = self.tasks.write().unwrap();
        debug!(task_id = %task.id, state = ?task.status.state, "Storing task snapshot");
        tasks.insert(task.id.clone(), task);
    }

    /// Get a task snapshot by id
    pub fn get(&self, task_id: &str) -> Option<Task> {
        let tasks = self.tasks.read().unwrap();
        tasks.get(task_id).cloned()
    }

    /// Store a settled dispatch result, unless the task already went terminal
    ///
    /// Terminal states never transition again: a task canceled while its
    /// dispatch was still in flight keeps the canceled snapshot and the
    /// settled result is discarded. Returns whichever snapshot ends up stored.
    pub fn settle(&self, task: Task) -> Task {
        let mut tasks = self.tasks.write().unwrap();
        match tasks.get(&task.id) {
            Some(existing) if existing.status.state.is_terminal() => {
                debug!(
                    task_id = %task.id,
                    stored = ?existing.status.state,
                    settled = ?task.status.state,
                    "Discarding settled result for terminal task"
                );
                existing.clone()
            }
            _ => {
                debug!(task_id = %task.id, state = ?task.status.state, "Storing settled task");
                tasks.insert(task.id.clone(), task.clone());
                task
            }
        }
    }

    /// Mark a task canceled, returning the updated snapshot
    ///
    /// Tasks already in a terminal state stay untouched and the call fails
    /// with `TaskNotCancelable`.
    pub fn mark_canceled(&self, task_id: &str) -> OrchestratorResult<Task> {
        let mut tasks = self.tasks.write().unwrap();
        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| OrchestratorError::task_not_found(task_id))?;

        if task.status.state.is_terminal() {
            return Err(OrchestratorError::TaskNotCancelable {
                id: task_id.to_string(),
            });
        }

        task.status = TaskStatus::now(TaskState::Canceled);
        Ok(task.clone())
    }

    /// Number of stored tasks
    pub fn count(&self) -> usize {
        let tasks = self.tasks.read().unwrap();
        tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::Message;

    fn task(id: &str, state: TaskState) -> Task {
        Task {
            id: id.to_string(),
            session_id: Some("session-1".to_string()),
            status: TaskStatus::now(state),
            artifacts: None,
            metadata: None,
        }
    }

    #[test]
    fn test_upsert_and_get() {
        let store = TaskStore::new();
        store.upsert(task("t1", TaskState::Working));

        let stored = store.get("t1").unwrap();
        assert_eq!(stored.status.state, TaskState::Working);
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_upsert_replaces_snapshot() {
        let store = TaskStore::new();
        store.upsert(task("t1", TaskState::Working));
        store.upsert(task("t1", TaskState::Completed));

        assert_eq!(store.count(), 1);
        assert_eq!(store.get("t1").unwrap().status.state, TaskState::Completed);
    }

    #[test]
    fn test_settle_replaces_working_snapshot() {
        let store = TaskStore::new();
        store.upsert(task("t1", TaskState::Working));

        let stored = store.settle(task("t1", TaskState::Completed));
        assert_eq!(stored.status.state, TaskState::Completed);
        assert_eq!(store.get("t1").unwrap().status.state, TaskState::Completed);
    }

    #[test]
    fn test_settle_does_not_resurrect_canceled_task() {
        let store = TaskStore::new();
        store.upsert(task("t1", TaskState::Working));
        store.mark_canceled("t1").unwrap();

        let stored = store.settle(task("t1", TaskState::Completed));
        assert_eq!(stored.status.state, TaskState::Canceled);
        assert_eq!(store.get("t1").unwrap().status.state, TaskState::Canceled);
    }

    #[test]
    fn test_settle_inserts_when_absent() {
        let store = TaskStore::new();
        let stored = store.settle(task("t1", TaskState::Failed));
        assert_eq!(stored.status.state, TaskState::Failed);
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_cancel_working_task() {
        let store = TaskStore::new();
        store.upsert(task("t1", TaskState::Working));

        let canceled = store.mark_canceled("t1").unwrap();
        assert_eq!(canceled.status.state, TaskState::Canceled);
        assert_eq!(store.get("t1").unwrap().status.state, TaskState::Canceled);
    }

    #[test]
    fn test_cancel_terminal_task_rejected() {
        let store = TaskStore::new();
        store.upsert(task("t1", TaskState::Completed));

        let result = store.mark_canceled("t1");
        assert!(matches!(
            result,
            Err(OrchestratorError::TaskNotCancelable { .. })
        ));
        // Snapshot is untouched
        assert_eq!(store.get("t1").unwrap().status.state, TaskState::Completed);
    }

    #[test]
    fn test_cancel_missing_task() {
        let store = TaskStore::new();
        let result = store.mark_canceled("missing");
        assert!(matches!(result, Err(OrchestratorError::TaskNotFound { .. })));
    }

    #[test]
    fn test_cancel_input_required_task_allowed() {
        let store = TaskStore::new();
        let mut t = task("t1", TaskState::InputRequired);
        t.status = TaskStatus::now(TaskState::InputRequired)
            .with_message(Message::agent_text("which city?"));
        store.upsert(t);

        let canceled = store.mark_canceled("t1").unwrap();
        assert_eq!(canceled.status.state, TaskState::Canceled);
    }
}
