//! A2A message types
//!
//! This module defines the structures exchanged between the orchestrator and
//! remote client agents: agent cards (capability descriptors), tasks with
//! their status lifecycle, and multi-part messages.
//!
//! Field names follow the A2A wire format (camelCase keys, kebab-case task
//! states) so cards and tasks interoperate with agents built on other A2A
//! implementations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Agent card describing a remote agent's identity and capabilities
///
/// Served by every A2A agent at `/.well-known/agent.json`. The orchestrator
/// resolves cards at startup and stores them in the registry for dispatch
/// decisions.
///
/// # Examples
/// ```
/// use a2a_orchestrator::protocol::{AgentCard, AgentCapabilities, AgentSkill};
///
/// let card = AgentCard {
///     name: "Planner Agent".to_string(),
///     description: "Plans outings and events".to_string(),
///     url: "http://localhost:10003".to_string(),
///     version: "1.0.0".to_string(),
///     default_input_modes: vec!["text/plain".to_string()],
///     default_output_modes: vec!["text/plain".to_string()],
///     capabilities: AgentCapabilities::default(),
///     skills: vec![AgentSkill {
///         id: "planning".to_string(),
///         name: "Event Planning".to_string(),
///         description: Some("Creates event plans".to_string()),
///         tags: vec!["planning".to_string()],
///         examples: None,
///     }],
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    /// Unique agent name used as the registry key
    pub name: String,
    /// Human-readable description used for agent selection
    pub description: String,
    /// Base URL of the agent's A2A endpoint
    pub url: String,
    /// Agent version string
    pub version: String,
    /// MIME types the agent accepts
    #[serde(default)]
    pub default_input_modes: Vec<String>,
    /// MIME types the agent produces
    #[serde(default)]
    pub default_output_modes: Vec<String>,
    /// Transport capabilities
    #[serde(default)]
    pub capabilities: AgentCapabilities,
    /// Skills offered by this agent
    #[serde(default)]
    pub skills: Vec<AgentSkill>,
}

impl AgentCard {
    /// Check whether this agent advertises a skill matching the given tag
    /// (case-insensitive over skill ids, names, and tags)
    pub fn has_skill(&self, skill: &str) -> bool {
        let skill_lower = skill.to_lowercase();
        self.skills.iter().any(|s| {
            s.id.to_lowercase() == skill_lower
                || s.name.to_lowercase() == skill_lower
                || s.tags.iter().any(|t| t.to_lowercase() == skill_lower)
        })
    }
}

/// Agent transport capabilities
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    /// Whether the agent supports streaming responses
    #[serde(default)]
    pub streaming: bool,
    /// Whether the agent supports push notifications
    #[serde(default)]
    pub push_notifications: bool,
}

/// A single skill advertised on an agent card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSkill {
    /// Skill identifier (stable, machine-oriented)
    pub id: String,
    /// Display name
    pub name: String,
    /// What the skill does
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tags used for routing lookups
    #[serde(default)]
    pub tags: Vec<String>,
    /// Example invocations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
}

/// Message role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

/// Multi-part message exchanged within a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

impl Message {
    /// Build a user message with a single text part
    pub fn user_text<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
            metadata: None,
        }
    }

    /// Build an agent message with a single text part
    pub fn agent_text<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::Agent,
            parts: vec![Part::text(text)],
            metadata: None,
        }
    }

    /// Concatenate all text parts of this message
    pub fn text_content(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A single content part within a message or artifact
///
/// Tagged union over text, structured data, and file content. File bytes are
/// base64-encoded on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Part {
    Text { text: String },
    Data { data: Value },
    File { file: FileContent },
}

impl Part {
    /// Build a text part
    pub fn text<S: Into<String>>(text: S) -> Self {
        Part::Text { text: text.into() }
    }

    /// Build a structured data part
    pub fn data(data: Value) -> Self {
        Part::Data { data }
    }
}

/// File content carried inside a file part
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Base64-encoded file bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<String>,
    /// URI alternative to inline bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl FileContent {
    /// Decode the inline base64 bytes, if present
    pub fn decode_bytes(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        use base64::Engine;
        self.bytes
            .as_deref()
            .map(|b| base64::engine::general_purpose::STANDARD.decode(b))
    }
}

/// Task lifecycle state
///
/// Kebab-case on the wire (`input-required`). Terminal states never
/// transition again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
    Completed,
    Canceled,
    Failed,
    Unknown,
}

impl TaskState {
    /// Terminal states cannot be canceled or updated further
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Canceled | TaskState::Failed
        )
    }
}

/// Current status of a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    pub state: TaskState,
    /// Status message from the handling agent (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    /// RFC 3339 timestamp of the last state change
    pub timestamp: DateTime<Utc>,
}

impl TaskStatus {
    /// Build a status in the given state with the current timestamp
    pub fn now(state: TaskState) -> Self {
        Self {
            state,
            message: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach a status message
    pub fn with_message(mut self, message: Message) -> Self {
        self.message = Some(message);
        self
    }
}

/// Output artifact produced by an agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

/// A task tracked by the orchestrator
///
/// # Examples
/// ```
/// use a2a_orchestrator::protocol::{Task, TaskState, TaskStatus};
///
/// let task = Task {
///     id: "task-1".to_string(),
///     session_id: Some("session-1".to_string()),
///     status: TaskStatus::now(TaskState::Submitted),
///     artifacts: None,
///     metadata: None,
/// };
/// assert!(!task.status.state.is_terminal());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task identifier (client-supplied for idempotency)
    pub id: String,
    /// Session identifier for conversation continuity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Vec<Artifact>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

/// Parameters for `tasks/send`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskSendParams {
    /// Task identifier
    pub id: String,
    /// Session identifier (generated when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// The message to deliver
    pub message: Message,
    /// Output modes the caller accepts
    #[serde(default)]
    pub accepted_output_modes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

/// Parameters for `tasks/get` and `tasks/cancel`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskQueryParams {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_card() -> AgentCard {
        AgentCard {
            name: "Social Profile Agent".to_string(),
            description: "Analyzes social profiles".to_string(),
            url: "http://localhost:10002".to_string(),
            version: "1.0.0".to_string(),
            default_input_modes: vec!["text/plain".to_string()],
            default_output_modes: vec!["text/plain".to_string()],
            capabilities: AgentCapabilities {
                streaming: true,
                push_notifications: false,
            },
            skills: vec![AgentSkill {
                id: "profile_analysis".to_string(),
                name: "Profile Analysis".to_string(),
                description: Some("Analyzes a person's social activity".to_string()),
                tags: vec!["social".to_string(), "analysis".to_string()],
                examples: None,
            }],
        }
    }

    #[test]
    fn test_agent_card_serialization_uses_camel_case() {
        let card = sample_card();
        let json = serde_json::to_string(&card).unwrap();

        assert!(json.contains("\"defaultInputModes\""));
        assert!(json.contains("\"defaultOutputModes\""));
        assert!(json.contains("\"pushNotifications\""));

        let parsed: AgentCard = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, card);
    }

    #[test]
    fn test_agent_card_skill_matching() {
        let card = sample_card();

        // Matches by id, name, and tag (case-insensitive)
        assert!(card.has_skill("profile_analysis"));
        assert!(card.has_skill("Profile Analysis"));
        assert!(card.has_skill("SOCIAL"));
        assert!(card.has_skill("analysis"));

        assert!(!card.has_skill("posting"));
    }

    #[test]
    fn test_agent_card_deserializes_with_missing_optionals() {
        // Minimal card as a bare-bones agent might serve it
        let json = r#"{
            "name": "minimal",
            "description": "minimal agent",
            "url": "http://localhost:9999",
            "version": "0.1.0"
        }"#;

        let card: AgentCard = serde_json::from_str(json).unwrap();
        assert!(card.skills.is_empty());
        assert!(!card.capabilities.streaming);
    }

    #[test]
    fn test_task_state_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskState::InputRequired).unwrap(),
            "\"input-required\""
        );
        assert_eq!(
            serde_json::to_string(&TaskState::Completed).unwrap(),
            "\"completed\""
        );

        let parsed: TaskState = serde_json::from_str("\"input-required\"").unwrap();
        assert_eq!(parsed, TaskState::InputRequired);
    }

    #[test]
    fn test_terminal_states() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Canceled.is_terminal());
        assert!(TaskState::Failed.is_terminal());

        assert!(!TaskState::Submitted.is_terminal());
        assert!(!TaskState::Working.is_terminal());
        assert!(!TaskState::InputRequired.is_terminal());
        assert!(!TaskState::Unknown.is_terminal());
    }

    #[test]
    fn test_part_tagged_serialization() {
        let text = Part::text("hello");
        let json = serde_json::to_string(&text).unwrap();
        assert!(json.contains("\"type\":\"text\""));

        let data = Part::data(json!({"score": 0.9}));
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"type\":\"data\""));

        let file = Part::File {
            file: FileContent {
                name: Some("plan.png".to_string()),
                mime_type: Some("image/png".to_string()),
                bytes: Some("aGVsbG8=".to_string()),
                uri: None,
            },
        };
        let json = serde_json::to_string(&file).unwrap();
        assert!(json.contains("\"type\":\"file\""));
        assert!(json.contains("\"mimeType\""));
    }

    #[test]
    fn test_file_content_base64_decode() {
        let file = FileContent {
            name: Some("greeting.txt".to_string()),
            mime_type: Some("text/plain".to_string()),
            bytes: Some("aGVsbG8=".to_string()),
            uri: None,
        };

        let decoded = file.decode_bytes().unwrap().unwrap();
        assert_eq!(decoded, b"hello");

        let empty = FileContent {
            name: None,
            mime_type: None,
            bytes: None,
            uri: Some("https://example.com/f".to_string()),
        };
        assert!(empty.decode_bytes().is_none());
    }

    #[test]
    fn test_message_text_content() {
        let message = Message {
            role: Role::Agent,
            parts: vec![
                Part::text("line one"),
                Part::data(json!({"ignored": true})),
                Part::text("line two"),
            ],
            metadata: None,
        };

        assert_eq!(message.text_content(), "line one\nline two");
    }

    #[test]
    fn test_task_send_params_roundtrip() {
        let params = TaskSendParams {
            id: "task-42".to_string(),
            session_id: Some("session-7".to_string()),
            message: Message::user_text("Plan a night out"),
            accepted_output_modes: vec!["text".to_string(), "text/plain".to_string()],
            metadata: Some({
                let mut m = HashMap::new();
                m.insert("conversation_id".to_string(), json!("session-7"));
                m
            }),
        };

        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"sessionId\""));
        assert!(json.contains("\"acceptedOutputModes\""));

        let parsed: TaskSendParams = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, params);
    }

    #[test]
    fn test_task_roundtrip_with_artifacts() {
        let task = Task {
            id: "task-1".to_string(),
            session_id: Some("session-1".to_string()),
            status: TaskStatus::now(TaskState::Completed)
                .with_message(Message::agent_text("done")),
            artifacts: Some(vec![Artifact {
                name: Some("result".to_string()),
                parts: vec![Part::text("the plan")],
                metadata: None,
            }]),
            metadata: None,
        };

        let json = serde_json::to_string(&task).unwrap();
        let parsed: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, task);
        assert_eq!(parsed.status.state, TaskState::Completed);
    }
}
