//! Configuration loading and validation tests
//!
//! Tests focus on BEHAVIOR of configuration loading, validation, and error
//! handling: observable outcomes, not TOML parsing details.

use a2a_orchestrator::config::{ConfigError, DispatchMode, OrchestratorConfig};
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// load_from_file applies environment overrides, so tests that touch the
// process environment must not interleave with other loads
static ENV_GUARD: Mutex<()> = Mutex::new(());

#[test]
fn test_config_loads_successfully_from_valid_toml() {
    let _guard = ENV_GUARD.lock().unwrap();
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[orchestrator]
id = "orchestrate-agent"
name = "Orchestrate Agent"
description = "Coordinates specialized agents"

[server]
host = "127.0.0.1"
port = 10010

[agents]
addresses = ["http://localhost:10002", "http://localhost:10003"]
dispatch_timeout_secs = 30

[dispatch]
mode = "broadcast"
"#
    )
    .unwrap();

    let config = OrchestratorConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.orchestrator.id, "orchestrate-agent");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 10010);
    assert_eq!(config.agents.addresses.len(), 2);
    assert_eq!(config.agents.dispatch_timeout_secs, 30);
    assert_eq!(config.dispatch.mode, DispatchMode::Broadcast);
}

#[test]
fn test_config_defaults_applied_for_missing_sections() {
    let _guard = ENV_GUARD.lock().unwrap();
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[orchestrator]
id = "orchestrate-agent"
name = "Orchestrate Agent"
description = "Coordinates specialized agents"
"#
    )
    .unwrap();

    let config = OrchestratorConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 10000);
    assert_eq!(config.agents.registry_ttl_secs, 180);
    assert_eq!(config.dispatch.mode, DispatchMode::Single);
    assert_eq!(config.public_url(), "http://localhost:10000");
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let _guard = ENV_GUARD.lock().unwrap();
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "this is not toml [[[").unwrap();

    let result = OrchestratorConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_missing_file_is_read_error() {
    let _guard = ENV_GUARD.lock().unwrap();
    let result =
        OrchestratorConfig::load_from_file(std::path::Path::new("/nonexistent/orchestrator.toml"));
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_invalid_orchestrator_id_rejected_on_load() {
    let _guard = ENV_GUARD.lock().unwrap();
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[orchestrator]
id = "bad id!"
name = "Bad"
description = "Invalid id characters"
"#
    )
    .unwrap();

    let result = OrchestratorConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::InvalidOrchestratorId(_))));
}

#[test]
fn test_env_overrides_applied_on_load() {
    let _guard = ENV_GUARD.lock().unwrap();
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[orchestrator]
id = "orchestrate-agent"
name = "Orchestrate Agent"
description = "Coordinates specialized agents"

[agents]
addresses = ["http://localhost:10002"]
"#
    )
    .unwrap();

    std::env::set_var("A2A_SERVER_HOST", "10.0.0.5");
    std::env::set_var("A2A_SERVER_PORT", "10020");
    std::env::set_var("PUBLIC_URL", "https://orchestrate.example.com");
    std::env::set_var(
        "REMOTE_AGENT_ADDRESSES",
        "http://agents.internal:10002, http://agents.internal:10003",
    );

    let result = OrchestratorConfig::load_from_file(temp_file.path());

    std::env::remove_var("A2A_SERVER_HOST");
    std::env::remove_var("A2A_SERVER_PORT");
    std::env::remove_var("PUBLIC_URL");
    std::env::remove_var("REMOTE_AGENT_ADDRESSES");

    let config = result.unwrap();
    assert_eq!(config.server.host, "10.0.0.5");
    assert_eq!(config.server.port, 10020);
    assert_eq!(config.public_url(), "https://orchestrate.example.com");
    assert_eq!(
        config.agents.addresses,
        vec![
            "http://agents.internal:10002",
            "http://agents.internal:10003"
        ]
    );
}
