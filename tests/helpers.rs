//! Test utility clients for the diagnostic pipeline

use carecrew::agent::{
    AgentError, ChatRequest, ModelClient, ModelOutput, TokenUsage, ToolCall, Turn,
};
use carecrew::core::{AgentRoster, AgentsConfig, DiagnosticPipeline, TasksConfig};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const AGENTS_YAML: &str = include_str!("../config/agents.yaml");
pub const TASKS_YAML: &str = include_str!("../config/tasks.yaml");

/// Build the roster and pipeline from the bundled configuration
pub fn load_fixtures() -> (AgentRoster, DiagnosticPipeline) {
    let agents = AgentsConfig::from_yaml(AGENTS_YAML).expect("agents.yaml should parse");
    let tasks = TasksConfig::from_yaml(TASKS_YAML).expect("tasks.yaml should parse");
    (
        AgentRoster::from_config(&agents).expect("roster should build"),
        DiagnosticPipeline::build(&tasks).expect("pipeline should build"),
    )
}

/// Mock client that answers each call with a tag plus the user prompt it saw
///
/// Lets tests assert that a later stage's prompt really contains the earlier
/// stages' outputs.
pub struct EchoClient {
    counter: AtomicUsize,
}

impl EchoClient {
    pub fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ModelClient for EchoClient {
    async fn generate(&self, request: &ChatRequest) -> Result<ModelOutput, AgentError> {
        let idx = self.counter.fetch_add(1, Ordering::SeqCst);
        let user_text = request
            .messages
            .iter()
            .filter_map(|turn| match turn {
                Turn::User { text } => Some(text.as_str()),
                _ => None,
            })
            .last()
            .unwrap_or_default();
        Ok(ModelOutput::text(format!(
            "[echo {}]\n{}",
            idx + 1,
            user_text
        )))
    }
}

/// Mock client that never answers within any reasonable stage timeout
pub struct SleepyClient;

#[async_trait]
impl ModelClient for SleepyClient {
    async fn generate(&self, _request: &ChatRequest) -> Result<ModelOutput, AgentError> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Ok(ModelOutput::text("too late"))
    }
}

/// Mock client that fails on a specific call (1-based), succeeding otherwise
pub struct FailingClient {
    fail_on: usize,
    counter: AtomicUsize,
}

impl FailingClient {
    pub fn new(fail_on: usize) -> Self {
        Self {
            fail_on,
            counter: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ModelClient for FailingClient {
    async fn generate(&self, _request: &ChatRequest) -> Result<ModelOutput, AgentError> {
        let call = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(AgentError::Unavailable("simulated outage".to_string()));
        }
        Ok(ModelOutput::text(format!("response {}", call)))
    }
}

/// Mock client that replays scripted outputs and records every request
pub struct ScriptedClient {
    outputs: Mutex<Vec<ModelOutput>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new(outputs: Vec<ModelOutput>) -> Self {
        let mut outputs = outputs;
        outputs.reverse();
        Self {
            outputs: Mutex::new(outputs),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn text(content: &str) -> ModelOutput {
        ModelOutput::text(content.to_string())
    }

    pub fn tool_call(name: &str, args: serde_json::Value) -> ModelOutput {
        ModelOutput {
            text: String::new(),
            tool_calls: vec![ToolCall {
                name: name.to_string(),
                args,
            }],
            usage: TokenUsage::default(),
        }
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn generate(&self, request: &ChatRequest) -> Result<ModelOutput, AgentError> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request.clone());
        self.outputs
            .lock()
            .expect("script poisoned")
            .pop()
            .ok_or_else(|| AgentError::Internal("script exhausted".to_string()))
    }
}
