//! Gemini model client

pub mod client;
pub mod gemini;
pub mod response;

pub use client::{AgentClientConfig, API_KEY_ENV};
pub use gemini::GeminiClient;
pub use response::{AgentError, ModelOutput, TokenUsage, ToolCall};

use async_trait::async_trait;
use serde_json::Value;

/// A function declaration advertised to the model
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments
    pub parameters: Value,
}

/// One conversation turn in a generation request
#[derive(Debug, Clone)]
pub enum Turn {
    /// A user prompt
    User { text: String },
    /// Function calls previously requested by the model
    ModelCalls { calls: Vec<ToolCall> },
    /// Results of executing those function calls
    ToolResults { results: Vec<ToolResult> },
}

/// The result of executing one tool call
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub name: String,
    pub content: String,
}

/// A single generation request
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// System instruction (role persona)
    pub system: Option<String>,

    /// Conversation so far, ending with a user or tool-result turn
    pub messages: Vec<Turn>,

    /// Tools the model may call
    pub tools: Vec<ToolSpec>,
}

/// Trait for model generation - allows for different implementations
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Run one generation and return the model's output
    async fn generate(&self, request: &ChatRequest) -> Result<ModelOutput, AgentError>;
}
