//! Model output types and errors

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error types for model client operations
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("rate limited (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// A function call requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Wire name of the tool
    pub name: String,

    /// JSON arguments as produced by the model
    pub args: Value,
}

/// One model generation: text, any requested tool calls, and usage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelOutput {
    /// Concatenated text parts of the response
    pub text: String,

    /// Function calls the model wants executed before it can answer
    pub tool_calls: Vec<ToolCall>,

    /// Token usage for this generation
    pub usage: TokenUsage,
}

impl ModelOutput {
    /// A plain text output with no tool calls
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text: content.into(),
            tool_calls: Vec::new(),
            usage: TokenUsage::default(),
        }
    }
}

/// Token usage information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl TokenUsage {
    /// Add another generation's usage into this accumulator
    pub fn accumulate(&mut self, other: TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
    }

    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_output_has_no_tool_calls() {
        let output = ModelOutput::text("Hello");
        assert_eq!(output.text, "Hello");
        assert!(output.tool_calls.is_empty());
    }

    #[test]
    fn test_usage_accumulates() {
        let mut usage = TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 5,
        };
        usage.accumulate(TokenUsage {
            prompt_tokens: 7,
            completion_tokens: 3,
        });
        assert_eq!(usage.prompt_tokens, 17);
        assert_eq!(usage.completion_tokens, 8);
        assert_eq!(usage.total_tokens(), 25);
    }
}
