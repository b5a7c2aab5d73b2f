//! Model client configuration

use crate::agent::AgentError;

/// Environment variable holding the Gemini credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Configuration for the Gemini client
#[derive(Debug, Clone)]
pub struct AgentClientConfig {
    /// Model identifier
    pub model: String,

    /// API key; required to construct a client
    pub api_key: Option<String>,

    /// Override the API base URL (used by tests)
    pub base_url: Option<String>,

    /// Timeout for requests in seconds
    pub timeout_secs: u64,

    /// Maximum output tokens per generation
    pub max_output_tokens: usize,

    /// Sampling temperature
    pub temperature: Option<f32>,
}

impl Default for AgentClientConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: 120,
            max_output_tokens: 8192,
            temperature: None,
        }
    }
}

impl AgentClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the credential from the process environment
    pub fn from_env() -> Result<Self, AgentError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            AgentError::Configuration(format!("{} is not set in the environment", API_KEY_ENV))
        })?;
        Ok(Self::new().with_api_key(api_key))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
