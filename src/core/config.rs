//! Agent and task rosters from YAML

use crate::core::roster::RoleId;
use crate::core::stage::StageId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed YAML document")]
    Parse(#[from] serde_yaml::Error),

    #[error("missing {kind} entry '{key}'")]
    MissingKey { kind: &'static str, key: &'static str },

    #[error("{kind} entry '{key}' has an empty '{field}' field")]
    EmptyField {
        kind: &'static str,
        key: &'static str,
        field: &'static str,
    },

    #[error("unknown placeholder '{{{name}}}' in task '{task}'")]
    UnknownPlaceholder { task: &'static str, name: String },

    #[error("task '{task}' references the output of '{upstream}', which does not run before it")]
    UpstreamOrder {
        task: &'static str,
        upstream: &'static str,
    },
}

/// Role definition for one agent, as declared in agents.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Short role title
    pub role: String,

    /// What the agent is trying to achieve
    pub goal: String,

    /// Persona backstory used in the system prompt
    pub backstory: String,
}

/// Stage definition for one task, as declared in tasks.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Prompt template with `{name}` placeholders
    pub description: String,

    /// Free-text description of the expected output
    pub expected_output: String,
}

/// The agent roster document (agents.yaml)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentsConfig {
    entries: HashMap<String, RoleConfig>,
}

/// The task roster document (tasks.yaml)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TasksConfig {
    entries: HashMap<String, TaskConfig>,
}

impl AgentsConfig {
    /// Load the agent roster from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse the agent roster from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: AgentsConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every expected role is present with non-empty fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        for role in RoleId::ALL {
            let entry = self.get(role)?;
            for (field, value) in [
                ("role", &entry.role),
                ("goal", &entry.goal),
                ("backstory", &entry.backstory),
            ] {
                if value.trim().is_empty() {
                    return Err(ConfigError::EmptyField {
                        kind: "agent",
                        key: role.key(),
                        field,
                    });
                }
            }
        }
        Ok(())
    }

    /// Get the definition for a role
    pub fn get(&self, role: RoleId) -> Result<&RoleConfig, ConfigError> {
        self.entries.get(role.key()).ok_or(ConfigError::MissingKey {
            kind: "agent",
            key: role.key(),
        })
    }
}

impl TasksConfig {
    /// Load the task roster from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse the task roster from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: TasksConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every expected task is present with non-empty fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        for stage in StageId::ALL {
            let entry = self.get(stage)?;
            for (field, value) in [
                ("description", &entry.description),
                ("expected_output", &entry.expected_output),
            ] {
                if value.trim().is_empty() {
                    return Err(ConfigError::EmptyField {
                        kind: "task",
                        key: stage.task_key(),
                        field,
                    });
                }
            }
        }
        Ok(())
    }

    /// Get the definition for a stage's task
    pub fn get(&self, stage: StageId) -> Result<&TaskConfig, ConfigError> {
        self.entries
            .get(stage.task_key())
            .ok_or(ConfigError::MissingKey {
                kind: "task",
                key: stage.task_key(),
            })
    }
}
