//! Mock lookup tools exposed to the model as function declarations

pub mod guidelines;
pub mod symptom_checker;

pub use guidelines::{lookup_guideline, FALLBACK_GUIDELINE};
pub use symptom_checker::summarize_symptoms;

use crate::agent::ToolSpec;
use serde_json::{json, Value};
use tracing::debug;

/// The fixed set of tools agents can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolId {
    SymptomChecker,
    GuidelineLookup,
}

impl ToolId {
    /// Wire name of the tool, as declared to the model
    pub fn name(self) -> &'static str {
        match self {
            ToolId::SymptomChecker => "symptom_checker",
            ToolId::GuidelineLookup => "medical_guideline_lookup",
        }
    }

    /// Function declaration for the model
    pub fn spec(self) -> ToolSpec {
        match self {
            ToolId::SymptomChecker => ToolSpec {
                name: self.name().to_string(),
                description: "Checks symptoms and provides basic medical information".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "symptoms": {
                            "type": "string",
                            "description": "Patient symptoms to check"
                        },
                        "age": {
                            "type": "integer",
                            "description": "Patient age"
                        },
                        "gender": {
                            "type": "string",
                            "description": "Patient gender"
                        }
                    },
                    "required": ["symptoms", "age", "gender"]
                }),
            },
            ToolId::GuidelineLookup => ToolSpec {
                name: self.name().to_string(),
                description: "Looks up current medical guidelines for specific conditions"
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "condition": {
                            "type": "string",
                            "description": "Medical condition to check guidelines for"
                        }
                    },
                    "required": ["condition"]
                }),
            },
        }
    }
}

/// Dispatches model function calls to the mock tools
///
/// Tool failures never abort a run: unknown names and missing arguments
/// produce textual results the model can react to.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry;

impl ToolRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Invoke a tool by wire name with JSON arguments
    ///
    /// `allowed` is the agent's static tool binding; calls to tools outside
    /// it are refused with a textual result.
    pub fn invoke(&self, allowed: &[ToolId], name: &str, args: &Value) -> String {
        let tool = match allowed.iter().find(|t| t.name() == name) {
            Some(tool) => *tool,
            None => {
                debug!("refused call to unbound tool '{}'", name);
                return format!("Tool '{}' is not available to this agent", name);
            }
        };

        match tool {
            ToolId::SymptomChecker => {
                let symptoms = args["symptoms"].as_str().unwrap_or_default();
                let age = args["age"].as_u64().unwrap_or_default();
                let gender = args["gender"].as_str().unwrap_or_default();
                summarize_symptoms(symptoms, age, gender)
            }
            ToolId::GuidelineLookup => {
                let condition = args["condition"].as_str().unwrap_or_default();
                lookup_guideline(condition).to_string()
            }
        }
    }
}
