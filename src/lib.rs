//! carecrew - a four-stage healthcare diagnostic pipeline
//!
//! Four specialist agents run in sequence: symptom analysis, diagnostic
//! refinement, treatment recommendation, and care coordination. Each stage's
//! prompt is rendered from a YAML task template whose placeholders resolve
//! from the patient record and from earlier stages' outputs.

pub mod agent;
pub mod cli;
pub mod core;
pub mod execution;
pub mod tools;

// Re-export commonly used types
pub use agent::{AgentClientConfig, AgentError, ChatRequest, GeminiClient, ModelClient, ModelOutput};
pub use core::{
    AgentRoster, ConfigError, DiagnosticPipeline, ExecutionStatus, PatientRecord, RoleId, StageId,
};
pub use execution::{DiagnosisReport, ExecutionError, ExecutionEvent, PipelineRunner, RunnerOptions};
