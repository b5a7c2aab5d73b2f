//! Core domain models

pub mod config;
pub mod context;
pub mod patient;
pub mod pipeline;
pub mod roster;
pub mod stage;
pub mod state;
pub mod template;

pub use config::{AgentsConfig, ConfigError, RoleConfig, TaskConfig, TasksConfig};
pub use context::StageContext;
pub use patient::PatientRecord;
pub use pipeline::DiagnosticPipeline;
pub use roster::{AgentRoster, AgentSpec, RoleId};
pub use stage::{Binding, PatientField, PromptError, Stage, StageId};
pub use state::{ExecutionStatus, RunState};
pub use template::PromptTemplate;
