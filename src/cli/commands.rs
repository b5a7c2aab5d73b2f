//! CLI command definitions

use clap::Args;

/// Run the diagnostic pipeline
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to the agent roster YAML file
    #[arg(long, default_value = "config/agents.yaml")]
    pub agents: String,

    /// Path to the task definitions YAML file
    #[arg(long, default_value = "config/tasks.yaml")]
    pub tasks: String,

    /// Model identifier override
    #[arg(short, long)]
    pub model: Option<String>,

    /// Patient demographics, overrides the sample record
    #[arg(long)]
    pub patient_info: Option<String>,

    /// Presenting symptoms, overrides the sample record
    #[arg(long)]
    pub symptoms: Option<String>,

    /// Medical history, overrides the sample record
    #[arg(long)]
    pub medical_history: Option<String>,

    /// Per-stage timeout in seconds
    #[arg(long, default_value_t = 120)]
    pub stage_timeout_secs: u64,
}

/// Validate the agent and task configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to the agent roster YAML file
    #[arg(long, default_value = "config/agents.yaml")]
    pub agents: String,

    /// Path to the task definitions YAML file
    #[arg(long, default_value = "config/tasks.yaml")]
    pub tasks: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
