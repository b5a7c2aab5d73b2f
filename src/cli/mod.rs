//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{RunCommand, ValidateCommand};

/// Multi-agent healthcare diagnostic assistant
#[derive(Debug, Parser, Clone)]
#[command(name = "carecrew")]
#[command(version = "0.1.0")]
#[command(about = "A four-stage healthcare diagnostic pipeline", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the diagnostic pipeline for a patient
    Run(RunCommand),

    /// Validate the agent and task configuration
    Validate(ValidateCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

use std::ffi::OsString;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_defaults() {
        let cli = Cli::try_parse_from(["carecrew", "run"]).unwrap();
        match cli.command {
            Command::Run(cmd) => {
                assert_eq!(cmd.agents, "config/agents.yaml");
                assert_eq!(cmd.tasks, "config/tasks.yaml");
                assert!(cmd.model.is_none());
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_parse_run_with_patient_overrides() {
        let cli = Cli::try_parse_from([
            "carecrew",
            "run",
            "--symptoms",
            "chest pain",
            "--stage-timeout-secs",
            "30",
        ])
        .unwrap();
        match cli.command {
            Command::Run(cmd) => {
                assert_eq!(cmd.symptoms.as_deref(), Some("chest pain"));
                assert_eq!(cmd.stage_timeout_secs, 30);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from(["carecrew", "validate", "--json"]).unwrap();
        match cli.command {
            Command::Validate(cmd) => assert!(cmd.json),
            _ => panic!("expected validate command"),
        }
    }

    #[test]
    fn test_global_verbose_flag() {
        let cli = Cli::try_parse_from(["carecrew", "run", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }
}
