use anyhow::{Context, Result};
use carecrew::agent::{AgentClientConfig, GeminiClient};
use carecrew::cli::commands::{RunCommand, ValidateCommand};
use carecrew::cli::output::*;
use carecrew::cli::{Cli, Command};
use carecrew::core::{AgentRoster, AgentsConfig, DiagnosticPipeline, PatientRecord, TasksConfig};
use carecrew::execution::{ExecutionEvent, PipelineRunner, RunnerOptions};
use std::sync::{Arc, Mutex};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd).await?,
        Command::Validate(cmd) => validate_pipeline(cmd)?,
    }

    Ok(())
}

fn load_pipeline(
    agents_path: &str,
    tasks_path: &str,
) -> Result<(AgentRoster, DiagnosticPipeline)> {
    let agents = AgentsConfig::from_file(agents_path)
        .context("Failed to load agent configuration")?;
    let tasks = TasksConfig::from_file(tasks_path)
        .context("Failed to load task configuration")?;

    let roster = AgentRoster::from_config(&agents)?;
    let pipeline = DiagnosticPipeline::build(&tasks)?;
    Ok((roster, pipeline))
}

async fn run_pipeline(cmd: &RunCommand) -> Result<()> {
    let (roster, pipeline) = load_pipeline(&cmd.agents, &cmd.tasks)?;

    println!(
        "{} Loaded diagnostic pipeline ({} stages)",
        INFO,
        style(pipeline.stages().len()).cyan()
    );

    // Build the patient record, starting from the bundled sample case
    let mut patient = PatientRecord::sample();
    if let Some(info) = &cmd.patient_info {
        patient.patient_info = info.clone();
    }
    if let Some(symptoms) = &cmd.symptoms {
        patient.symptoms = symptoms.clone();
    }
    if let Some(history) = &cmd.medical_history {
        patient.medical_history = history.clone();
    }

    let mut client_config = AgentClientConfig::from_env()?;
    if let Some(model) = &cmd.model {
        client_config = client_config.with_model(model.clone());
    }
    let client = GeminiClient::new(client_config)?;

    println!(
        "{} Using model {}",
        INFO,
        style(client.model()).bold()
    );

    let options = RunnerOptions {
        stage_timeout_secs: cmd.stage_timeout_secs,
        ..RunnerOptions::default()
    };
    let mut runner = PipelineRunner::new(&client).with_options(options);

    let progress = Arc::new(Mutex::new(create_progress_bar(pipeline.stages().len())));
    let handler_progress = Arc::clone(&progress);
    runner.on_event(move |event| {
        let message = format_execution_event(event);
        if let Ok(bar) = handler_progress.lock() {
            bar.println(message);
            if matches!(event, ExecutionEvent::StageCompleted { .. }) {
                bar.inc(1);
            }
        }
    });

    println!();
    let result = runner.run(&pipeline, &roster, &patient).await;
    if let Ok(bar) = progress.lock() {
        bar.finish_and_clear();
    }

    match result {
        Ok(report) => {
            println!("\n{}", banner("HEALTHCARE DIAGNOSTIC REPORT COMPLETE"));
            println!("\n{}\n", report.final_report);
            println!(
                "{} Run {} finished ({} tokens)",
                CHECK,
                style(&report.run_id.to_string()[..8]).dim(),
                style(report.usage.total_tokens()).cyan()
            );
            Ok(())
        }
        Err(e) => {
            println!("\n{} Diagnostic pipeline {}", CROSS, style("failed").red());
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn validate_pipeline(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating configuration...", INFO);

    match load_pipeline(&cmd.agents, &cmd.tasks) {
        Ok((roster, pipeline)) => {
            println!("{} Configuration is valid!", CHECK);
            println!("  Agents: {}", style(roster.len()).cyan());
            println!("  Stages: {}", style(pipeline.stages().len()).cyan());

            if cmd.json {
                let stages: Vec<_> = pipeline
                    .stages()
                    .iter()
                    .map(|stage| {
                        serde_json::json!({
                            "stage": stage.id.as_str(),
                            "role": stage.role.key(),
                            "depends_on": stage
                                .upstream
                                .iter()
                                .map(|s| s.as_str())
                                .collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                let data = serde_json::json!({ "stages": stages });
                println!("\n{}", serde_json::to_string_pretty(&data)?);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}
