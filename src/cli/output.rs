//! CLI output formatting

use crate::core::ExecutionStatus;
use crate::execution::ExecutionEvent;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");
pub static WRENCH: Emoji<'_, '_> = Emoji("🔧 ", "* ");

/// Create a progress bar over the pipeline's stages
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// A heavy separator line for report sections
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(60);
    format!("{}\n{}\n{}", rule, title, rule)
}

/// Format an execution status for display
pub fn format_status(status: ExecutionStatus) -> String {
    match status {
        ExecutionStatus::Pending => style("PENDING").dim().to_string(),
        ExecutionStatus::Running => style("RUNNING").yellow().to_string(),
        ExecutionStatus::Completed => style("COMPLETED").green().to_string(),
        ExecutionStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::PipelineStarted {
            run_id,
            total_stages,
        } => format!(
            "{} Starting diagnostic pipeline ({} stages, run {})",
            ROCKET,
            total_stages,
            style(&run_id.to_string()[..8]).dim()
        ),
        ExecutionEvent::StageStarted { stage, role } => format!(
            "{} {} ({})",
            SPINNER,
            style(stage).cyan(),
            style(role).dim()
        ),
        ExecutionEvent::StageToolCall { stage, tool } => format!(
            "{} {} calling {}",
            WRENCH,
            style(stage).dim(),
            style(tool).yellow()
        ),
        ExecutionEvent::StageCompleted { stage, output } => format!(
            "{} {}\n{}",
            CHECK,
            style(stage).cyan(),
            style(output).dim()
        ),
        ExecutionEvent::PipelineCompleted { run_id, status } => {
            let icon = match status {
                ExecutionStatus::Completed => CHECK,
                ExecutionStatus::Failed => CROSS,
                _ => INFO,
            };
            format!(
                "{} Pipeline {} - {}",
                icon,
                style(&run_id.to_string()[..8]).dim(),
                format_status(*status)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RoleId, StageId};
    use uuid::Uuid;

    #[test]
    fn test_banner_width() {
        let text = banner("REPORT");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 60);
        assert_eq!(lines[1], "REPORT");
    }

    #[test]
    fn test_format_stage_started() {
        let event = ExecutionEvent::StageStarted {
            stage: StageId::SymptomAnalysis,
            role: RoleId::SymptomAnalyzer,
        };
        let text = format_execution_event(&event);
        assert!(text.contains("symptom_analysis"));
    }

    #[test]
    fn test_format_pipeline_completed() {
        let event = ExecutionEvent::PipelineCompleted {
            run_id: Uuid::new_v4(),
            status: ExecutionStatus::Failed,
        };
        let text = format_execution_event(&event);
        assert!(text.contains("FAILED"));
    }
}
