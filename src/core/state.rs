//! Execution state models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Run has not started
    Pending,
    /// Run is in progress
    Running,
    /// Run completed successfully
    Completed,
    /// Run failed
    Failed,
}

/// State of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Unique run ID
    pub run_id: Uuid,

    /// Current status
    pub status: ExecutionStatus,

    /// When the run started
    pub started_at: Option<DateTime<Utc>>,

    /// When the run completed or failed
    pub completed_at: Option<DateTime<Utc>>,

    /// Total number of stages
    pub total_stages: usize,

    /// Number of completed stages
    pub completed_stages: usize,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            status: ExecutionStatus::Pending,
            started_at: None,
            completed_at: None,
            total_stages: 0,
            completed_stages: 0,
        }
    }

    /// Mark the run as started
    pub fn start(&mut self, total_stages: usize) {
        self.status = ExecutionStatus::Running;
        self.started_at = Some(Utc::now());
        self.total_stages = total_stages;
    }

    /// Mark the run as completed
    pub fn complete(&mut self) {
        self.status = ExecutionStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the run as failed
    pub fn fail(&mut self) {
        self.status = ExecutionStatus::Failed;
        self.completed_at = Some(Utc::now());
    }

    /// Progress as a fraction (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.total_stages == 0 {
            return 0.0;
        }
        self.completed_stages as f64 / self.total_stages as f64
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
