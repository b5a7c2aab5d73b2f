//! Events emitted during a pipeline run

use crate::core::{ExecutionStatus, RoleId, StageId};
use uuid::Uuid;

/// Events that can occur during pipeline execution
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PipelineStarted {
        run_id: Uuid,
        total_stages: usize,
    },
    StageStarted {
        stage: StageId,
        role: RoleId,
    },
    StageToolCall {
        stage: StageId,
        tool: String,
    },
    StageCompleted {
        stage: StageId,
        output: String,
    },
    PipelineCompleted {
        run_id: Uuid,
        status: ExecutionStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Box<dyn Fn(&ExecutionEvent) + Send + Sync>;
