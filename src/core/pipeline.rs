//! Pipeline domain model

use crate::core::config::{ConfigError, TasksConfig};
use crate::core::stage::{Stage, StageId};

/// The four-stage diagnostic pipeline, in fixed execution order
///
/// The dependency structure is a chain with one extra back-edge: stages 2 and
/// 3 each depend on their immediate predecessor, while care coordination
/// depends on both the treatment recommendation and the diagnostic
/// assessment.
#[derive(Debug, Clone)]
pub struct DiagnosticPipeline {
    stages: Vec<Stage>,
}

impl DiagnosticPipeline {
    /// Build the pipeline from the task roster
    ///
    /// Classifies every template placeholder and validates that upstream
    /// references only point at earlier stages.
    pub fn build(tasks: &TasksConfig) -> Result<Self, ConfigError> {
        let mut stages = Vec::with_capacity(StageId::ALL.len());
        for id in StageId::ALL {
            stages.push(Stage::from_task(id, tasks.get(id)?)?);
        }
        Ok(Self { stages })
    }

    /// Stages in execution order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Get a stage by id
    pub fn stage(&self, id: StageId) -> &Stage {
        // StageId::ALL and the build loop share the same order
        &self.stages[StageId::ALL.iter().position(|s| *s == id).unwrap_or(0)]
    }

    /// The final stage, whose output becomes the report
    pub fn final_stage(&self) -> StageId {
        StageId::CareCoordination
    }
}
