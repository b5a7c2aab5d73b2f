//! Stage context - outputs threaded between stages

use crate::core::stage::StageId;
use std::collections::BTreeMap;

/// Outputs of completed stages, keyed by stage
///
/// Owned by the runner for the duration of one pipeline run; each stage's
/// output is recorded here before the next stage starts.
#[derive(Debug, Clone, Default)]
pub struct StageContext {
    outputs: BTreeMap<StageId, String>,
}

impl StageContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the output of a completed stage
    pub fn set_output(&mut self, stage: StageId, output: String) {
        self.outputs.insert(stage, output);
    }

    /// Get the output of a completed stage
    pub fn output(&self, stage: StageId) -> Option<&str> {
        self.outputs.get(&stage).map(String::as_str)
    }

    /// Number of completed stages
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}
