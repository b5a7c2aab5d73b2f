//! Patient record model

use serde::{Deserialize, Serialize};

/// Immutable patient input consumed by every stage's template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Demographics and lifestyle summary
    pub patient_info: String,

    /// Presenting symptoms as reported
    pub symptoms: String,

    /// Relevant medical history
    pub medical_history: String,
}

impl PatientRecord {
    pub fn new(
        patient_info: impl Into<String>,
        symptoms: impl Into<String>,
        medical_history: impl Into<String>,
    ) -> Self {
        Self {
            patient_info: patient_info.into(),
            symptoms: symptoms.into(),
            medical_history: medical_history.into(),
        }
    }

    /// The embedded sample case used when no overrides are given
    pub fn sample() -> Self {
        Self::new(
            "45-year-old male, non-smoker, occasional alcohol",
            "Persistent headache for 3 days, blurred vision, nausea",
            "Mild hypertension, family history of migraines",
        )
    }
}
