//! Stage domain model
//!
//! A stage binds a role to a prompt template. Every placeholder in the
//! template is classified up front into a typed [`Binding`]: either a patient
//! field or a reference to an upstream stage's output. The upstream
//! dependency set falls out of the bindings, so the one non-linear edge in
//! the pipeline (care coordination reading both the treatment plan and the
//! diagnostic assessment) is modeled explicitly rather than assumed away.

use crate::core::config::{ConfigError, TaskConfig};
use crate::core::context::StageContext;
use crate::core::patient::PatientRecord;
use crate::core::roster::RoleId;
use crate::core::template::PromptTemplate;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;

/// The fixed set of pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageId {
    SymptomAnalysis,
    DiagnosticRefinement,
    TreatmentRecommendation,
    CareCoordination,
}

impl StageId {
    pub const ALL: [StageId; 4] = [
        StageId::SymptomAnalysis,
        StageId::DiagnosticRefinement,
        StageId::TreatmentRecommendation,
        StageId::CareCoordination,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StageId::SymptomAnalysis => "symptom_analysis",
            StageId::DiagnosticRefinement => "diagnostic_refinement",
            StageId::TreatmentRecommendation => "treatment_recommendation",
            StageId::CareCoordination => "care_coordination",
        }
    }

    /// The key under which this stage's task appears in tasks.yaml
    pub fn task_key(self) -> &'static str {
        match self {
            StageId::SymptomAnalysis => "symptom_analysis_task",
            StageId::DiagnosticRefinement => "diagnostic_refinement_task",
            StageId::TreatmentRecommendation => "treatment_recommendation_task",
            StageId::CareCoordination => "care_coordination_task",
        }
    }

    /// The role assigned to this stage
    pub fn role(self) -> RoleId {
        match self {
            StageId::SymptomAnalysis => RoleId::SymptomAnalyzer,
            StageId::DiagnosticRefinement => RoleId::DiagnosticSpecialist,
            StageId::TreatmentRecommendation => RoleId::TreatmentAdvisor,
            StageId::CareCoordination => RoleId::CareCoordinator,
        }
    }

    /// The stage whose output a placeholder name refers to, if any
    pub fn from_output_placeholder(name: &str) -> Option<StageId> {
        match name {
            "symptom_analysis" => Some(StageId::SymptomAnalysis),
            "diagnostic_assessment" => Some(StageId::DiagnosticRefinement),
            "treatment_plan" => Some(StageId::TreatmentRecommendation),
            _ => None,
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patient fields addressable from templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientField {
    PatientInfo,
    Symptoms,
    MedicalHistory,
}

impl PatientField {
    fn from_key(name: &str) -> Option<PatientField> {
        match name {
            "patient_info" => Some(PatientField::PatientInfo),
            "symptoms" => Some(PatientField::Symptoms),
            "medical_history" => Some(PatientField::MedicalHistory),
            _ => None,
        }
    }

    pub fn extract<'a>(&self, patient: &'a PatientRecord) -> &'a str {
        match self {
            PatientField::PatientInfo => &patient.patient_info,
            PatientField::Symptoms => &patient.symptoms,
            PatientField::MedicalHistory => &patient.medical_history,
        }
    }
}

/// What a placeholder resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// A literal field of the patient record
    Patient(PatientField),
    /// The output of an upstream stage
    Upstream(StageId),
}

impl Binding {
    fn classify(name: &str) -> Option<Binding> {
        if let Some(field) = PatientField::from_key(name) {
            return Some(Binding::Patient(field));
        }
        StageId::from_output_placeholder(name).map(Binding::Upstream)
    }
}

/// Errors resolving a stage's prompt at run time
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("stage '{stage}' requires the output of '{upstream}', which has not completed")]
    MissingUpstream { stage: StageId, upstream: StageId },

    #[error("unresolved placeholder '{{{placeholder}}}' in stage '{stage}'")]
    Unresolved { stage: StageId, placeholder: String },
}

/// One stage invocation: role, template, bindings, and upstream dependencies
#[derive(Debug, Clone)]
pub struct Stage {
    pub id: StageId,
    pub role: RoleId,
    pub template: PromptTemplate,
    pub bindings: BTreeMap<String, Binding>,
    pub expected_output: String,
    pub upstream: BTreeSet<StageId>,
}

impl Stage {
    /// Build a stage from its task definition, classifying every placeholder
    pub fn from_task(id: StageId, task: &TaskConfig) -> Result<Self, ConfigError> {
        let template = PromptTemplate::parse(&task.description);

        let mut bindings = BTreeMap::new();
        let mut upstream = BTreeSet::new();

        for name in template.placeholders() {
            let binding =
                Binding::classify(name).ok_or_else(|| ConfigError::UnknownPlaceholder {
                    task: id.task_key(),
                    name: name.clone(),
                })?;

            if let Binding::Upstream(source) = binding {
                if source >= id {
                    return Err(ConfigError::UpstreamOrder {
                        task: id.task_key(),
                        upstream: source.as_str(),
                    });
                }
                upstream.insert(source);
            }

            bindings.insert(name.clone(), binding);
        }

        Ok(Self {
            id,
            role: id.role(),
            template,
            bindings,
            expected_output: task.expected_output.clone(),
            upstream,
        })
    }

    /// Render the stage prompt by resolving every binding explicitly
    pub fn render_prompt(
        &self,
        patient: &PatientRecord,
        context: &StageContext,
    ) -> Result<String, PromptError> {
        let mut values = HashMap::new();

        for (name, binding) in &self.bindings {
            let value = match binding {
                Binding::Patient(field) => field.extract(patient).to_string(),
                Binding::Upstream(source) => context
                    .output(*source)
                    .ok_or(PromptError::MissingUpstream {
                        stage: self.id,
                        upstream: *source,
                    })?
                    .to_string(),
            };
            values.insert(name.clone(), value);
        }

        self.template
            .render(&values)
            .map_err(|unbound| PromptError::Unresolved {
                stage: self.id,
                placeholder: unbound.0,
            })
    }
}
