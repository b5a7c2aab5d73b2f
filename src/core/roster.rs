//! Agent roster - the four role descriptors and their tool bindings

use crate::core::config::{AgentsConfig, ConfigError, RoleConfig};
use crate::tools::ToolId;
use std::fmt;

/// The fixed set of roles in the diagnostic crew
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoleId {
    SymptomAnalyzer,
    DiagnosticSpecialist,
    TreatmentAdvisor,
    CareCoordinator,
}

impl RoleId {
    pub const ALL: [RoleId; 4] = [
        RoleId::SymptomAnalyzer,
        RoleId::DiagnosticSpecialist,
        RoleId::TreatmentAdvisor,
        RoleId::CareCoordinator,
    ];

    /// The key under which this role appears in agents.yaml
    pub fn key(self) -> &'static str {
        match self {
            RoleId::SymptomAnalyzer => "symptom_analyzer",
            RoleId::DiagnosticSpecialist => "diagnostic_specialist",
            RoleId::TreatmentAdvisor => "treatment_advisor",
            RoleId::CareCoordinator => "care_coordinator",
        }
    }

    /// Static tool bindings, fixed at configuration time
    pub fn tools(self) -> &'static [ToolId] {
        match self {
            RoleId::SymptomAnalyzer => &[ToolId::SymptomChecker],
            RoleId::DiagnosticSpecialist => &[ToolId::GuidelineLookup],
            RoleId::TreatmentAdvisor => &[ToolId::GuidelineLookup],
            RoleId::CareCoordinator => &[],
        }
    }

    fn index(self) -> usize {
        match self {
            RoleId::SymptomAnalyzer => 0,
            RoleId::DiagnosticSpecialist => 1,
            RoleId::TreatmentAdvisor => 2,
            RoleId::CareCoordinator => 3,
        }
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One agent: its role definition plus tool bindings
#[derive(Debug, Clone)]
pub struct AgentSpec {
    pub role: RoleId,
    pub definition: RoleConfig,
    pub tools: &'static [ToolId],
}

impl AgentSpec {
    /// Compose the system instruction from the role definition
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}.\n\nYour goal: {}\n\nBackstory: {}",
            self.definition.role.trim(),
            self.definition.goal.trim(),
            self.definition.backstory.trim()
        )
    }
}

/// The four agents, built once from the agent roster document
#[derive(Debug, Clone)]
pub struct AgentRoster {
    agents: Vec<AgentSpec>,
}

impl AgentRoster {
    /// Build the roster; fails if any expected role key is absent
    pub fn from_config(config: &AgentsConfig) -> Result<Self, ConfigError> {
        let mut agents = Vec::with_capacity(RoleId::ALL.len());
        for role in RoleId::ALL {
            agents.push(AgentSpec {
                role,
                definition: config.get(role)?.clone(),
                tools: role.tools(),
            });
        }
        Ok(Self { agents })
    }

    /// Get the agent for a role (total once constructed)
    pub fn agent(&self, role: RoleId) -> &AgentSpec {
        &self.agents[role.index()]
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
