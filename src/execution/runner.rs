//! Pipeline runner - strictly sequential stage execution
//!
//! Stage i+1 does not start until stage i's output is recorded, because its
//! placeholders resolve from earlier stages' results. A failure at any stage
//! aborts the whole run; there are no retries and no partial results.

use crate::agent::{AgentError, ChatRequest, ModelClient, TokenUsage, ToolResult, Turn};
use crate::core::{
    AgentRoster, AgentSpec, DiagnosticPipeline, ExecutionStatus, PatientRecord, PromptError,
    RunState, Stage, StageContext, StageId,
};
use crate::execution::{EventHandler, ExecutionEvent};
use crate::tools::ToolRegistry;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Errors surfaced by a pipeline run
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("stage '{stage}' timed out after {secs}s")]
    Timeout { stage: StageId, secs: u64 },

    #[error("stage '{stage}' returned an empty response")]
    EmptyResponse { stage: StageId },

    #[error("stage '{stage}' exceeded {limit} tool rounds without answering")]
    ToolLoop { stage: StageId, limit: usize },
}

/// Runner tunables
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Per-stage timeout for the model call, in seconds
    pub stage_timeout_secs: u64,

    /// Maximum tool-call rounds per stage
    pub max_tool_rounds: usize,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            stage_timeout_secs: 120,
            max_tool_rounds: 4,
        }
    }
}

/// The final report of a completed run
#[derive(Debug, Clone)]
pub struct DiagnosisReport {
    /// Unique run ID
    pub run_id: Uuid,

    /// The final stage's text, the only output surfaced to the caller
    pub final_report: String,

    /// Accumulated token usage across all stages
    pub usage: TokenUsage,

    /// When the run started
    pub started_at: Option<DateTime<Utc>>,

    /// When the run completed
    pub completed_at: Option<DateTime<Utc>>,
}

/// Executes the diagnostic pipeline against a model client
pub struct PipelineRunner<'a, C> {
    client: &'a C,
    tools: ToolRegistry,
    options: RunnerOptions,
    handlers: Vec<EventHandler>,
}

impl<'a, C: ModelClient> PipelineRunner<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            tools: ToolRegistry::new(),
            options: RunnerOptions::default(),
            handlers: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: RunnerOptions) -> Self {
        self.options = options;
        self
    }

    /// Register an event handler
    pub fn on_event<F>(&mut self, handler: F)
    where
        F: Fn(&ExecutionEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    fn emit(&self, event: ExecutionEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }

    /// Run all four stages in order and return the final report
    pub async fn run(
        &self,
        pipeline: &DiagnosticPipeline,
        roster: &AgentRoster,
        patient: &PatientRecord,
    ) -> Result<DiagnosisReport, ExecutionError> {
        let mut state = RunState::new();
        state.start(pipeline.stages().len());

        info!("Starting diagnostic run {}", state.run_id);
        self.emit(ExecutionEvent::PipelineStarted {
            run_id: state.run_id,
            total_stages: state.total_stages,
        });

        let mut context = StageContext::new();
        let mut usage = TokenUsage::default();
        let mut final_report = String::new();

        for stage in pipeline.stages() {
            self.emit(ExecutionEvent::StageStarted {
                stage: stage.id,
                role: stage.role,
            });

            let agent = roster.agent(stage.role);
            let output = match self.run_stage(stage, agent, patient, &context, &mut usage).await {
                Ok(output) => output,
                Err(e) => {
                    error!("Stage {} failed: {}", stage.id, e);
                    state.fail();
                    self.emit(ExecutionEvent::PipelineCompleted {
                        run_id: state.run_id,
                        status: ExecutionStatus::Failed,
                    });
                    return Err(e);
                }
            };

            self.emit(ExecutionEvent::StageCompleted {
                stage: stage.id,
                output: output.clone(),
            });

            context.set_output(stage.id, output.clone());
            state.completed_stages += 1;
            final_report = output;
        }

        state.complete();
        info!("Diagnostic run {} completed", state.run_id);
        self.emit(ExecutionEvent::PipelineCompleted {
            run_id: state.run_id,
            status: ExecutionStatus::Completed,
        });

        Ok(DiagnosisReport {
            run_id: state.run_id,
            final_report,
            usage,
            started_at: state.started_at,
            completed_at: state.completed_at,
        })
    }

    /// Execute one stage: render its prompt, then run the tool-call loop
    async fn run_stage(
        &self,
        stage: &Stage,
        agent: &AgentSpec,
        patient: &PatientRecord,
        context: &StageContext,
        usage: &mut TokenUsage,
    ) -> Result<String, ExecutionError> {
        let prompt = stage.render_prompt(patient, context)?;
        debug!("Prompt for stage {}: {}", stage.id, prompt);

        let user_prompt = format!(
            "{}\n\nExpected output:\n{}",
            prompt.trim_end(),
            stage.expected_output.trim()
        );

        let tool_specs = agent.tools.iter().map(|t| t.spec()).collect::<Vec<_>>();
        let mut messages = vec![Turn::User { text: user_prompt }];
        let mut rounds = 0;

        loop {
            let request = ChatRequest {
                system: Some(agent.system_prompt()),
                messages: messages.clone(),
                tools: tool_specs.clone(),
            };

            let stage_timeout = Duration::from_secs(self.options.stage_timeout_secs);
            let output = match timeout(stage_timeout, self.client.generate(&request)).await {
                Ok(result) => result?,
                Err(_) => {
                    return Err(ExecutionError::Timeout {
                        stage: stage.id,
                        secs: self.options.stage_timeout_secs,
                    })
                }
            };

            usage.accumulate(output.usage);

            if output.tool_calls.is_empty() {
                if output.text.trim().is_empty() {
                    return Err(ExecutionError::EmptyResponse { stage: stage.id });
                }
                return Ok(output.text);
            }

            // Out of rounds: refuse to dispatch yet another tool batch
            if rounds == self.options.max_tool_rounds {
                warn!(
                    "Stage {} still calling tools after {} rounds",
                    stage.id, self.options.max_tool_rounds
                );
                return Err(ExecutionError::ToolLoop {
                    stage: stage.id,
                    limit: self.options.max_tool_rounds,
                });
            }
            rounds += 1;

            let mut results = Vec::with_capacity(output.tool_calls.len());
            for call in &output.tool_calls {
                self.emit(ExecutionEvent::StageToolCall {
                    stage: stage.id,
                    tool: call.name.clone(),
                });
                results.push(ToolResult {
                    name: call.name.clone(),
                    content: self.tools.invoke(agent.tools, &call.name, &call.args),
                });
            }

            messages.push(Turn::ModelCalls {
                calls: output.tool_calls,
            });
            messages.push(Turn::ToolResults { results });
        }
    }
}
