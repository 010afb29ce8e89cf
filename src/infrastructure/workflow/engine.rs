//! Workflow execution engine
//!
//! Walks a validated workflow graph from its input node along
//! single-successor edges, executing LLM nodes in order and threading each
//! output into the next node's prompt. Every call builds its own provider
//! registry and execution context; nothing is shared across concurrent
//! executions.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::domain::template;
use crate::domain::workflow::entity::LlmNodeData;
use crate::domain::{
    ExecutionContext, ExecutionRecord, ExecutionStatus, ExecutionStep, LlmRequest, NodeDebug,
    NodePayload, Workflow, WorkflowError,
};
use crate::infrastructure::llm::{
    LlmProviderFactory, ProviderConfig, ProviderFactory, ProviderRegistry,
};

/// Drives workflow executions against a provider factory
#[derive(Debug)]
pub struct WorkflowEngine {
    factory: Arc<dyn ProviderFactory>,
}

impl WorkflowEngine {
    pub fn new(factory: Arc<dyn ProviderFactory>) -> Self {
        Self { factory }
    }

    /// Engine wired to the real vendor providers
    pub fn with_default_providers() -> Self {
        Self::new(Arc::new(LlmProviderFactory::new()))
    }

    /// Execute a workflow end to end. Never faults: every failure is
    /// converted into a failed record carrying the error message and the
    /// debug trail collected so far.
    pub async fn execute_workflow(
        &self,
        workflow: &Workflow,
        input_prompt: &str,
        user_id: &str,
        provider_configs: &HashMap<String, ProviderConfig>,
    ) -> ExecutionRecord {
        let started = Instant::now();
        let mut record = ExecutionRecord::start(&workflow.id, user_id, input_prompt);
        let mut steps: Vec<ExecutionStep> = Vec::new();

        debug!("Executing workflow '{}' for user '{}'", workflow.id, user_id);

        let outcome = self
            .run_chain(workflow, input_prompt, provider_configs, &mut steps)
            .await;

        let total_cost_micros: i64 = steps.iter().map(|s| s.cost_micros).sum();
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let node_debug = build_debug_trail(workflow, &steps);

        match outcome {
            Ok(final_output) => {
                record.complete(final_output, total_cost_micros, elapsed_ms, node_debug);
            }
            Err(error) => {
                record.fail(error.to_string(), total_cost_micros, elapsed_ms, node_debug);
            }
        }

        record
    }

    async fn run_chain(
        &self,
        workflow: &Workflow,
        input_prompt: &str,
        provider_configs: &HashMap<String, ProviderConfig>,
        steps: &mut Vec<ExecutionStep>,
    ) -> Result<String, WorkflowError> {
        let registry = ProviderRegistry::from_configs(self.factory.as_ref(), provider_configs)
            .map_err(WorkflowError::from)?;

        let input_node = workflow
            .input_nodes()
            .into_iter()
            .next()
            .ok_or(WorkflowError::MissingInputNode)?;

        let mut context = ExecutionContext::new(input_prompt);
        context.record_output(&input_node.id, input_prompt);

        let mut current = input_node;
        let mut running_text = input_prompt.to_string();
        let mut visited: HashSet<String> = HashSet::new();

        loop {
            if !visited.insert(current.id.clone()) {
                return Err(WorkflowError::cycle_detected(&current.id));
            }

            match &current.payload {
                NodePayload::Llm(data) => {
                    let output = self
                        .execute_llm_node(&current.id, data, &context, &registry, steps)
                        .await?;
                    context.record_output(&current.id, &output);
                    running_text = output;
                }
                // Output nodes terminate the walk; the caller's runtime
                // input seeds it, and transform nodes pass through.
                NodePayload::Output(_) => return Ok(running_text),
                NodePayload::Input(_) | NodePayload::Transform(_) => {}
            }

            let Some(edge) = workflow.first_edge_from(&current.id) else {
                debug!("Node '{}' is terminal; walk complete", current.id);
                return Ok(running_text);
            };

            let next = workflow
                .node(&edge.target)
                .ok_or_else(|| WorkflowError::node_not_found(&edge.target))?;

            if next.is_output() {
                return Ok(running_text);
            }

            current = next;
        }
    }

    async fn execute_llm_node(
        &self,
        node_id: &str,
        data: &LlmNodeData,
        context: &ExecutionContext,
        registry: &ProviderRegistry,
        steps: &mut Vec<ExecutionStep>,
    ) -> Result<String, WorkflowError> {
        let variables = context.template_variables();
        let prompt = template::resolve(&data.prompt, &variables);

        let mut step = ExecutionStep::start(node_id, &data.provider, &data.model, &prompt);
        let node_started = Instant::now();

        debug!("Executing LLM node '{}' via '{}'", node_id, data.provider);

        let provider = match registry.get(&data.provider) {
            Ok(provider) => provider,
            Err(e) => {
                let error = WorkflowError::from(e);
                step.fail(error.to_string(), node_started.elapsed().as_millis() as u64);
                steps.push(step);
                return Err(error);
            }
        };

        let request = build_request(data, &prompt);

        match provider.execute(&data.model, request).await {
            Ok(response) => {
                let output = response.content().to_string();
                step.complete(
                    &output,
                    response.cost_micros,
                    node_started.elapsed().as_millis() as u64,
                );
                steps.push(step);
                Ok(output)
            }
            Err(e) => {
                let message = e.to_string();
                step.fail(&message, node_started.elapsed().as_millis() as u64);
                steps.push(step);
                Err(WorkflowError::node_execution(node_id, message))
            }
        }
    }
}

fn build_request(data: &LlmNodeData, prompt: &str) -> LlmRequest {
    let mut builder = LlmRequest::builder();

    if let Some(system_prompt) = &data.config.system_prompt {
        builder = builder.system(system_prompt);
    }
    builder = builder.user(prompt);

    if let Some(temperature) = data.config.temperature {
        builder = builder.temperature(temperature);
    }
    if let Some(max_tokens) = data.config.max_tokens {
        builder = builder.max_tokens(max_tokens);
    }
    if let Some(top_p) = data.config.top_p {
        builder = builder.top_p(top_p);
    }
    if let Some(penalty) = data.config.presence_penalty {
        builder = builder.presence_penalty(penalty);
    }
    if let Some(penalty) = data.config.frequency_penalty {
        builder = builder.frequency_penalty(penalty);
    }

    builder.build()
}

/// One debug entry per completed step, labeled from the workflow
fn build_debug_trail(workflow: &Workflow, steps: &[ExecutionStep]) -> Vec<NodeDebug> {
    steps
        .iter()
        .filter(|s| s.status == ExecutionStatus::Completed)
        .map(|step| {
            let label = workflow
                .node(&step.node_id)
                .map(|n| n.label().to_string())
                .unwrap_or_default();
            NodeDebug::from_step(step, label)
        })
        .collect()
}
