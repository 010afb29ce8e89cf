//! Execution record and per-node debug trail
//!
//! These shapes are the contract consumed by the UI layer for
//! step-by-step inspection; field names serialize camelCase and must stay
//! stable.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::template;

/// Lifecycle status shared by executions and individual steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Running,
    Completed,
    Failed,
}

/// One record per executed LLM node. Created at node start, finalized
/// exactly once before the walk moves on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStep {
    pub node_id: String,
    pub provider: String,
    pub model: String,
    /// The resolved prompt actually sent
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Cost in micro-dollars, so step costs sum without rounding
    pub cost_micros: i64,
    pub duration_ms: u64,
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionStep {
    pub fn start(
        node_id: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            provider: provider.into(),
            model: model.into(),
            prompt: prompt.into(),
            output: None,
            cost_micros: 0,
            duration_ms: 0,
            status: ExecutionStatus::Running,
            error: None,
        }
    }

    pub fn complete(&mut self, output: impl Into<String>, cost_micros: i64, duration_ms: u64) {
        self.output = Some(output.into());
        self.cost_micros = cost_micros;
        self.duration_ms = duration_ms;
        self.status = ExecutionStatus::Completed;
    }

    pub fn fail(&mut self, error: impl Into<String>, duration_ms: u64) {
        self.error = Some(error.into());
        self.duration_ms = duration_ms;
        self.status = ExecutionStatus::Failed;
    }

    pub fn cost_usd(&self) -> f64 {
        self.cost_micros as f64 / 1_000_000.0
    }
}

/// One debug trail entry per completed step, with tag-extracted sub-fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDebug {
    pub id: String,
    pub label: String,
    pub prompt: String,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl NodeDebug {
    pub fn from_step(step: &ExecutionStep, label: impl Into<String>) -> Self {
        let output = step.output.clone().unwrap_or_default();
        let recommendations = template::extract_tag(&output, template::EDITS_TAG);
        let reasoning = template::extract_tag(&output, template::REASONING_TAG);

        Self {
            id: step.node_id.clone(),
            label: label.into(),
            prompt: step.prompt.clone(),
            output,
            recommendations,
            reasoning,
        }
    }
}

/// Top-level result of one `execute_workflow` call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub id: String,
    pub workflow_id: String,
    pub user_id: String,
    pub input_prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_result: Option<String>,
    /// Total cost in USD; the exact sum of step costs
    pub total_cost: f64,
    pub execution_time_ms: u64,
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_debug: Option<Vec<NodeDebug>>,
}

impl ExecutionRecord {
    /// Create a record in the `running` state
    pub fn start(
        workflow_id: impl Into<String>,
        user_id: impl Into<String>,
        input_prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            workflow_id: workflow_id.into(),
            user_id: user_id.into(),
            input_prompt: input_prompt.into(),
            output_result: None,
            total_cost: 0.0,
            execution_time_ms: 0,
            status: ExecutionStatus::Running,
            error: None,
            node_debug: None,
        }
    }

    /// Terminal transition to `completed`
    pub fn complete(
        &mut self,
        output: impl Into<String>,
        total_cost_micros: i64,
        execution_time_ms: u64,
        node_debug: Vec<NodeDebug>,
    ) {
        self.output_result = Some(output.into());
        self.total_cost = total_cost_micros as f64 / 1_000_000.0;
        self.execution_time_ms = execution_time_ms;
        self.status = ExecutionStatus::Completed;
        self.node_debug = if node_debug.is_empty() {
            None
        } else {
            Some(node_debug)
        };
    }

    /// Terminal transition to `failed`; attaches whatever debug entries
    /// exist for steps that completed before the failure.
    pub fn fail(
        &mut self,
        error: impl Into<String>,
        total_cost_micros: i64,
        execution_time_ms: u64,
        node_debug: Vec<NodeDebug>,
    ) {
        self.error = Some(error.into());
        self.total_cost = total_cost_micros as f64 / 1_000_000.0;
        self.execution_time_ms = execution_time_ms;
        self.status = ExecutionStatus::Failed;
        self.node_debug = if node_debug.is_empty() {
            None
        } else {
            Some(node_debug)
        };
    }
}
