//! Chaincanvas
//!
//! Execution engine for visually composed LLM chains: walks a node/edge
//! workflow graph, resolves `{variable}` prompt templates against the
//! accumulated execution context, invokes one provider per LLM node, and
//! returns a full execution record with a per-node debug trail.

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    validate_workflow, ExecutionRecord, ExecutionStatus, ExecutionStep, NodeDebug, NodePayload,
    ValidationReport, Workflow, WorkflowEdge, WorkflowError, WorkflowNode,
};
pub use infrastructure::llm::{
    LlmProviderFactory, ProviderConfig, ProviderFactory, ProviderRegistry,
};
pub use infrastructure::workflow::WorkflowEngine;
