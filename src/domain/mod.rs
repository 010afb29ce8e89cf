//! Domain layer - core types and engine contracts

pub mod error;
pub mod llm;
pub mod template;
pub mod workflow;

pub use error::DomainError;
pub use llm::{
    pricing_for, FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, Message,
    MessageRole, ModelPricing, Usage,
};
pub use workflow::{
    validate_workflow, ExecutionContext, ExecutionRecord, ExecutionStatus, ExecutionStep,
    NodeDebug, NodePayload, ValidationReport, Workflow, WorkflowEdge, WorkflowError, WorkflowNode,
};
