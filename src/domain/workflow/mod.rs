//! Workflow graph model, validation, and execution record types

pub mod context;
pub mod entity;
pub mod error;
pub mod record;
pub mod validation;

pub use context::ExecutionContext;
pub use entity::{
    InputData, LlmNodeConfig, LlmNodeData, NodePayload, OutputData, Position, TransformData,
    Workflow, WorkflowEdge, WorkflowNode,
};
pub use error::WorkflowError;
pub use record::{ExecutionRecord, ExecutionStatus, ExecutionStep, NodeDebug};
pub use validation::{validate_workflow, ValidationReport};
