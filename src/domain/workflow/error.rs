//! Workflow execution error types

use thiserror::Error;

/// Errors raised while walking a workflow chain
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    #[error("Workflow has no input node")]
    MissingInputNode,

    #[error("Node '{0}' not found in workflow")]
    NodeNotFound(String),

    #[error("Cycle detected at node '{0}'")]
    CycleDetected(String),

    #[error("Node '{node}' failed: {message}")]
    NodeExecution { node: String, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<crate::domain::DomainError> for WorkflowError {
    fn from(err: crate::domain::DomainError) -> Self {
        match err {
            crate::domain::DomainError::Configuration { message } => Self::Configuration(message),
            other => Self::Configuration(other.to_string()),
        }
    }
}

impl WorkflowError {
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound(id.into())
    }

    pub fn cycle_detected(id: impl Into<String>) -> Self {
        Self::CycleDetected(id.into())
    }

    pub fn node_execution(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NodeExecution {
            node: node.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WorkflowError::MissingInputNode;
        assert_eq!(err.to_string(), "Workflow has no input node");

        let err = WorkflowError::node_execution("llm-1", "Provider error: openai - HTTP 500");
        assert_eq!(
            err.to_string(),
            "Node 'llm-1' failed: Provider error: openai - HTTP 500"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            WorkflowError::node_not_found("x"),
            WorkflowError::node_not_found("x")
        );
        assert_ne!(
            WorkflowError::node_not_found("x"),
            WorkflowError::node_not_found("y")
        );
    }
}
