//! Workflow graph model as produced by the visual editor

use serde::{Deserialize, Serialize};

/// 2-D canvas position; carried for the editor, irrelevant to execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Generation parameters attached to an LLM node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmNodeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// Payload of an input node. The authored prompt is a default shown in the
/// editor; at execution time the caller-supplied input always wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputData {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub prompt: String,
}

/// Payload of an LLM node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmNodeData {
    #[serde(default)]
    pub label: String,
    pub provider: String,
    pub model: String,
    pub prompt: String,
    #[serde(default)]
    pub config: LlmNodeConfig,
}

/// Payload of an output node; terminal marker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputData {
    #[serde(default)]
    pub label: String,
}

/// Payload of a transform node. Accepted from the editor but passed
/// through unchanged by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformData {
    #[serde(default)]
    pub label: String,
}

/// Per-kind node payload, tagged with the node's `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum NodePayload {
    Input(InputData),
    Llm(LlmNodeData),
    Output(OutputData),
    Transform(TransformData),
}

impl NodePayload {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Input(_) => "input",
            Self::Llm(_) => "llm",
            Self::Output(_) => "output",
            Self::Transform(_) => "transform",
        }
    }
}

/// One step in a workflow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,
    #[serde(default)]
    pub position: Position,
    #[serde(flatten)]
    pub payload: NodePayload,
}

impl WorkflowNode {
    pub fn label(&self) -> &str {
        match &self.payload {
            NodePayload::Input(data) => &data.label,
            NodePayload::Llm(data) => &data.label,
            NodePayload::Output(data) => &data.label,
            NodePayload::Transform(data) => &data.label,
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self.payload, NodePayload::Input(_))
    }

    pub fn is_output(&self) -> bool {
        matches!(self.payload, NodePayload::Output(_))
    }
}

/// A directed, unlabeled arc between two node ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// A workflow graph, supplied whole by the caller for each execution.
/// The engine never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
}

impl Workflow {
    pub fn node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn input_nodes(&self) -> Vec<&WorkflowNode> {
        self.nodes.iter().filter(|n| n.is_input()).collect()
    }

    pub fn output_nodes(&self) -> Vec<&WorkflowNode> {
        self.nodes.iter().filter(|n| n.is_output()).collect()
    }

    /// Outgoing edges of a node, in edge-list order
    pub fn outgoing_edges(&self, node_id: &str) -> Vec<&WorkflowEdge> {
        self.edges.iter().filter(|e| e.source == node_id).collect()
    }

    /// The one edge the walk honors: first outgoing edge in list order
    pub fn first_edge_from(&self, node_id: &str) -> Option<&WorkflowEdge> {
        self.edges.iter().find(|e| e.source == node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_workflow_json() -> &'static str {
        r#"{
            "id": "wf-1",
            "name": "Draft and refine",
            "nodes": [
                {
                    "id": "input-1",
                    "type": "input",
                    "position": {"x": 0.0, "y": 0.0},
                    "data": {"label": "Input", "prompt": "authored default"}
                },
                {
                    "id": "llm-1",
                    "type": "llm",
                    "position": {"x": 200.0, "y": 0.0},
                    "data": {
                        "label": "Draft",
                        "provider": "openai",
                        "model": "gpt-4o",
                        "prompt": "Summarize: {input}",
                        "config": {
                            "temperature": 0.7,
                            "maxTokens": 512,
                            "systemPrompt": "You are a summarizer"
                        }
                    }
                },
                {
                    "id": "output-1",
                    "type": "output",
                    "position": {"x": 400.0, "y": 0.0},
                    "data": {"label": "Result"}
                }
            ],
            "edges": [
                {"id": "e1", "source": "input-1", "target": "llm-1"},
                {"id": "e2", "source": "llm-1", "target": "output-1"}
            ]
        }"#
    }

    #[test]
    fn test_deserialize_editor_shape() {
        let workflow: Workflow = serde_json::from_str(sample_workflow_json()).unwrap();

        assert_eq!(workflow.id, "wf-1");
        assert_eq!(workflow.nodes.len(), 3);
        assert_eq!(workflow.edges.len(), 2);

        let llm = workflow.node("llm-1").unwrap();
        match &llm.payload {
            NodePayload::Llm(data) => {
                assert_eq!(data.provider, "openai");
                assert_eq!(data.model, "gpt-4o");
                assert_eq!(data.config.max_tokens, Some(512));
                assert_eq!(
                    data.config.system_prompt.as_deref(),
                    Some("You are a summarizer")
                );
            }
            other => panic!("expected llm payload, got {:?}", other),
        }
    }

    #[test]
    fn test_serialize_round_trip() {
        let workflow: Workflow = serde_json::from_str(sample_workflow_json()).unwrap();
        let json = serde_json::to_value(&workflow).unwrap();

        assert_eq!(json["nodes"][1]["type"], "llm");
        assert_eq!(json["nodes"][1]["data"]["config"]["maxTokens"], 512);

        let back: Workflow = serde_json::from_value(json).unwrap();
        assert_eq!(back.nodes, workflow.nodes);
    }

    #[test]
    fn test_node_kind_and_label() {
        let workflow: Workflow = serde_json::from_str(sample_workflow_json()).unwrap();

        assert_eq!(workflow.node("input-1").unwrap().payload.kind(), "input");
        assert_eq!(workflow.node("llm-1").unwrap().label(), "Draft");
        assert!(workflow.node("output-1").unwrap().is_output());
    }

    #[test]
    fn test_input_and_output_lookup() {
        let workflow: Workflow = serde_json::from_str(sample_workflow_json()).unwrap();

        assert_eq!(workflow.input_nodes().len(), 1);
        assert_eq!(workflow.output_nodes().len(), 1);
        assert!(workflow.node("missing").is_none());
    }

    #[test]
    fn test_first_edge_respects_list_order() {
        let mut workflow: Workflow = serde_json::from_str(sample_workflow_json()).unwrap();
        workflow.edges.insert(
            0,
            WorkflowEdge {
                id: "e0".to_string(),
                source: "llm-1".to_string(),
                target: "input-1".to_string(),
            },
        );

        let first = workflow.first_edge_from("llm-1").unwrap();
        assert_eq!(first.id, "e0");
        assert_eq!(workflow.outgoing_edges("llm-1").len(), 2);
    }
}
