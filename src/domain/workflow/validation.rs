//! Structural workflow validation
//!
//! All checks run independently so a caller sees every problem at once.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::entity::Workflow;

/// Outcome of validating a workflow graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Validate a workflow's graph shape. Errors block execution; warnings
/// flag behavior the engine will silently truncate otherwise.
pub fn validate_workflow(workflow: &Workflow) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let input_count = workflow.input_nodes().len();
    match input_count {
        1 => {}
        0 => errors.push("Workflow must contain exactly one input node".to_string()),
        n => errors.push(format!(
            "Workflow must contain exactly one input node, found {}",
            n
        )),
    }

    if workflow.output_nodes().is_empty() {
        errors.push("Workflow must contain at least one output node".to_string());
    }

    if workflow.nodes.len() > 1 {
        for node in &workflow.nodes {
            let referenced = workflow
                .edges
                .iter()
                .any(|e| e.source == node.id || e.target == node.id);
            if !referenced {
                errors.push(format!("Node '{}' is not connected to any edge", node.id));
            }
        }
    }

    if let Some(node_id) = find_cycle(workflow) {
        errors.push(format!(
            "Workflow contains a cycle involving node '{}'",
            node_id
        ));
    }

    for node in &workflow.nodes {
        let outgoing = workflow.outgoing_edges(&node.id).len();
        if outgoing > 1 {
            warnings.push(format!(
                "Node '{}' has {} outgoing edges; only the first will be followed",
                node.id, outgoing
            ));
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Depth-first cycle search run from every node, so cycles in disconnected
/// subgraphs are caught. Returns a node on the first cycle found.
fn find_cycle(workflow: &Workflow) -> Option<String> {
    let adjacency: HashMap<&str, Vec<&str>> = workflow.nodes.iter().fold(
        HashMap::new(),
        |mut adjacency, node| {
            adjacency.insert(
                node.id.as_str(),
                workflow
                    .edges
                    .iter()
                    .filter(|e| e.source == node.id)
                    .map(|e| e.target.as_str())
                    .collect(),
            );
            adjacency
        },
    );

    for node in &workflow.nodes {
        let mut visited = HashSet::new();
        let mut stack = HashSet::new();
        if let Some(found) = dfs_cycle(node.id.as_str(), &adjacency, &mut visited, &mut stack) {
            return Some(found.to_string());
        }
    }

    None
}

fn dfs_cycle<'a>(
    node: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    stack: &mut HashSet<&'a str>,
) -> Option<&'a str> {
    if stack.contains(node) {
        return Some(node);
    }
    if !visited.insert(node) {
        return None;
    }

    stack.insert(node);
    if let Some(targets) = adjacency.get(node) {
        for target in targets {
            if let Some(found) = dfs_cycle(target, adjacency, visited, stack) {
                return Some(found);
            }
        }
    }
    stack.remove(node);

    None
}
