//! Per-execution context and template variable derivation

use std::collections::HashMap;

use crate::domain::template;

/// Accumulated node outputs for one execution. Owned by a single
/// `execute_workflow` call; never shared or persisted.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// The caller-supplied input text, available as `{input}`
    input_prompt: String,

    /// Outputs of executed nodes, keyed by node id
    outputs: HashMap<String, String>,
}

impl ExecutionContext {
    pub fn new(input_prompt: impl Into<String>) -> Self {
        Self {
            input_prompt: input_prompt.into(),
            outputs: HashMap::new(),
        }
    }

    pub fn input_prompt(&self) -> &str {
        &self.input_prompt
    }

    pub fn record_output(&mut self, node_id: impl Into<String>, output: impl Into<String>) {
        self.outputs.insert(node_id.into(), output.into());
    }

    pub fn output(&self, node_id: &str) -> Option<&str> {
        self.outputs.get(node_id).map(String::as_str)
    }

    /// Derive the template variable set from the current state: `input`
    /// maps to the original caller text (not the previous node's output),
    /// each executed node id maps to its output, and outputs carrying
    /// tagged sections gain `{id}_edits` / `{id}_reasoning` entries.
    ///
    /// Rebuilt fresh before each resolution; a pure function of this
    /// context.
    pub fn template_variables(&self) -> HashMap<String, String> {
        let mut variables = HashMap::new();
        variables.insert("input".to_string(), self.input_prompt.clone());

        for (node_id, output) in &self.outputs {
            variables.insert(node_id.clone(), output.clone());

            for (suffix, content) in template::extract_sections(output) {
                variables.insert(format!("{}_{}", node_id, suffix), content);
            }
        }

        variables
    }
}
