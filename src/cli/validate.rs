use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::domain::{validate_workflow, Workflow};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the workflow JSON file
    #[arg(long)]
    pub workflow: PathBuf,
}

pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.workflow)
        .with_context(|| format!("Failed to read {}", args.workflow.display()))?;
    let workflow: Workflow = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", args.workflow.display()))?;

    let report = validate_workflow(&workflow);

    for error in &report.errors {
        println!("error: {}", error);
    }
    for warning in &report.warnings {
        println!("warning: {}", warning);
    }

    if report.is_valid {
        println!("Workflow '{}' is valid", workflow.id);
        Ok(())
    } else {
        anyhow::bail!("Workflow '{}' failed validation", workflow.id)
    }
}
