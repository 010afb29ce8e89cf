use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::domain::{validate_workflow, ExecutionStatus, Workflow};
use crate::infrastructure::workflow::WorkflowEngine;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Path to the workflow JSON file
    #[arg(long)]
    pub workflow: PathBuf,

    /// Input text piped into the chain
    #[arg(long)]
    pub input: String,

    /// User id recorded on the execution
    #[arg(long, default_value = "local")]
    pub user: String,
}

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.workflow)
        .with_context(|| format!("Failed to read {}", args.workflow.display()))?;
    let workflow: Workflow = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", args.workflow.display()))?;

    let report = validate_workflow(&workflow);
    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }
    if !report.is_valid {
        for error in &report.errors {
            eprintln!("error: {}", error);
        }
        anyhow::bail!("Workflow '{}' failed validation", workflow.id);
    }

    let provider_configs = super::provider_configs_from_env();
    if provider_configs.is_empty() {
        anyhow::bail!(
            "No provider API keys configured; set OPENAI_API_KEY and/or ANTHROPIC_API_KEY"
        );
    }

    info!("Executing workflow '{}'", workflow.id);

    let engine = WorkflowEngine::with_default_providers();
    let record = engine
        .execute_workflow(&workflow, &args.input, &args.user, &provider_configs)
        .await;

    println!("{}", serde_json::to_string_pretty(&record)?);

    if record.status == ExecutionStatus::Failed {
        anyhow::bail!(
            "Workflow execution failed: {}",
            record.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}
