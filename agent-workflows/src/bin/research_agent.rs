/*
┌─────────────────────────────────────────────────────────────────────────────┐
│                         RESEARCH AGENT WORKFLOW                             │
└─────────────────────────────────────────────────────────────────────────────┘

  Phase 1: PLAN
    │
    ├─> Orchestrator decomposes the topic into subtasks
    ├─> Each subtask carries an id, description, and dependency ids
    └─> Output: OUTPUT/research_plan_<timestamp>.yaml

         ↓

  Phase 2: EXECUTE (concurrent)
    │
    ├─> Dependency-satisfied subtasks run in parallel rounds
    ├─> Each worker plans tool usage, runs tools, synthesizes a result
    └─> Results are folded back into the plan

         ↓

  Phase 3: SYNTHESIZE
    │
    ├─> All completed subtask results are combined
    └─> Output: OUTPUT/research_output_<timestamp>.md (or custom path)

EXAMPLE COMMANDS:

  # Full workflow
  cargo run --bin research_agent -- \
    --input "The impact of artificial intelligence on climate change"

  # Custom concurrency and output path
  cargo run --bin research_agent -- \
    --input "History of the bicycle industry" \
    --batch-size 2 \
    --output docs/bikes.md
*/

use std::sync::Arc;

use clap::Parser;

use agent_workflows::research::{cli::Args, run_research_workflow, ResearchConfig};
use agent_workflows::research::tools::WebSearchTool;
use agent_workflows::workflow_utils::catalog::ToolCatalog;
use llm_client::{LlmClient, OpenAiClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let client: Arc<dyn LlmClient> = Arc::new(OpenAiClient::from_env()?);

    let mut catalog = ToolCatalog::new();
    catalog.register(Arc::new(WebSearchTool::from_env()));

    let config: ResearchConfig = args.into();
    let outcome = run_research_workflow(client, Arc::new(catalog), config).await?;

    println!("{}", "=".repeat(40));
    println!("\nResearch Results:\n{}", outcome.summary);
    Ok(())
}
