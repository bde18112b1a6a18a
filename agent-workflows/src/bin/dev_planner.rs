//! Persona-parallel development planner.

use std::sync::Arc;

use clap::Parser;

use agent_workflows::planner::DevelopmentPlanner;
use llm_client::OpenAiClient;

/// Draft a development plan from four personas in parallel, then merge the
/// drafts into one plan.
#[derive(Parser, Debug)]
#[command(name = "dev-planner")]
struct Args {
    /// Requirements to plan for
    #[arg(short, long)]
    input: String,

    /// Model used for drafting and aggregation
    #[arg(long, default_value = agent_workflows::DEFAULT_MODEL)]
    model: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let client = Arc::new(OpenAiClient::from_env()?);
    let planner = DevelopmentPlanner::new().with_model(args.model);

    let plan = planner.generate_plan(client, &args.input).await?;

    println!("Development Plan for Requirements:");
    for (persona, draft) in &plan.drafts {
        println!("\n{} Plan:\n{}", persona, draft);
    }

    println!("\n{}\n", "=".repeat(80));
    println!("Aggregated Development Plan:\n{}", plan.aggregated);
    Ok(())
}
