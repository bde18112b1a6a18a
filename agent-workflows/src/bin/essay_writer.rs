//! Prompt-chaining essay writer.

use clap::Parser;

use agent_workflows::essay::EssayWriter;
use llm_client::OpenAiClient;

/// Write an essay in three chained steps: outline, expand, write.
#[derive(Parser, Debug)]
#[command(name = "essay-writer")]
struct Args {
    /// Essay topic, e.g. "Accelerated magnetic resonance imaging"
    #[arg(short, long)]
    input: String,

    /// Model used for every step
    #[arg(long, default_value = agent_workflows::DEFAULT_MODEL)]
    model: String,

    /// Print intermediate outline stages
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let client = OpenAiClient::from_env()?;
    let writer = EssayWriter::new()
        .with_model(args.model)
        .verbose(args.verbose);

    println!("Generating essay... Please wait...");
    let essay = writer.write_essay(&client, &args.input).await?;

    println!("\nEssay:\n\n{}", essay);
    Ok(())
}
