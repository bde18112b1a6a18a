//! Code generation with iterative review feedback.

use clap::Parser;

use agent_workflows::coding::Coding;
use llm_client::OpenAiClient;

/// Write code, review it, and revise until the reviewer accepts it or the
/// iteration budget runs out.
#[derive(Parser, Debug)]
#[command(name = "code-reflection")]
struct Args {
    /// Programming task description
    #[arg(short, long)]
    input: String,

    /// Maximum write/review iterations
    #[arg(long, default_value = "3")]
    max_iterations: usize,

    /// Model used for writing and reviewing
    #[arg(long, default_value = agent_workflows::DEFAULT_MODEL)]
    model: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let client = OpenAiClient::from_env()?;
    let coding = Coding::new()
        .with_model(args.model)
        .with_max_iterations(args.max_iterations);

    let code = coding.generate_code(&client, &args.input).await?;

    println!("{}", "*".repeat(20));
    println!("Final Code:\n{}", code);
    Ok(())
}
