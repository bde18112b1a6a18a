//! Question answering with two-tier model routing.

use clap::Parser;

use agent_workflows::routing::QuestionAnswering;
use llm_client::OpenAiClient;

/// Classify a question as general or coding and answer it with the
/// corresponding model tier.
#[derive(Parser, Debug)]
#[command(name = "question-router")]
struct Args {
    /// Question to answer
    #[arg(short, long)]
    input: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let client = OpenAiClient::from_env()?;
    let qa = QuestionAnswering::new();

    let answer = qa.answer_question(&client, &args.input).await?;
    println!("\nAnswer: {}", answer);
    Ok(())
}
