//! SQL query writer: think/act/observe loop against the sample bike store.

use clap::Parser;

use agent_workflows::query_writer::{cli::Args, sample_db::bike_store, QueryWriter};
use llm_client::OpenAiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let client = OpenAiClient::from_env()?;
    let writer = QueryWriter::new(bike_store()?)
        .with_model(args.model)
        .with_max_turns(args.max_iterations);

    let response = writer.generate_query(&client, &args.input).await?;
    let query = QueryWriter::response_parser(&response);
    println!("\n--- Generated SQL Query ---\n{}", query);

    if args.execute {
        let rows = writer.run_query(&query)?;
        println!("\nQuery Results:\n{}", rows);
    }

    Ok(())
}
