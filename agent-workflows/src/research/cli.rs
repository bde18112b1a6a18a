//! CLI argument parsing for the research workflow.

use clap::Parser;

use crate::research::workflow::ResearchConfig;

/// Research agent: decompose a topic, execute subtasks concurrently,
/// synthesize a final write-up.
#[derive(Parser, Debug, Clone)]
#[command(name = "research-agent")]
pub struct Args {
    /// Research topic
    #[arg(short, long)]
    pub input: String,

    /// Number of subtasks to execute in parallel within a round
    #[arg(long, default_value = "4")]
    pub batch_size: usize,

    /// Model used for all calls
    #[arg(long, default_value = crate::DEFAULT_MODEL)]
    pub model: String,

    /// Output path for the final synthesis (default: ./OUTPUT/research_output_<timestamp>.md)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Skip writing plan/synthesis artifacts to disk
    #[arg(long)]
    pub no_artifacts: bool,
}

impl From<Args> for ResearchConfig {
    fn from(args: Args) -> Self {
        ResearchConfig {
            topic: args.input,
            batch_size: args.batch_size,
            model: args.model,
            output: args.output,
            save_artifacts: !args.no_artifacts,
        }
    }
}
