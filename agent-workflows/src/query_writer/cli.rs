//! CLI argument parsing for the query-writer workflow.

use clap::Parser;

/// SQL query writer: answer a natural-language question with a SQL query,
/// using think/act/observe turns against the sample bike-store database.
#[derive(Parser, Debug, Clone)]
#[command(name = "query-writer")]
pub struct Args {
    /// Natural-language question to answer with SQL
    #[arg(short, long)]
    pub input: String,

    /// Maximum think/act/observe turns before giving up
    #[arg(long, default_value = "30")]
    pub max_iterations: usize,

    /// Model used for the agent loop
    #[arg(long, default_value = crate::DEFAULT_MODEL)]
    pub model: String,

    /// Also execute the generated query and print the rows
    #[arg(long)]
    pub execute: bool,
}
