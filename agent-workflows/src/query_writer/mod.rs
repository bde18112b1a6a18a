//! ReAct natural-language-to-SQL workflow.
//!
//! An agent is pointed at a SQLite database with three tools (list tables,
//! inspect a table schema, run a read-only query) and iterates
//! think/act/observe turns until it can produce the SQL query answering the
//! user's question, or runs out of turns.
//!
//! - `sample_db` - the seeded bike-store database used by the binary and tests
//! - `tools` - the SQL tool implementations
//! - `workflow` - the query writer agent itself
//! - `cli` - command-line arguments

pub mod cli;
pub mod sample_db;
pub mod tools;
pub mod workflow;

pub use tools::sql_catalog;
pub use workflow::{QueryWriter, MAX_ITERATIONS};
