//! Orchestrator / worker / synthesizer research workflow.
//!
//! A topic is decomposed into a dependency-ordered plan of subtasks, the
//! subtasks are executed by tool-equipped workers in concurrent rounds, and
//! the completed plan is synthesized into a final write-up.
//!
//! - `types` - plan and tool-usage data structures
//! - `orchestrator` - plan creation via structured decoding
//! - `worker` - per-subtask execution (tool planning, invocation, synthesis)
//! - `synthesizer` - final combination of subtask results
//! - `tools` - the web search tool available to workers
//! - `workflow` - phase orchestration and artifact persistence
//! - `cli` - command-line arguments

pub mod cli;
pub mod orchestrator;
pub mod synthesizer;
pub mod tools;
pub mod types;
pub mod worker;
pub mod workflow;

pub use orchestrator::Orchestrator;
pub use synthesizer::Synthesizer;
pub use types::{ResearchPlan, ToolCall, ToolUsage};
pub use worker::Worker;
pub use workflow::{run_research_workflow, ResearchConfig, ResearchOutcome};
