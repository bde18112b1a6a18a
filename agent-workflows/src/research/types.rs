//! Data types for the research workflow.

use serde::{Deserialize, Serialize};

use crate::workflow_utils::scheduler::SubTask;

/// The decomposed plan for one research run, as produced by the
/// orchestrator. Owned by a single workflow invocation; the scheduler
/// mutates the subtasks in place as they complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchPlan {
    pub subtasks: Vec<SubTask>,
}

/// One tool invocation a worker planned for its subtask.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    pub tool_input: String,
}

/// A worker's tool-usage decision for a subtask.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolUsage {
    pub need_tool: bool,
    #[serde(default)]
    pub tools: Vec<ToolCall>,
}
