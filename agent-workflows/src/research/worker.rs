//! Per-subtask execution: plan tool usage, invoke tools, synthesize a result.

use std::sync::Arc;

use agent_workflows_sdk::{log_task_progress, log_tool_invoked};
use anyhow::{Context, Result};
use serde_json::json;

use llm_client::{parse, ChatMessage, CompletionRequest, LlmClient};

use crate::research::types::ToolUsage;
use crate::workflow_utils::catalog::ToolCatalog;
use crate::workflow_utils::scheduler::SubTask;

/// Executes one research subtask at a time. Safe to share across
/// concurrently dispatched subtasks: the catalog is read-only and every call
/// works on its own task.
pub struct Worker {
    model: String,
    catalog: Arc<ToolCatalog>,
}

impl Worker {
    pub fn new(model: impl Into<String>, catalog: Arc<ToolCatalog>) -> Self {
        Self {
            model: model.into(),
            catalog,
        }
    }

    /// Execute a research subtask.
    ///
    /// First asks the model which tools (if any) the task needs, runs them
    /// through the catalog, then asks the model to complete the task from
    /// the tool output. A planned tool that is not in the catalog turns the
    /// whole task result into an error string, as there is no separate error
    /// channel for tool problems.
    pub async fn execute_task<C>(&self, client: &C, task: &SubTask) -> Result<String>
    where
        C: LlmClient + ?Sized,
    {
        log_task_progress!(&task.id, "planning tool usage");
        let usage = self.plan_tool_usage(client, task).await?;

        let mut tool_results = Vec::new();
        for call in &usage.tools {
            let Some(tool) = self.catalog.get(&call.tool_name) else {
                return Ok(format!("Error: tool '{}' is not available.", call.tool_name));
            };
            log_tool_invoked!(&task.id, &call.tool_name, &call.tool_input);
            tool_results.push(tool.run(&call.tool_input).await);
        }

        let synthesis_prompt = format!(
            "You are a research assistant. You have to complete this task:\n\
             {}\n\n\
             You have access to these tools: {}\n\n\
             Here are the results from the tools:\n\
             {}\n\n\
             Use the results from the tools to complete the task.",
            task.description,
            self.catalog.render_descriptions(),
            tool_results.join("\n"),
        );

        let request = CompletionRequest::new(
            self.model.as_str(),
            vec![
                ChatMessage::developer(synthesis_prompt),
                ChatMessage::user("Synthesize the results"),
            ],
        );

        let result = client
            .complete(request)
            .await
            .with_context(|| format!("failed to complete subtask '{}'", task.id))?;

        Ok(result)
    }

    async fn plan_tool_usage<C>(&self, client: &C, task: &SubTask) -> Result<ToolUsage>
    where
        C: LlmClient + ?Sized,
    {
        let planning_prompt = format!(
            "You are a research assistant. You need to complete this task:\n\
             {}\n\n\
             You have access to these tools: {}\n\n\
             If you need to use tools to complete the task, list them with \
             the tool name and the input you would give each tool.\n\
             If no tools are needed, return an empty list.\n\n\
             You do not need to complete the task yet, just provide the \
             tools needed, if any.",
            task.description,
            self.catalog.render_descriptions(),
        );

        let request = CompletionRequest::new(
            self.model.as_str(),
            vec![
                ChatMessage::developer(planning_prompt),
                ChatMessage::user("Plan the task execution"),
            ],
        );

        parse(client, request, "tool_usage", tool_usage_schema())
            .await
            .with_context(|| format!("failed to plan tool usage for subtask '{}'", task.id))
    }
}

fn tool_usage_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "need_tool": {"type": "boolean"},
            "tools": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "tool_name": {"type": "string"},
                        "tool_input": {"type": "string"}
                    },
                    "required": ["tool_name", "tool_input"]
                }
            }
        },
        "required": ["need_tool", "tools"]
    })
}
