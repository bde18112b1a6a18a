//! Plan creation: decompose a research topic into dependency-ordered subtasks.

use agent_workflows_sdk::{log_found, log_info};
use anyhow::{Context, Result};
use serde_json::json;

use llm_client::{parse, ChatMessage, CompletionRequest, LlmClient};

use crate::research::types::ResearchPlan;

/// Creates and prints the research plan for a topic. The plan comes back as
/// a schema-constrained structured response, so no free-text parsing is
/// involved at this stage.
pub struct Orchestrator {
    model: String,
}

impl Orchestrator {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    pub async fn create_plan<C>(&self, client: &C, topic: &str) -> Result<ResearchPlan>
    where
        C: LlmClient + ?Sized,
    {
        let developer_prompt = "\
You are a research planner. Create a detailed research plan for the topic \
provided by the user.
Break down the research into subtasks. Each subtask should have:
1. A unique ID
2. A clear description
3. Dependencies (IDs of tasks that must be completed first)

Return the plan as a JSON object with a \"subtasks\" array. Each subtask is \
an object with the keys:
\"id\": string, a unique identifier for the subtask
\"description\": string, a description of the subtask
\"dependencies\": list of IDs of subtasks that must be completed first";

        let request = CompletionRequest::new(
            self.model.as_str(),
            vec![
                ChatMessage::developer(developer_prompt),
                ChatMessage::user(topic),
            ],
        );

        let plan: ResearchPlan = parse(client, request, "research_plan", plan_schema())
            .await
            .with_context(|| format!("failed to create a research plan for '{}'", topic))?;

        log_found!(plan.subtasks.len(), "subtasks");
        for task in &plan.subtasks {
            log_info!(
                "subtask {}: {} (dependencies: [{}])",
                task.id,
                task.description,
                task.dependencies.join(", ")
            );
        }

        Ok(plan)
    }
}

fn plan_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "subtasks": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "string"},
                        "description": {"type": "string"},
                        "dependencies": {
                            "type": "array",
                            "items": {"type": "string"}
                        }
                    },
                    "required": ["id", "description", "dependencies"]
                }
            }
        },
        "required": ["subtasks"]
    })
}
