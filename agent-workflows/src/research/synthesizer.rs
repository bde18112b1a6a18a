//! Final combination of completed subtask results.

use anyhow::{Context, Result};

use llm_client::{ChatMessage, CompletionRequest, LlmClient};

use crate::research::types::ResearchPlan;
use crate::workflow_utils::scheduler::{SubTask, TaskStatus};

/// Collects results from all completed subtasks and combines them into a
/// coherent final output.
pub struct Synthesizer {
    model: String,
}

impl Synthesizer {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    pub async fn synthesize<C>(&self, client: &C, topic: &str, plan: &ResearchPlan) -> Result<String>
    where
        C: LlmClient + ?Sized,
    {
        let synthesis_prompt = format!(
            "You are a research synthesizer. You need to combine the findings \
             from the following research subtasks into a coherent final output.\n\n\
             Research Topic: {}\n\n\
             Subtask Results:\n\
             {}\n\n\
             Create a well-structured synthesis that:\n\
             1. Introduces the research topic\n\
             2. Presents the key findings\n\
             3. Provides a conclusion\n\n\
             Make the output clear, concise, and well-organized.",
            topic,
            format_subtask_results(&plan.subtasks),
        );

        let request = CompletionRequest::new(
            self.model.as_str(),
            vec![
                ChatMessage::developer(synthesis_prompt),
                ChatMessage::user("Synthesize the research results"),
            ],
        );

        client
            .complete(request)
            .await
            .context("failed to synthesize research results")
    }
}

fn format_subtask_results(subtasks: &[SubTask]) -> String {
    subtasks
        .iter()
        .map(|task| {
            if task.status == TaskStatus::Completed {
                format!(
                    "Subtask ID: {}\nDescription: {}\nResult: {}\n",
                    task.id, task.description, task.result
                )
            } else {
                format!("Subtask ID: {} is not completed yet.", task.id)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
