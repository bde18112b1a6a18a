//! Persona-parallel development planning.
//!
//! Four personas draft a development plan for the same requirements
//! concurrently, then a final call merges the drafts into one plan.

use std::sync::Arc;

use agent_workflows_sdk::{log_parallel_complete, log_parallel_start};
use anyhow::{Context, Result};

use llm_client::{ChatMessage, CompletionRequest, LlmClient};

use crate::workflow_utils::batch::execute_batch;

pub const PERSONAS: [&str; 4] = [
    "data scientist",
    "software engineer",
    "product manager",
    "UX designer",
];

/// Per-persona drafts plus the merged plan.
#[derive(Debug)]
pub struct DevelopmentPlan {
    /// `(persona, draft)` pairs in persona order
    pub drafts: Vec<(String, String)>,
    pub aggregated: String,
}

pub struct DevelopmentPlanner {
    model: String,
}

impl Default for DevelopmentPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl DevelopmentPlanner {
    pub fn new() -> Self {
        Self {
            model: crate::DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Run the development planning workflow: draft per persona in
    /// parallel, then aggregate.
    pub async fn generate_plan<C>(&self, client: Arc<C>, requirements: &str) -> Result<DevelopmentPlan>
    where
        C: LlmClient + ?Sized + 'static,
    {
        log_parallel_start!(PERSONAS.len(), "persona drafts");

        let draft_client = Arc::clone(&client);
        let model = self.model.clone();
        let requirements_owned = requirements.to_string();
        let personas: Vec<String> = PERSONAS.iter().map(|p| p.to_string()).collect();

        let drafts = execute_batch(1, personas, PERSONAS.len(), move |persona, _ctx| {
            let client = Arc::clone(&draft_client);
            let model = model.clone();
            let requirements = requirements_owned.clone();
            async move {
                let draft = draft_plan(client.as_ref(), &model, &requirements, &persona).await?;
                Ok((persona, draft))
            }
        })
        .await?;

        log_parallel_complete!(drafts.len(), "persona drafts");

        // Drafts arrive in completion order; restore persona order before
        // aggregation so the merged prompt is deterministic.
        let mut ordered: Vec<(String, String)> = Vec::with_capacity(PERSONAS.len());
        for persona in PERSONAS {
            if let Some(draft) = drafts.iter().find(|(p, _)| p == persona) {
                ordered.push(draft.clone());
            }
        }

        let aggregated = self.aggregate_plans(client.as_ref(), &ordered).await?;

        Ok(DevelopmentPlan {
            drafts: ordered,
            aggregated,
        })
    }

    /// Aggregate the per-persona drafts into a single development plan.
    async fn aggregate_plans<C>(&self, client: &C, drafts: &[(String, String)]) -> Result<String>
    where
        C: LlmClient + ?Sized,
    {
        let developer_prompt = "\
You are given development plans from different personas.
You will combine the plans into a single development plan.
The aggregated plan should be well-structured and include all tasks, timelines, and resources.
Output the aggregated plan in markdown format.";

        let rendered = drafts
            .iter()
            .map(|(persona, draft)| format!("## {} plan\n{}", persona, draft))
            .collect::<Vec<_>>()
            .join("\n\n");

        let request = CompletionRequest::new(
            self.model.as_str(),
            vec![
                ChatMessage::developer(developer_prompt),
                ChatMessage::user(rendered),
            ],
        );
        client
            .complete(request)
            .await
            .context("failed to aggregate development plans")
    }
}

/// Create one persona's development plan for the requirements.
async fn draft_plan<C>(client: &C, model: &str, requirements: &str, persona: &str) -> Result<String>
where
    C: LlmClient + ?Sized,
{
    let developer_prompt = format!(
        "You are an AI assistant that helps a {} create development plans.\n\
         You will create a concise development plan for the requirements provided.\n\
         The plan should be concise and only include tasks, timelines, and resources needed.\n\
         Output the plan in markdown format.",
        persona
    );

    let request = CompletionRequest::new(
        model,
        vec![
            ChatMessage::developer(developer_prompt),
            ChatMessage::user(format!(
                "Create a development plan for the following requirements: {}",
                requirements
            )),
        ],
    );
    client
        .complete(request)
        .await
        .with_context(|| format!("failed to draft a plan as {}", persona))
}
