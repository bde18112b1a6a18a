//! Two-tier model routing for question answering.
//!
//! A cheap classifier call labels the question `general` or `coding`, then
//! the question is answered by the inexpensive general model or the more
//! capable (and more expensive) code model accordingly.

use agent_workflows_sdk::log_info;
use anyhow::{bail, Context, Result};

use llm_client::{ChatMessage, CompletionRequest, LlmClient};

pub const GENERAL_MODEL: &str = "gpt-4o-mini";
pub const CODE_MODEL: &str = "gpt-4.1";

pub struct QuestionAnswering {
    general_model: String,
    code_model: String,
}

impl Default for QuestionAnswering {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionAnswering {
    pub fn new() -> Self {
        Self {
            general_model: GENERAL_MODEL.to_string(),
            code_model: CODE_MODEL.to_string(),
        }
    }

    pub fn with_models(
        mut self,
        general_model: impl Into<String>,
        code_model: impl Into<String>,
    ) -> Self {
        self.general_model = general_model.into();
        self.code_model = code_model.into();
        self
    }

    /// Answer the question by routing it to the appropriate model.
    /// A classifier label other than `general` or `coding` is an error.
    pub async fn answer_question<C>(&self, client: &C, query: &str) -> Result<String>
    where
        C: LlmClient + ?Sized,
    {
        let query_type = self.route(client, query).await?;
        log_info!("query type: {}", query_type);

        match query_type.as_str() {
            "general" => self.general_answer(client, query).await,
            "coding" => self.code_answer(client, query).await,
            other => bail!("invalid query type '{}' from router", other),
        }
    }

    /// Determine the query type with the inexpensive model.
    async fn route<C>(&self, client: &C, query: &str) -> Result<String>
    where
        C: LlmClient + ?Sized,
    {
        let developer_prompt = "\
You are an AI assistant that helps users answer questions.
Your task is to determine whether the question is a general question or a coding question.
Respond only with \"general\" or \"coding\".
Do not provide any additional information or context.";

        let request = CompletionRequest::new(
            self.general_model.as_str(),
            vec![
                ChatMessage::developer(developer_prompt),
                ChatMessage::user(query),
            ],
        );
        let label = client
            .complete(request)
            .await
            .context("failed to classify the question")?;
        Ok(label.trim().to_lowercase())
    }

    async fn general_answer<C>(&self, client: &C, query: &str) -> Result<String>
    where
        C: LlmClient + ?Sized,
    {
        let developer_prompt = "\
You are an AI assistant that helps users answer general questions.
Your task is to provide a detailed and informative response to the user's question.
Make sure to include relevant information and context.";

        let request = CompletionRequest::new(
            self.general_model.as_str(),
            vec![
                ChatMessage::developer(developer_prompt),
                ChatMessage::user(query),
            ],
        );
        client
            .complete(request)
            .await
            .context("failed to answer general question")
    }

    async fn code_answer<C>(&self, client: &C, query: &str) -> Result<String>
    where
        C: LlmClient + ?Sized,
    {
        let developer_prompt = "\
You are an AI assistant that helps users answer coding questions.
Your task is to provide a detailed and informative response to the user's question.
Your response should include code snippets, explanations, and relevant information.";

        let request = CompletionRequest::new(
            self.code_model.as_str(),
            vec![
                ChatMessage::developer(developer_prompt),
                ChatMessage::user(query),
            ],
        );
        client
            .complete(request)
            .await
            .context("failed to answer coding question")
    }
}
