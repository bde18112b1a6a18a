//! Prompt-chaining essay writer: outline, expand, write.

use agent_workflows_sdk::log_info;
use anyhow::{Context, Result};

use llm_client::{ChatMessage, CompletionRequest, LlmClient};

pub struct EssayWriter {
    model: String,
    verbose: bool,
}

impl Default for EssayWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl EssayWriter {
    pub fn new() -> Self {
        Self {
            model: crate::DEFAULT_MODEL.to_string(),
            verbose: false,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Print intermediate outline stages to stdout.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Write an essay on the topic via the three-step chain.
    pub async fn write_essay<C>(&self, client: &C, topic: &str) -> Result<String>
    where
        C: LlmClient + ?Sized,
    {
        log_info!("creating outline for '{}'", topic);
        let outline = self.create_outline(client, topic).await?;
        if self.verbose {
            println!("\nOutline:\n{}", outline);
        }

        log_info!("expanding outline");
        let expanded = self.expand_outline(client, &outline).await?;
        if self.verbose {
            println!("\nExpanded Outline:\n{}", expanded);
        }

        log_info!("writing essay");
        self.write_from_expanded_outline(client, &expanded).await
    }

    async fn create_outline<C>(&self, client: &C, topic: &str) -> Result<String>
    where
        C: LlmClient + ?Sized,
    {
        let developer_prompt = "\
You are an AI assistant that helps users write essays.
You will create an outline for the essay based on the topic provided.
The outline should be formatted as a list of sections and subsections
marked with numbers (1., 2., 3., etc.).
Include a short (1-2 sentence) description of each section.
Output the outline in markdown format.";

        let request = CompletionRequest::new(
            self.model.as_str(),
            vec![
                ChatMessage::developer(developer_prompt),
                ChatMessage::user(format!(
                    "Create an outline for an essay on the topic: {}",
                    topic
                )),
            ],
        );
        client.complete(request).await.context("failed to create outline")
    }

    async fn expand_outline<C>(&self, client: &C, outline: &str) -> Result<String>
    where
        C: LlmClient + ?Sized,
    {
        let developer_prompt = "\
You are an AI assistant that helps users write essays.
You are provided with an outline, which you will expand by adding content to each section.
The content should be relevant to the topic and well-structured.
Output the expanded outline in markdown format.";

        let request = CompletionRequest::new(
            self.model.as_str(),
            vec![
                ChatMessage::developer(developer_prompt),
                ChatMessage::user(format!("Expand the following outline: ```{}```", outline)),
            ],
        );
        client.complete(request).await.context("failed to expand outline")
    }

    async fn write_from_expanded_outline<C>(&self, client: &C, expanded: &str) -> Result<String>
    where
        C: LlmClient + ?Sized,
    {
        let developer_prompt = "\
You are an AI assistant that helps users write essays.
You are provided with an expanded outline,
which you will use to write an essay based on it.
The essay should be coherent and NOT in bullet-point format.
Output the essay in markdown format.";

        let request = CompletionRequest::new(
            self.model.as_str(),
            vec![
                ChatMessage::developer(developer_prompt),
                ChatMessage::user(format!(
                    "Write an essay based on the following expanded outline: ```{}```",
                    expanded
                )),
            ],
        );
        client.complete(request).await.context("failed to write essay")
    }
}
