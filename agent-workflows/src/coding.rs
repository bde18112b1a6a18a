//! Write / review / revise code generation.
//!
//! Each iteration drafts code, has a reviewer pass structured judgement on
//! it, and either returns the accepted code or folds the feedback into the
//! next draft's prompt. The iteration ceiling returns the last attempt
//! rather than failing.

use agent_workflows_sdk::log_info;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use llm_client::{parse, ChatMessage, CompletionRequest, LlmClient};

use crate::workflow_utils::refine::{refine, RefineStep};

pub const DEFAULT_MAX_ITERATIONS: usize = 3;

/// Reviewer verdict on one code attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub is_correct: bool,
    pub feedback: String,
}

/// One draft plus the prompt that produced it.
struct Attempt {
    prompt: String,
    code: String,
}

pub struct Coding {
    model: String,
    max_iterations: usize,
}

impl Default for Coding {
    fn default() -> Self {
        Self::new()
    }
}

impl Coding {
    pub fn new() -> Self {
        Self {
            model: crate::DEFAULT_MODEL.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Generate code based on a prompt.
    pub async fn write_code<C>(&self, client: &C, prompt: &str) -> Result<String>
    where
        C: LlmClient + ?Sized,
    {
        let developer_prompt = "\
You are a skilled programmer. Write code based on the given prompt.
If feedback is provided, use it to improve the code.
Provide the complete code without any additional explanations.";

        let request = CompletionRequest::new(
            self.model.as_str(),
            vec![
                ChatMessage::developer(developer_prompt),
                ChatMessage::user(prompt),
            ],
        );
        client.complete(request).await.context("failed to write code")
    }

    /// Examine code for correctness and efficiency.
    pub async fn examine_code<C>(&self, client: &C, prompt: &str, code: &str) -> Result<Feedback>
    where
        C: LlmClient + ?Sized,
    {
        let developer_prompt = format!(
            "You are a code reviewer. Examine the code for correctness and efficiency.\n\
             Make sure the code meets the following criteria:\n\
             1. It should be syntactically correct and runnable.\n\
             2. It should solve the problem described in the prompt.\n\
             3. It should be efficient and follow best practices.\n\
             4. It should have type annotations and docstrings where appropriate.\n\
             Mark the code correct if it is good, or provide specific feedback \
             for improvement.\n\
             The code was written based on the following prompt:\n{}",
            prompt
        );

        let request = CompletionRequest::new(
            self.model.as_str(),
            vec![
                ChatMessage::developer(developer_prompt),
                ChatMessage::user(format!("Review this code:\n{}", code)),
            ],
        );

        parse(client, request, "feedback", feedback_schema())
            .await
            .context("failed to examine code")
    }

    /// Generate code with iterative feedback and improvements. Returns the
    /// first accepted draft, or the last attempt when the iteration budget
    /// runs out.
    pub async fn generate_code<C>(&self, client: &C, prompt: &str) -> Result<String>
    where
        C: LlmClient + ?Sized,
    {
        let initial = Attempt {
            prompt: prompt.to_string(),
            code: String::new(),
        };

        let attempt = refine(initial, self.max_iterations, |attempt, iteration| async move {
            log_info!("code generation iteration {}/{}", iteration, self.max_iterations);

            let code = self.write_code(client, &attempt.prompt).await?;
            let feedback = self.examine_code(client, prompt, &code).await?;

            if feedback.is_correct {
                return Ok(RefineStep::Accept(Attempt {
                    prompt: attempt.prompt,
                    code,
                }));
            }

            let revised_prompt = format!(
                "Original prompt: {}\nPrevious attempt: {}\nFeedback: {}",
                prompt, code, feedback.feedback
            );
            Ok(RefineStep::Revise(Attempt {
                prompt: revised_prompt,
                code,
            }))
        })
        .await?;

        Ok(attempt.code)
    }
}

fn feedback_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "is_correct": {"type": "boolean"},
            "feedback": {"type": "string"}
        },
        "required": ["is_correct", "feedback"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_client::ScriptedClient;

    #[tokio::test]
    async fn test_generate_code_accepts_on_correct_feedback() {
        let client = ScriptedClient::new(vec![
            "def f(): return 1",
            r#"{"is_correct": false, "feedback": "missing docstring"}"#,
            "def f():\n    \"\"\"Return one.\"\"\"\n    return 1",
            r#"{"is_correct": true, "feedback": "CORRECT"}"#,
        ]);

        let coding = Coding::new();
        let code = coding
            .generate_code(&client, "write a function returning 1")
            .await
            .unwrap();
        assert!(code.contains("Return one."));
        assert_eq!(client.calls(), 4);

        // The second draft request carried the reviewer feedback
        let second_write = &client.requests()[2];
        assert!(second_write.messages[1].content.contains("missing docstring"));
        assert!(second_write.messages[1]
            .content
            .contains("Original prompt: write a function returning 1"));
    }

    #[tokio::test]
    async fn test_generate_code_returns_last_attempt_on_exhaustion() {
        let client = ScriptedClient::new(vec![
            "attempt one",
            r#"{"is_correct": false, "feedback": "wrong"}"#,
        ]);

        let coding = Coding::new().with_max_iterations(1);
        let code = coding.generate_code(&client, "task").await.unwrap();
        assert_eq!(code, "attempt one");
    }
}
