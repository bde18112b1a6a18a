//! Bounded think/act/observe loop over a tool catalog.
//!
//! Each turn sends the instructions plus the conversation so far to the
//! model, parses the reply for either a final answer or a tool invocation,
//! runs the tool, and feeds the observation back in. The turn ceiling is the
//! only termination guarantee: a model that never produces a final answer
//! ends the loop with [`ReactOutcome::Exhausted`].

use std::sync::LazyLock;

use agent_workflows_sdk::{log_tool_invoked, log_turn_start};
use anyhow::Result;
use regex::Regex;

use llm_client::{ChatMessage, CompletionRequest, LlmClient};

use crate::workflow_utils::catalog::ToolCatalog;

static FINAL_ANSWER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Final Answer:\s*```(?:sql)?(.*?)```").expect("final answer pattern")
});

static ACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Action:\s*(\w+)(?:\(([^)]*)\))?").expect("action pattern"));

/// What a model reply parsed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedStep {
    /// Terminal answer, fence-stripped and trimmed.
    FinalAnswer(String),
    /// A tool invocation; `input` is empty for zero-argument tools.
    Action { name: String, input: String },
    /// Neither marker matched.
    Unparsed,
}

/// Best-effort parse of a model reply.
///
/// The final-answer marker wins over an action marker when both appear, so a
/// reply that narrates its past actions before concluding still terminates
/// the loop.
pub fn parse_step(text: &str) -> ParsedStep {
    if let Some(caps) = FINAL_ANSWER_RE.captures(text) {
        return ParsedStep::FinalAnswer(caps[1].trim().to_string());
    }

    if let Some(caps) = ACTION_RE.captures(text) {
        let name = caps[1].to_string();
        let input = caps
            .get(2)
            .map(|m| m.as_str())
            .unwrap_or("")
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string();
        return ParsedStep::Action { name, input };
    }

    ParsedStep::Unparsed
}

/// How the loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactOutcome {
    Answer(String),
    Exhausted,
}

/// Loop settings. `instructions` is the workflow-specific header rendered
/// above the tool list and format contract.
#[derive(Debug, Clone)]
pub struct ReactConfig {
    /// Identifier used in progress events
    pub task_id: String,
    pub model: String,
    pub max_turns: usize,
    pub instructions: String,
}

/// Single-threaded tool-use agent: one model call and at most one tool
/// invocation per turn, strictly sequential.
pub struct ReactAgent<'a, C: LlmClient + ?Sized> {
    client: &'a C,
    catalog: &'a ToolCatalog,
    config: ReactConfig,
}

impl<'a, C: LlmClient + ?Sized> ReactAgent<'a, C> {
    pub fn new(client: &'a C, catalog: &'a ToolCatalog, config: ReactConfig) -> Self {
        Self {
            client,
            catalog,
            config,
        }
    }

    /// Drive the loop until a final answer or the turn ceiling.
    ///
    /// Unparseable replies and unknown tool names are converted into
    /// corrective observations and fed back; both consume a turn. Only
    /// infrastructure failures (the completion call itself) return an error.
    pub async fn run(&self, question: &str) -> Result<ReactOutcome> {
        let mut transcript: Vec<ChatMessage> = Vec::new();

        for turn in 1..=self.config.max_turns {
            log_turn_start!(&self.config.task_id, turn, self.config.max_turns);

            let messages = vec![
                ChatMessage::developer(self.render_instructions(&transcript)),
                ChatMessage::user(question),
            ];
            let response = self
                .client
                .complete(CompletionRequest::new(self.config.model.as_str(), messages))
                .await?;

            let observation = match parse_step(&response) {
                ParsedStep::FinalAnswer(answer) => return Ok(ReactOutcome::Answer(answer)),
                ParsedStep::Action { name, input } => match self.catalog.get(&name) {
                    Some(tool) => {
                        log_tool_invoked!(&self.config.task_id, &name, &input);
                        tool.run(&input).await
                    }
                    None => format!(
                        "Error: tool '{}' not found. Available tools: {}",
                        name,
                        self.catalog.names()
                    ),
                },
                ParsedStep::Unparsed => "I couldn't determine which tool to use. Please use \
                                         the format 'Action: tool_name(arguments)'."
                    .to_string(),
            };

            transcript.push(ChatMessage::assistant(response));
            transcript.push(ChatMessage::user(format!("Observation: {}", observation)));
        }

        Ok(ReactOutcome::Exhausted)
    }

    fn render_instructions(&self, transcript: &[ChatMessage]) -> String {
        let history = transcript
            .iter()
            .map(|m| format!("{}: {}", m.role.as_str(), m.content))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"{instructions}

You have access to the following tools:

{tools}

Please use the following format:

```
Thought: I need to think about the question and decide if I need to use a tool.
Action: tool_name(arguments)
Observation: the result of the action. Will be provided by the tool.
```

... (repeat Thought/Action/Observation as many times as needed)

When you have a response to say to the Human, or if you do not need to use a tool, you MUST use the format:

```
Thought: I now know the final answer.
Final Answer: ```<answer>```
```

Do not provide a final answer until you are sure you have the correct answer and you do not need to use any more tools.

Begin!

Previous conversation history:
{history}"#,
            instructions = self.config.instructions,
            tools = self.catalog.render_descriptions(),
            history = history,
        )
    }
}
