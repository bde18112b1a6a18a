//! Tool-use loop tests: turn ceiling, unknown tools, corrective
//! observations, and transcript replay.

use agent_workflows::workflow_utils::catalog::ToolCatalog;
use agent_workflows::workflow_utils::react::{ReactAgent, ReactConfig, ReactOutcome};
use llm_client::ScriptedClient;

use super::common::search_catalog;

fn config(max_turns: usize) -> ReactConfig {
    ReactConfig {
        task_id: "test_loop".to_string(),
        model: "gpt-4o-mini".to_string(),
        max_turns,
        instructions: "Answer the question using the tools.".to_string(),
    }
}

#[tokio::test]
async fn test_loop_exhausts_after_exactly_max_turns() {
    let client = ScriptedClient::repeating("Thought: I am going in circles.");
    let catalog = ToolCatalog::new();
    let agent = ReactAgent::new(&client, &catalog, config(4));

    let outcome = agent.run("what now?").await.unwrap();
    assert_eq!(outcome, ReactOutcome::Exhausted);
    assert_eq!(client.calls(), 4, "exactly max_turns model calls, never more");
}

#[tokio::test]
async fn test_unknown_tool_feeds_error_observation_and_continues() {
    let (catalog, _invocations) = search_catalog("nothing");
    let client = ScriptedClient::new(vec![
        "Thought: let me try something exotic.\nAction: fly_to_moon(now)",
        "Thought: fine, I will just answer.\nFinal Answer: ```no moon today```",
    ]);
    let agent = ReactAgent::new(&client, &catalog, config(5));

    let outcome = agent.run("q").await.unwrap();
    assert_eq!(outcome, ReactOutcome::Answer("no moon today".to_string()));

    // The second turn's instructions replayed the error observation
    let second = &client.requests()[1].messages[0].content;
    assert!(second.contains("tool 'fly_to_moon' not found"));
    assert!(second.contains("Available tools: web_search"));
}

#[tokio::test]
async fn test_unparseable_reply_gets_corrective_observation() {
    let (catalog, _invocations) = search_catalog("nothing");
    let client = ScriptedClient::new(vec![
        "I would rather chat about the weather.",
        "Final Answer: ```ok```",
    ]);
    let agent = ReactAgent::new(&client, &catalog, config(5));

    let outcome = agent.run("q").await.unwrap();
    assert_eq!(outcome, ReactOutcome::Answer("ok".to_string()));

    let second = &client.requests()[1].messages[0].content;
    assert!(second.contains("I couldn't determine which tool to use"));
    assert!(second.contains("Action: tool_name(arguments)"));
}

#[tokio::test]
async fn test_final_answer_extraction_ignores_thought_text() {
    let catalog = ToolCatalog::new();
    let client = ScriptedClient::new(vec![
        "Thought: I now know the SQL query to answer the question.\nFinal Answer: ```SELECT 1```",
    ]);
    let agent = ReactAgent::new(&client, &catalog, config(3));

    let outcome = agent.run("q").await.unwrap();
    assert_eq!(outcome, ReactOutcome::Answer("SELECT 1".to_string()));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_tool_observation_is_replayed_into_next_turn() {
    let (catalog, invocations) = search_catalog("search says: 42 results");
    let client = ScriptedClient::new(vec![
        "Thought: search first.\nAction: web_search(\"rust schedulers\")",
        "Final Answer: ```there are 42```",
    ]);
    let agent = ReactAgent::new(&client, &catalog, config(5));

    let outcome = agent.run("how many?").await.unwrap();
    assert_eq!(outcome, ReactOutcome::Answer("there are 42".to_string()));

    // Quotes were stripped from the parsed tool input
    assert_eq!(invocations.lock().unwrap().as_slice(), ["rust schedulers"]);

    // The next turn saw both the assistant text and the observation
    let second = &client.requests()[1].messages[0].content;
    assert!(second.contains("assistant: Thought: search first."));
    assert!(second.contains("Observation: search says: 42 results"));
}
