//! End-to-end research workflow against a scripted client.

use std::sync::Arc;

use agent_workflows::research::{run_research_workflow, ResearchConfig};
use agent_workflows::workflow_utils::scheduler::TaskStatus;
use llm_client::{LlmClient, ScriptedClient};

use super::common::search_catalog;

#[tokio::test]
async fn test_research_workflow_plan_execute_synthesize() {
    // Two subtasks in a chain, batch size 1: call order is deterministic.
    let script = vec![
        // Phase 1: the plan
        r#"{"subtasks": [
            {"id": "t1", "description": "find background material", "dependencies": []},
            {"id": "t2", "description": "summarize the findings", "dependencies": ["t1"]}
        ]}"#
            .to_string(),
        // t1: tool planning, then synthesis over the observation
        r#"{"need_tool": true, "tools": [{"tool_name": "web_search", "tool_input": "background material"}]}"#.to_string(),
        "background: solar output is rising".to_string(),
        // t2: no tools needed
        r#"{"need_tool": false, "tools": []}"#.to_string(),
        "summary of findings".to_string(),
        // Phase 3: final synthesis
        "the full report".to_string(),
    ];

    let client = Arc::new(ScriptedClient::new(script));
    let (catalog, invocations) = search_catalog("search result: solar data");

    let mut config = ResearchConfig::new("solar trends");
    config.batch_size = 1;
    config.save_artifacts = false;

    let dyn_client: Arc<dyn LlmClient> = client.clone();
    let outcome = run_research_workflow(dyn_client, catalog, config)
        .await
        .unwrap();

    assert_eq!(outcome.summary, "the full report");
    assert_eq!(client.calls(), 6);

    // The plan completed with each worker's synthesis as the task result
    assert_eq!(outcome.plan.subtasks.len(), 2);
    for task in &outcome.plan.subtasks {
        assert_eq!(task.status, TaskStatus::Completed);
    }
    assert_eq!(
        outcome.plan.subtasks[0].result,
        "background: solar output is rising"
    );
    assert_eq!(outcome.plan.subtasks[1].result, "summary of findings");

    // The worker actually invoked the search tool with the planned input
    assert_eq!(
        invocations.lock().unwrap().as_slice(),
        ["background material"]
    );

    let requests = client.requests();

    // t1's synthesis request carried the tool observation
    assert!(requests[2].messages[0]
        .content
        .contains("search result: solar data"));

    // The final synthesis saw both completed subtask results
    let final_prompt = &requests[5].messages[0].content;
    assert!(final_prompt.contains("background: solar output is rising"));
    assert!(final_prompt.contains("summary of findings"));
    assert!(final_prompt.contains("solar trends"));
}

#[tokio::test]
async fn test_research_workflow_fails_on_cyclic_model_plan() {
    let script = vec![r#"{"subtasks": [
        {"id": "a", "description": "first", "dependencies": ["b"]},
        {"id": "b", "description": "second", "dependencies": ["a"]}
    ]}"#];

    let client: Arc<dyn LlmClient> = Arc::new(ScriptedClient::new(script));
    let (catalog, _invocations) = search_catalog("unused");

    let mut config = ResearchConfig::new("anything");
    config.save_artifacts = false;

    let err = run_research_workflow(client, catalog, config)
        .await
        .unwrap_err()
        .to_string();
    assert!(err.contains("cycle"));
}
