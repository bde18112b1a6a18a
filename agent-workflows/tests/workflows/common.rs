//! Common test utilities for workflow tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use agent_workflows::workflow_utils::catalog::{Tool, ToolCatalog};
use agent_workflows::workflow_utils::scheduler::SubTask;

/// Create a subtask with the given dependencies
pub fn task(id: &str, deps: &[&str]) -> SubTask {
    SubTask::new(
        id,
        format!("work on {}", id),
        deps.iter().map(|d| d.to_string()).collect(),
    )
}

/// The diamond plan: A, then B and C in parallel, then D
pub fn diamond_plan() -> Vec<SubTask> {
    vec![
        task("A", &[]),
        task("B", &["A"]),
        task("C", &["A"]),
        task("D", &["B", "C"]),
    ]
}

/// Tool that records every invocation and returns a canned observation
pub struct RecordingTool {
    name: &'static str,
    description: &'static str,
    observation: String,
    pub invocations: Arc<Mutex<Vec<String>>>,
}

impl RecordingTool {
    pub fn new(name: &'static str, description: &'static str, observation: &str) -> Self {
        Self {
            name,
            description,
            observation: observation.to_string(),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    async fn run(&self, input: &str) -> String {
        self.invocations.lock().unwrap().push(input.to_string());
        self.observation.clone()
    }
}

/// Catalog holding a single recording search tool; returns the catalog and
/// the invocation log.
pub fn search_catalog(observation: &str) -> (Arc<ToolCatalog>, Arc<Mutex<Vec<String>>>) {
    let tool = RecordingTool::new("web_search", "Search for information on the web", observation);
    let invocations = tool.invocations.clone();
    let mut catalog = ToolCatalog::new();
    catalog.register(Arc::new(tool));
    (Arc::new(catalog), invocations)
}
