//! Phase orchestration for the research workflow.

use std::path::PathBuf;
use std::sync::Arc;

use agent_workflows_sdk::{
    log_file_saved, log_phase_complete, log_phase_complete_console, log_phase_failed,
    log_phase_start, log_phase_start_console, log_state_file, log_task_complete, log_task_failed,
    log_task_start,
};
use anyhow::{Context, Result};
use chrono::Local;
use tokio::fs;

use llm_client::LlmClient;

use crate::research::orchestrator::Orchestrator;
use crate::research::synthesizer::Synthesizer;
use crate::research::types::ResearchPlan;
use crate::research::worker::Worker;
use crate::workflow_utils::catalog::ToolCatalog;
use crate::workflow_utils::scheduler::run_plan;

const TOTAL_PHASES: usize = 3;

/// Configuration for one research run.
#[derive(Debug, Clone)]
pub struct ResearchConfig {
    /// Research topic
    pub topic: String,
    /// Number of subtasks to execute concurrently within a round
    pub batch_size: usize,
    /// Model used for every call in the workflow
    pub model: String,
    /// Output path for the final synthesis (defaults under ./OUTPUT)
    pub output: Option<String>,
    /// Write plan and synthesis artifacts to disk
    pub save_artifacts: bool,
}

impl ResearchConfig {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            batch_size: 4,
            model: crate::DEFAULT_MODEL.to_string(),
            output: None,
            save_artifacts: true,
        }
    }
}

/// Completed plan plus the synthesized write-up.
#[derive(Debug)]
pub struct ResearchOutcome {
    pub plan: ResearchPlan,
    pub summary: String,
}

/// Run the full research workflow: plan, execute subtasks in
/// dependency-ordered concurrent rounds, synthesize.
pub async fn run_research_workflow(
    client: Arc<dyn LlmClient>,
    catalog: Arc<ToolCatalog>,
    config: ResearchConfig,
) -> Result<ResearchOutcome> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();

    // Phase 1: create the plan
    log_phase_start!(1, "Create Research Plan", TOTAL_PHASES);
    log_phase_start_console!(1, "Plan", "Decompose the topic into subtasks");

    let orchestrator = Orchestrator::new(config.model.clone());
    let mut plan = orchestrator.create_plan(&client, &config.topic).await?;

    if config.save_artifacts {
        let path = PathBuf::from(format!("./OUTPUT/research_plan_{}.yaml", timestamp));
        save_yaml(&path, &plan).await?;
        log_state_file!(1, path.display(), "Research plan");
        log_file_saved!(path.display());
    }

    log_phase_complete!(1, "Create Research Plan");
    log_phase_complete_console!(1);

    // Phase 2: execute subtasks
    log_phase_start!(2, "Execute Subtasks", TOTAL_PHASES);
    log_phase_start_console!(
        2,
        "Execute",
        format!("Run subtasks with concurrency {}", config.batch_size)
    );

    let worker = Arc::new(Worker::new(config.model.clone(), catalog));
    let executor_client = Arc::clone(&client);
    let execution = run_plan(&mut plan.subtasks, config.batch_size, move |task| {
        let worker = Arc::clone(&worker);
        let client = Arc::clone(&executor_client);
        async move {
            log_task_start!(2, &task.id, &task.description);
            match worker.execute_task(&client, &task).await {
                Ok(result) => {
                    log_task_complete!(&task.id);
                    Ok(result)
                }
                Err(e) => {
                    log_task_failed!(&task.id, e);
                    Err(e)
                }
            }
        }
    })
    .await;

    if let Err(e) = execution {
        log_phase_failed!(2, "Execute Subtasks", e);
        return Err(e);
    }

    log_phase_complete!(2, "Execute Subtasks");
    log_phase_complete_console!(2);

    // Phase 3: synthesize
    log_phase_start!(3, "Synthesize Results", TOTAL_PHASES);
    log_phase_start_console!(3, "Synthesize", "Combine subtask results into a final output");

    let synthesizer = Synthesizer::new(config.model.clone());
    let summary = synthesizer
        .synthesize(&client, &config.topic, &plan)
        .await?;

    if config.save_artifacts {
        let output_path = config
            .output
            .clone()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(format!("./OUTPUT/research_output_{}.md", timestamp)));
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        fs::write(&output_path, &summary)
            .await
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        log_state_file!(3, output_path.display(), "Final research synthesis");
        log_file_saved!(output_path.display());
    }

    log_phase_complete!(3, "Synthesize Results");
    log_phase_complete_console!(3);

    Ok(ResearchOutcome { plan, summary })
}

async fn save_yaml<T: serde::Serialize>(path: &PathBuf, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let yaml = serde_yaml::to_string(value)?;
    fs::write(path, yaml)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}
