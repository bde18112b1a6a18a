//! Dependency-aware plan execution.
//!
//! A plan is a flat list of subtasks, each naming the subtasks that must
//! finish first. Execution proceeds in rounds: every not-yet-completed task
//! whose dependencies are all completed is dispatched concurrently, the
//! round joins, results are folded back into the plan, and the next round's
//! ready set is computed. Plans are validated up front so a cyclic or
//! dangling dependency fails loudly instead of stalling the run.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use agent_workflows_sdk::{log_parallel_complete, log_parallel_start};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::workflow_utils::batch::execute_batch;

/// Lifecycle of a single subtask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// One unit of decomposed work. The description is opaque to the scheduler;
/// only `id` and `dependencies` drive execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubTask {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub result: String,
}

impl SubTask {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        dependencies: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            dependencies,
            status: TaskStatus::Pending,
            result: String::new(),
        }
    }
}

/// Reject plans the scheduler cannot finish: duplicate ids, dependencies on
/// unknown ids, and dependency cycles.
pub fn validate_plan(tasks: &[SubTask]) -> Result<()> {
    let mut ids: HashSet<&str> = HashSet::new();
    for task in tasks {
        if !ids.insert(task.id.as_str()) {
            bail!("duplicate task id '{}' in plan", task.id);
        }
    }

    for task in tasks {
        for dep in &task.dependencies {
            if !ids.contains(dep.as_str()) {
                bail!(
                    "task '{}' depends on unknown task '{}'",
                    task.id,
                    dep
                );
            }
        }
    }

    // Kahn-style pass: if no progress can be made before every task is
    // accounted for, the remainder contains a cycle.
    let mut satisfied: HashSet<&str> = HashSet::new();
    while satisfied.len() < tasks.len() {
        let mut progressed = false;
        for task in tasks {
            if satisfied.contains(task.id.as_str()) {
                continue;
            }
            if task
                .dependencies
                .iter()
                .all(|dep| satisfied.contains(dep.as_str()))
            {
                satisfied.insert(task.id.as_str());
                progressed = true;
            }
        }
        if !progressed {
            let mut remaining: Vec<&str> = tasks
                .iter()
                .map(|t| t.id.as_str())
                .filter(|id| !satisfied.contains(id))
                .collect();
            remaining.sort_unstable();
            bail!("dependency cycle in plan involving: {}", remaining.join(", "));
        }
    }

    Ok(())
}

/// Tasks that can run now: not yet completed, with every dependency in
/// `completed`. Plan order is preserved.
pub fn ready_tasks<'a>(tasks: &'a [SubTask], completed: &HashSet<String>) -> Vec<&'a SubTask> {
    tasks
        .iter()
        .filter(|task| {
            !completed.contains(&task.id)
                && task
                    .dependencies
                    .iter()
                    .all(|dep| completed.contains(dep))
        })
        .collect()
}

/// Execute every subtask in the plan, dispatching dependency-satisfied tasks
/// concurrently (at most `concurrency` in flight) and joining each round
/// before computing the next.
///
/// `execute` performs the actual work for one task and must be safe to call
/// concurrently on independent tasks. Its result is written to the task and
/// the task is marked `Completed`. The first executor error aborts the run:
/// in-flight tasks of that round are marked `Failed` and the error is
/// returned, leaving the plan incomplete.
pub async fn run_plan<F, Fut>(tasks: &mut [SubTask], concurrency: usize, execute: F) -> Result<()>
where
    F: Fn(SubTask) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    validate_plan(tasks)?;

    let execute = Arc::new(execute);
    let mut completed: HashSet<String> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .map(|t| t.id.clone())
        .collect();
    let mut round = 0usize;

    while completed.len() < tasks.len() {
        round += 1;
        let ready: Vec<SubTask> = ready_tasks(tasks, &completed)
            .into_iter()
            .cloned()
            .collect();
        if ready.is_empty() {
            // Unreachable after validation; kept so a future caller skipping
            // validation still gets an error instead of a spin loop.
            bail!("round {} has no runnable task: unsatisfiable dependencies", round);
        }

        let ready_ids: HashSet<&str> = ready.iter().map(|t| t.id.as_str()).collect();
        for task in tasks.iter_mut() {
            if ready_ids.contains(task.id.as_str()) {
                task.status = TaskStatus::InProgress;
            }
        }
        drop(ready_ids);

        log_parallel_start!(ready.len(), "tasks");

        let exec = Arc::clone(&execute);
        let batch = execute_batch(round, ready, concurrency, move |task: SubTask, _ctx| {
            let exec = Arc::clone(&exec);
            async move {
                let id = task.id.clone();
                let result = exec(task).await?;
                Ok((id, result))
            }
        })
        .await;

        let results = match batch {
            Ok(results) => results,
            Err(e) => {
                for task in tasks.iter_mut() {
                    if task.status == TaskStatus::InProgress {
                        task.status = TaskStatus::Failed;
                    }
                }
                return Err(e);
            }
        };

        log_parallel_complete!(results.len(), "tasks");

        for (id, result) in results {
            if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
                task.result = result;
                task.status = TaskStatus::Completed;
            }
            completed.insert(id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, deps: &[&str]) -> SubTask {
        SubTask::new(
            id,
            format!("task {}", id),
            deps.iter().map(|d| d.to_string()).collect(),
        )
    }

    #[test]
    fn test_validate_plan_accepts_diamond() {
        let tasks = vec![
            task("A", &[]),
            task("B", &["A"]),
            task("C", &["A"]),
            task("D", &["B", "C"]),
        ];
        assert!(validate_plan(&tasks).is_ok());
    }

    #[test]
    fn test_validate_plan_rejects_cycle() {
        let tasks = vec![task("A", &["B"]), task("B", &["A"])];
        let err = validate_plan(&tasks).unwrap_err().to_string();
        assert!(err.contains("cycle"));
        assert!(err.contains("A"));
        assert!(err.contains("B"));
    }

    #[test]
    fn test_validate_plan_rejects_self_dependency() {
        let tasks = vec![task("A", &["A"])];
        assert!(validate_plan(&tasks).unwrap_err().to_string().contains("cycle"));
    }

    #[test]
    fn test_validate_plan_rejects_unknown_dependency() {
        let tasks = vec![task("A", &["ghost"])];
        let err = validate_plan(&tasks).unwrap_err().to_string();
        assert!(err.contains("unknown task 'ghost'"));
    }

    #[test]
    fn test_validate_plan_rejects_duplicate_ids() {
        let tasks = vec![task("A", &[]), task("A", &[])];
        assert!(validate_plan(&tasks)
            .unwrap_err()
            .to_string()
            .contains("duplicate task id"));
    }

    #[test]
    fn test_ready_tasks_round_progression() {
        let tasks = vec![
            task("A", &[]),
            task("B", &["A"]),
            task("C", &["A"]),
            task("D", &["B", "C"]),
        ];

        let mut completed = HashSet::new();
        let round1: Vec<&str> = ready_tasks(&tasks, &completed)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(round1, vec!["A"]);

        completed.insert("A".to_string());
        let round2: Vec<&str> = ready_tasks(&tasks, &completed)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(round2, vec!["B", "C"]);

        completed.insert("B".to_string());
        completed.insert("C".to_string());
        let round3: Vec<&str> = ready_tasks(&tasks, &completed)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(round3, vec!["D"]);
    }

    #[tokio::test]
    async fn test_run_plan_completes_every_task_once() {
        use std::sync::Mutex;

        let mut tasks = vec![
            task("A", &[]),
            task("B", &["A"]),
            task("C", &["A"]),
            task("D", &["B", "C"]),
        ];

        let dispatched: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let log = dispatched.clone();

        run_plan(&mut tasks, 4, move |task| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push(task.id.clone());
                Ok(format!("done:{}", task.id))
            }
        })
        .await
        .unwrap();

        for task in &tasks {
            assert_eq!(task.status, TaskStatus::Completed);
            assert_eq!(task.result, format!("done:{}", task.id));
        }

        let order = dispatched.lock().unwrap().clone();
        assert_eq!(order.len(), 4, "each task dispatched exactly once");
        let pos = |id: &str| order.iter().position(|t| t == id).unwrap();
        assert!(pos("A") < pos("B"));
        assert!(pos("A") < pos("C"));
        assert!(pos("D") > pos("B"));
        assert!(pos("D") > pos("C"));
    }

    #[tokio::test]
    async fn test_run_plan_rejects_cyclic_plan() {
        let mut tasks = vec![task("A", &["B"]), task("B", &["A"])];
        let result = run_plan(&mut tasks, 2, |task| async move { Ok(task.id) }).await;
        assert!(result.unwrap_err().to_string().contains("cycle"));
        // Nothing ran
        assert!(tasks.iter().all(|t| t.status == TaskStatus::Pending));
    }

    #[tokio::test]
    async fn test_run_plan_marks_failed_on_executor_error() {
        let mut tasks = vec![task("A", &[]), task("B", &["A"])];

        let result = run_plan(&mut tasks, 2, |task| async move {
            if task.id == "A" {
                anyhow::bail!("backend unavailable")
            }
            Ok(task.id)
        })
        .await;

        assert!(result.is_err());
        assert_eq!(tasks[0].status, TaskStatus::Failed);
        // B never became ready
        assert_eq!(tasks[1].status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_run_plan_skips_already_completed_tasks() {
        let mut tasks = vec![task("A", &[]), task("B", &["A"])];
        tasks[0].status = TaskStatus::Completed;
        tasks[0].result = "cached".to_string();

        run_plan(&mut tasks, 2, |task| async move {
            assert_ne!(task.id, "A", "completed task must not be re-dispatched");
            Ok(format!("done:{}", task.id))
        })
        .await
        .unwrap();

        assert_eq!(tasks[0].result, "cached");
        assert_eq!(tasks[1].result, "done:B");
    }
}
