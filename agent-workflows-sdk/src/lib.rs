use serde::{Deserialize, Serialize};

/// Structured progress events emitted by workflows.
///
/// Events are written to stderr as single-line JSON behind a fixed marker so
/// a supervising process can follow a run without scraping console output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowLog {
    /// Phase started
    PhaseStarted {
        phase: usize,
        name: String,
        total_phases: usize,
    },
    /// Phase completed
    PhaseCompleted {
        phase: usize,
        name: String,
    },
    /// Phase failed
    PhaseFailed {
        phase: usize,
        name: String,
        error: String,
    },
    /// Task started
    TaskStarted {
        phase: usize,
        task_id: String,
        description: String,
        total_tasks: Option<usize>,
    },
    /// Task progress update
    TaskProgress {
        task_id: String,
        message: String,
    },
    /// Task completed
    TaskCompleted {
        task_id: String,
        result: Option<String>,
    },
    /// Task failed
    TaskFailed {
        task_id: String,
        error: String,
    },
    /// One think/act/observe turn started in a tool-use loop
    TurnStarted {
        task_id: String,
        turn: usize,
        max_turns: usize,
    },
    /// A tool was invoked by a loop turn or a worker
    ToolInvoked {
        task_id: String,
        tool: String,
        input: String,
    },
    /// State file created (intermediate outputs)
    StateFileCreated {
        phase: usize,
        file_path: String,
        description: String,
    },
}

impl WorkflowLog {
    /// Emit this event to stderr for machine parsing.
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            use std::io::Write;
            eprintln!("__WF_EVENT__:{}", json);
            // Force flush stderr in async/concurrent contexts
            let _ = std::io::stderr().flush();
        }
    }
}

#[macro_export]
macro_rules! log_phase_start {
    ($phase:expr, $name:expr, $total:expr) => {
        $crate::WorkflowLog::PhaseStarted {
            phase: $phase,
            name: $name.to_string(),
            total_phases: $total,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_phase_complete {
    ($phase:expr, $name:expr) => {
        $crate::WorkflowLog::PhaseCompleted {
            phase: $phase,
            name: $name.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_phase_failed {
    ($phase:expr, $name:expr, $error:expr) => {
        $crate::WorkflowLog::PhaseFailed {
            phase: $phase,
            name: $name.to_string(),
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_task_start {
    ($phase:expr, $task_id:expr, $desc:expr) => {
        $crate::WorkflowLog::TaskStarted {
            phase: $phase,
            task_id: $task_id.to_string(),
            description: $desc.to_string(),
            total_tasks: None,
        }
        .emit();
    };
    ($phase:expr, $task_id:expr, $desc:expr, $total:expr) => {
        $crate::WorkflowLog::TaskStarted {
            phase: $phase,
            task_id: $task_id.to_string(),
            description: $desc.to_string(),
            total_tasks: Some($total),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_task_progress {
    ($task_id:expr, $msg:expr) => {
        $crate::WorkflowLog::TaskProgress {
            task_id: $task_id.to_string(),
            message: $msg.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_task_complete {
    ($task_id:expr) => {
        $crate::WorkflowLog::TaskCompleted {
            task_id: $task_id.to_string(),
            result: None,
        }
        .emit();
    };
    ($task_id:expr, $result:expr) => {
        $crate::WorkflowLog::TaskCompleted {
            task_id: $task_id.to_string(),
            result: Some($result.to_string()),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_task_failed {
    ($task_id:expr, $error:expr) => {
        $crate::WorkflowLog::TaskFailed {
            task_id: $task_id.to_string(),
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_turn_start {
    ($task_id:expr, $turn:expr, $max:expr) => {
        $crate::WorkflowLog::TurnStarted {
            task_id: $task_id.to_string(),
            turn: $turn,
            max_turns: $max,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_tool_invoked {
    ($task_id:expr, $tool:expr, $input:expr) => {
        $crate::WorkflowLog::ToolInvoked {
            task_id: $task_id.to_string(),
            tool: $tool.to_string(),
            input: $input.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_state_file {
    ($phase:expr, $path:expr, $desc:expr) => {
        $crate::WorkflowLog::StateFileCreated {
            phase: $phase,
            file_path: $path.to_string(),
            description: $desc.to_string(),
        }
        .emit();
    };
}

// ============================================================================
// Console Logging Macros
// ============================================================================
// Colored console output for human-readable logs, complementing the
// structured WorkflowLog events above.
// ============================================================================

/// Logs the start of a workflow phase with a header and description.
///
/// # Example
/// ```
/// use agent_workflows_sdk::log_phase_start_console;
/// log_phase_start_console!(1, "Plan", "Decompose the topic into subtasks");
/// ```
#[macro_export]
macro_rules! log_phase_start_console {
    ($phase:expr, $title:expr, $description:expr) => {
        println!("\x1b[1;36m═══ PHASE {}: {} ═══\x1b[0m", $phase, $title);
        println!("\x1b[36m{}\x1b[0m", $description);
    };
}

/// Logs the completion of a workflow phase.
#[macro_export]
macro_rules! log_phase_complete_console {
    ($phase:expr) => {
        println!("\x1b[32m✓ Phase {} complete\x1b[0m", $phase);
    };
}

/// Logs the start of parallel execution.
///
/// # Example
/// ```
/// use agent_workflows_sdk::log_parallel_start;
/// log_parallel_start!(3, "subtasks");
/// ```
#[macro_export]
macro_rules! log_parallel_start {
    ($num_items:expr, $item_type:expr) => {
        println!(
            "\x1b[36m→ Running {} {} in parallel\x1b[0m",
            $num_items, $item_type
        );
    };
}

/// Logs the completion of parallel execution.
#[macro_export]
macro_rules! log_parallel_complete {
    ($num_items:expr, $item_type:expr) => {
        println!(
            "\x1b[32m✓ {} {} completed\x1b[0m",
            $num_items, $item_type
        );
    };
}

/// Logs an informational message.
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        println!("\x1b[36mℹ {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        println!("\x1b[36mℹ {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs a warning message.
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        println!("\x1b[33m⚠ Warning: {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        println!("\x1b[33m⚠ Warning: {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs the number of items found.
#[macro_export]
macro_rules! log_found {
    ($count:expr, $item_type:expr) => {
        println!("\x1b[36mFound {} {}\x1b[0m", $count, $item_type);
    };
}

/// Logs that a file has been saved.
#[macro_export]
macro_rules! log_file_saved {
    ($path:expr) => {
        println!("\x1b[32m✓ Saved: {}\x1b[0m", $path);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_tags() {
        let event = WorkflowLog::TaskStarted {
            phase: 2,
            task_id: "research_1".to_string(),
            description: "Gather background".to_string(),
            total_tasks: Some(4),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "task_started");
        assert_eq!(json["task_id"], "research_1");
        assert_eq!(json["total_tasks"], 4);
    }

    #[test]
    fn test_turn_event_round_trip() {
        let event = WorkflowLog::TurnStarted {
            task_id: "query".to_string(),
            turn: 3,
            max_turns: 30,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: WorkflowLog = serde_json::from_str(&json).unwrap();
        match back {
            WorkflowLog::TurnStarted { turn, max_turns, .. } => {
                assert_eq!(turn, 3);
                assert_eq!(max_turns, 30);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
