//! Reusable building blocks shared by the workflows:
//! - **catalog**: named tool registry rendered into model instructions
//! - **batch**: parallel execution with concurrency control
//! - **scheduler**: dependency-aware plan execution in concurrent rounds
//! - **react**: bounded think/act/observe loop over a tool catalog
//! - **refine**: bounded draft/critique/revise loop

pub mod batch;
pub mod catalog;
pub mod react;
pub mod refine;
pub mod scheduler;

// Re-export commonly used types and functions
pub use batch::{execute_batch, BatchContext};
pub use catalog::{Tool, ToolCatalog};
pub use react::{parse_step, ParsedStep, ReactAgent, ReactConfig, ReactOutcome};
pub use refine::{refine, RefineStep};
pub use scheduler::{ready_tasks, run_plan, validate_plan, SubTask, TaskStatus};
