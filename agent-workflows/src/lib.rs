// Shared scheduling, tool-use loop, and batch utilities
pub mod workflow_utils;

// Orchestrator / worker / synthesizer research workflow
pub mod research;

// ReAct natural-language-to-SQL workflow
pub mod query_writer;

// Write / review / revise code generation workflow
pub mod coding;

// Persona-parallel development planning workflow
pub mod planner;

// Prompt-chaining essay workflow
pub mod essay;

// Two-tier model routing workflow
pub mod routing;

/// Default model for the workflows; individual workflows may override it.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
