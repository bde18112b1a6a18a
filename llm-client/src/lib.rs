//! Async client for OpenAI-compatible chat completion APIs.
//!
//! The crate exposes a small [`LlmClient`] trait so workflow code can be
//! driven by either the real [`OpenAiClient`] or a [`ScriptedClient`] in
//! tests, plus a [`parse`] helper that requests a JSON-schema constrained
//! response and decodes it into a typed value.

pub mod client;
pub mod error;
pub mod message;

pub use client::{parse, CompletionRequest, LlmClient, OpenAiClient, OpenAiConfig, ScriptedClient};
pub use error::LlmError;
pub use message::{ChatMessage, Role};
