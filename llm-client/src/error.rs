use thiserror::Error;

/// Errors surfaced by completion clients.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("missing API key: set the {0} environment variable")]
    MissingApiKey(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("response error: {0}")]
    Response(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}
