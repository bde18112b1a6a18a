//! Web search tool backed by an Exa-compatible search API.

use agent_workflows_sdk::log_warning;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::workflow_utils::catalog::Tool;

const DEFAULT_ENDPOINT: &str = "https://api.exa.ai/search";
const MAX_SNIPPET_CHARS: usize = 300;

/// Web search over an Exa-style `/search` endpoint.
///
/// Constructed without a key the tool stays registered but answers every
/// query with an in-band "unavailable" observation, so workflows degrade
/// instead of failing when the search API is not configured.
pub struct WebSearchTool {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl WebSearchTool {
    pub fn new(api_key: Option<String>) -> Self {
        if api_key.is_none() {
            log_warning!("web search tool has no API key; queries will return an unavailable notice");
        }
        Self {
            http: reqwest::Client::new(),
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Read `EXA_API_KEY` from the environment; absence is tolerated.
    pub fn from_env() -> Self {
        Self::new(std::env::var("EXA_API_KEY").ok())
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search for information on the web"
    }

    async fn run(&self, query: &str) -> String {
        let Some(api_key) = &self.api_key else {
            return format!(
                "Web search unavailable (search API not configured). Query was: {}",
                query
            );
        };

        let query = query.trim();
        let body = json!({
            "query": query,
            "numResults": 5,
            "contents": {"text": true}
        });

        let response = match self
            .http
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return format!("Error performing web search for '{}': {}", query, e),
        };

        if !response.status().is_success() {
            return format!(
                "Error performing web search for '{}': HTTP {}",
                query,
                response.status()
            );
        }

        match response.json::<SearchResponse>().await {
            Ok(parsed) => format_results(query, &parsed.results),
            Err(e) => format!("Error decoding web search results for '{}': {}", query, e),
        }
    }
}

fn format_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for query: {}", query);
    }

    let formatted: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let snippet = result
                .text
                .as_deref()
                .unwrap_or("")
                .trim()
                .replace('\n', " ");
            let snippet = truncate_snippet(&snippet);
            format!(
                "Result {}:\nTitle: {}\nSnippet: {}\nURL: {}\n---",
                i + 1,
                result.title.as_deref().unwrap_or("(untitled)"),
                snippet,
                result.url
            )
        })
        .collect();

    format!("Search Results for '{}':\n{}", query, formatted.join("\n"))
}

fn truncate_snippet(snippet: &str) -> String {
    if snippet.chars().count() <= MAX_SNIPPET_CHARS {
        return snippet.to_string();
    }
    let mut cut: String = snippet.chars().take(MAX_SNIPPET_CHARS - 3).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_tool_reports_unavailable() {
        let tool = WebSearchTool::new(None);
        let observation = tool.run("rust schedulers").await;
        assert!(observation.contains("Web search unavailable"));
        assert!(observation.contains("rust schedulers"));
    }

    #[test]
    fn test_format_results_numbering_and_truncation() {
        let results = vec![
            SearchResult {
                title: Some("Long read".to_string()),
                url: "https://example.com/a".to_string(),
                text: Some("x".repeat(400)),
            },
            SearchResult {
                title: None,
                url: "https://example.com/b".to_string(),
                text: None,
            },
        ];

        let formatted = format_results("query", &results);
        assert!(formatted.starts_with("Search Results for 'query':"));
        assert!(formatted.contains("Result 1:"));
        assert!(formatted.contains("Result 2:"));
        assert!(formatted.contains("(untitled)"));
        assert!(formatted.contains("..."));
    }

    #[test]
    fn test_format_results_empty() {
        assert_eq!(
            format_results("nothing", &[]),
            "No results found for query: nothing"
        );
    }
}
