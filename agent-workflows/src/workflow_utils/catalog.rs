//! Named tool registry shared by research workers and tool-use loops.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// A single externally callable capability.
///
/// `run` takes one string argument and returns one string observation.
/// Expected failures (bad query, missing data, unavailable backend) must be
/// reported as descriptive text in the observation, not as an error: the
/// surrounding loop has no separate error channel for tool failures.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable lookup key, unique within a catalog.
    fn name(&self) -> &str;

    /// Capability summary shown to the model.
    fn description(&self) -> &str;

    async fn run(&self, input: &str) -> String;
}

/// Registry mapping tool names to implementations.
///
/// Built once per agent instance and read-only afterwards, so it can be
/// shared across concurrently running tasks. Registering a name twice
/// replaces the earlier tool.
#[derive(Default, Clone)]
pub struct ToolCatalog {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// `(name, description)` pairs in registration order.
    pub fn describe_all(&self) -> Vec<(String, String)> {
        self.order
            .iter()
            .filter_map(|name| {
                self.tools
                    .get(name)
                    .map(|tool| (name.clone(), tool.description().to_string()))
            })
            .collect()
    }

    /// One `name: description` line per tool, for model instructions.
    pub fn render_descriptions(&self) -> String {
        if self.is_empty() {
            return "No tools available.".to_string();
        }
        self.describe_all()
            .iter()
            .map(|(name, description)| format!("{}: {}", name, description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Comma-separated tool names, in registration order.
    pub fn names(&self) -> String {
        self.order.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the input back"
        }

        async fn run(&self, input: &str) -> String {
            format!("echo: {}", input)
        }
    }

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Uppercase the input"
        }

        async fn run(&self, input: &str) -> String {
            input.to_uppercase()
        }
    }

    #[tokio::test]
    async fn test_register_and_run() {
        let mut catalog = ToolCatalog::new();
        catalog.register(Arc::new(EchoTool));

        let tool = catalog.get("echo").unwrap();
        assert_eq!(tool.run("hi").await, "echo: hi");
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_descriptions_in_registration_order() {
        let mut catalog = ToolCatalog::new();
        catalog.register(Arc::new(UpperTool));
        catalog.register(Arc::new(EchoTool));

        let rendered = catalog.render_descriptions();
        assert_eq!(rendered, "upper: Uppercase the input\necho: Echo the input back");
        assert_eq!(catalog.names(), "upper, echo");
    }

    #[test]
    fn test_empty_catalog_description() {
        let catalog = ToolCatalog::new();
        assert_eq!(catalog.render_descriptions(), "No tools available.");
    }

    #[tokio::test]
    async fn test_duplicate_registration_last_wins() {
        struct EchoV2;

        #[async_trait]
        impl Tool for EchoV2 {
            fn name(&self) -> &str {
                "echo"
            }

            fn description(&self) -> &str {
                "Echo, second version"
            }

            async fn run(&self, _input: &str) -> String {
                "v2".to_string()
            }
        }

        let mut catalog = ToolCatalog::new();
        catalog.register(Arc::new(EchoTool));
        catalog.register(Arc::new(EchoV2));

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("echo").unwrap().run("x").await, "v2");
    }
}
