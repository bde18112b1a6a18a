//! The query-writing agent.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use rusqlite::Connection;

use llm_client::LlmClient;

use crate::query_writer::tools::{run_select, sql_catalog};
use crate::workflow_utils::catalog::ToolCatalog;
use crate::workflow_utils::react::{ReactAgent, ReactConfig, ReactOutcome};

/// Default turn ceiling for the agent loop.
pub const MAX_ITERATIONS: usize = 30;

const INSTRUCTIONS: &str = "\
You are an agent designed to interact with a SQL database.
Given an input question, create a syntactically correct sql query to answer the question.
Unless the user specifies a specific number of examples they wish to obtain, always limit your query to at most 5 results.
You can order the results by a relevant column to return the most interesting examples in the database.
Never query for all the columns from a specific table, only ask for the relevant columns given the question.
You have access to tools for interacting with the database.
Only use the below tools. Only use the information returned by the below tools to construct your final answer.
You MUST double check your query before executing it. If you get an error while executing a query, rewrite the query and try again.

DO NOT make any DML statements (INSERT, UPDATE, DELETE, DROP etc.) to the database.

To start you should ALWAYS look at the tables in the database to see what you can query.
Do NOT skip this step.
Then you should query the schema of the most relevant tables.

You do not need to run the query, just provide the SQL query that would answer the question.
Your job is done once you provide the SQL query.";

const EXHAUSTED_MESSAGE: &str = "Failed to generate a SQL query within the maximum number of \
iterations. Please try rephrasing your question.";

/// Turns natural-language questions into SQL queries against one database.
pub struct QueryWriter {
    conn: Arc<Mutex<Connection>>,
    catalog: ToolCatalog,
    model: String,
    max_turns: usize,
}

impl QueryWriter {
    pub fn new(conn: Connection) -> Self {
        let conn = Arc::new(Mutex::new(conn));
        Self {
            catalog: sql_catalog(conn.clone()),
            conn,
            model: crate::DEFAULT_MODEL.to_string(),
            max_turns: MAX_ITERATIONS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Generate the SQL query answering `question`.
    ///
    /// A successful answer comes back wrapped in a code fence (use
    /// [`QueryWriter::response_parser`] to strip it); hitting the turn
    /// ceiling yields a plain failure message instead. Neither case is an
    /// error: only infrastructure failures raise.
    pub async fn generate_query<C>(&self, client: &C, question: &str) -> Result<String>
    where
        C: LlmClient + ?Sized,
    {
        let config = ReactConfig {
            task_id: "query_writer".to_string(),
            model: self.model.clone(),
            max_turns: self.max_turns,
            instructions: INSTRUCTIONS.to_string(),
        };
        let agent = ReactAgent::new(client, &self.catalog, config);

        match agent.run(question).await? {
            ReactOutcome::Answer(query) => Ok(format!("```\n{}\n```", query)),
            ReactOutcome::Exhausted => Ok(EXHAUSTED_MESSAGE.to_string()),
        }
    }

    /// Strip the code fence from a [`QueryWriter::generate_query`] response.
    pub fn response_parser(response: &str) -> String {
        response.replace("```", "").trim().to_string()
    }

    /// Execute a query against the underlying database and return the rows.
    pub fn run_query(&self, query: &str) -> Result<String> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow!("database connection unavailable"))?;
        run_select(&conn, query).map_err(Into::into)
    }
}
