//! SQL tools exposed to the query-writing agent.
//!
//! Every tool reports expected failures (missing table, bad SQL, blocked
//! statement) as descriptive observation text, keeping the agent loop alive.

use std::sync::{Arc, LazyLock, Mutex};

use async_trait::async_trait;
use regex::Regex;
use rusqlite::types::ValueRef;
use rusqlite::Connection;

use crate::workflow_utils::catalog::{Tool, ToolCatalog};

type SharedConnection = Arc<Mutex<Connection>>;

static UNSAFE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(insert|update|delete|drop|alter|truncate|create)\b")
        .expect("unsafe statement pattern")
});

/// Build the catalog of SQL tools over a shared connection.
pub fn sql_catalog(conn: SharedConnection) -> ToolCatalog {
    let mut catalog = ToolCatalog::new();
    catalog.register(Arc::new(ListTablesTool { conn: conn.clone() }));
    catalog.register(Arc::new(TableSchemaTool { conn: conn.clone() }));
    catalog.register(Arc::new(RunQueryTool { conn }));
    catalog
}

/// Lists the user tables in the database.
pub struct ListTablesTool {
    conn: SharedConnection,
}

#[async_trait]
impl Tool for ListTablesTool {
    fn name(&self) -> &str {
        "list_tables"
    }

    fn description(&self) -> &str {
        "List all tables in the database"
    }

    async fn run(&self, _input: &str) -> String {
        let conn = match self.conn.lock() {
            Ok(conn) => conn,
            Err(_) => return "Error: database connection unavailable".to_string(),
        };
        match list_tables(&conn) {
            Ok(tables) => format!("{:?}", tables),
            Err(e) => format!("Error: {}", e),
        }
    }
}

/// Describes the columns of one table.
pub struct TableSchemaTool {
    conn: SharedConnection,
}

#[async_trait]
impl Tool for TableSchemaTool {
    fn name(&self) -> &str {
        "get_table_schema"
    }

    fn description(&self) -> &str {
        "Get the schema of a specific table. Usage: get_table_schema(table_name)"
    }

    async fn run(&self, input: &str) -> String {
        let table = input.trim();
        if table.is_empty() {
            return "Error: get_table_schema requires a table name".to_string();
        }
        if !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return format!("Error: invalid table name '{}'", table);
        }

        let conn = match self.conn.lock() {
            Ok(conn) => conn,
            Err(_) => return "Error: database connection unavailable".to_string(),
        };
        match table_schema(&conn, table) {
            Ok(columns) if columns.is_empty() => format!("Error: table '{}' not found", table),
            Ok(columns) => columns.join("\n"),
            Err(e) => format!("Error: {}", e),
        }
    }
}

/// Runs a read-only query and returns the rows as text.
pub struct RunQueryTool {
    conn: SharedConnection,
}

#[async_trait]
impl Tool for RunQueryTool {
    fn name(&self) -> &str {
        "run_query"
    }

    fn description(&self) -> &str {
        "Run a SQL query. Usage: run_query(query)"
    }

    async fn run(&self, input: &str) -> String {
        let lowered = input.to_lowercase();
        if let Some(found) = UNSAFE_RE.find(&lowered) {
            return format!(
                "Error: Unsafe operation detected: {}. Please use only SELECT statements.",
                found.as_str()
            );
        }

        let conn = match self.conn.lock() {
            Ok(conn) => conn,
            Err(_) => return "Error: database connection unavailable".to_string(),
        };
        match run_select(&conn, input) {
            Ok(rows) => rows,
            Err(e) => format!("Error: {}", e),
        }
    }
}

fn list_tables(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

fn table_schema(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    // Identifier is validated by the caller; PRAGMA does not take bound parameters.
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let columns = stmt
        .query_map([], |row| {
            let name: String = row.get(1)?;
            let column_type: String = row.get(2)?;
            Ok(format!("{} {}", name, column_type))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

/// Execute a query and format each row as a parenthesized value tuple.
pub fn run_select(conn: &Connection, query: &str) -> rusqlite::Result<String> {
    let mut stmt = conn.prepare(query)?;
    let column_count = stmt.column_count();
    let mut rows = stmt.query([])?;

    let mut lines = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            values.push(format_value(row.get_ref(i)?));
        }
        lines.push(format!("({})", values.join(", ")));
    }
    Ok(lines.join("\n"))
}

fn format_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => format!("'{}'", String::from_utf8_lossy(t)),
        ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
    }
}
