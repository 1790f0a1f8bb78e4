//! Database driver boundary.
//!
//! A driver owns the physical connection and runs statement text with
//! bound values. Statement construction never happens here; the facade
//! hands drivers fully rendered SQL.

use async_trait::async_trait;
use indexmap::IndexMap;
use omnisql_core::SqlValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DriverError;

/// How fetched rows are shaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOptions {
    /// Column whose value keys each row in the result set.
    pub index: Option<String>,
    /// Key fields by column name when true, by position otherwise.
    pub assoc: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            index: None,
            assoc: true,
        }
    }
}

impl FetchOptions {
    /// Keys the result set by the given column.
    #[must_use]
    pub fn indexed(column: impl Into<String>) -> Self {
        Self {
            index: Some(column.into()),
            ..Self::default()
        }
    }

    /// Keys row fields by position instead of column name.
    #[must_use]
    pub fn positional() -> Self {
        Self {
            index: None,
            assoc: false,
        }
    }
}

/// A fetched row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Field values in select-list order.
    pub fields: IndexMap<String, Value>,
}

impl Row {
    /// Returns a field by column name (or position, for positional rows).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Rows returned by a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Column the rows are keyed by, if any.
    pub index_column: Option<String>,
    /// Rows in fetch order.
    pub rows: Vec<Row>,
}

impl ResultSet {
    #[must_use]
    pub const fn new(rows: Vec<Row>, index_column: Option<String>) -> Self {
        Self { index_column, rows }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up a row by its index column value.
    ///
    /// Returns `None` when the set has no index column. When several rows
    /// share a key, the last one wins.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Row> {
        let column = self.index_column.as_deref()?;
        self.rows.iter().rev().find(|row| {
            row.get(column).is_some_and(|value| match value {
                Value::String(s) => s == key,
                other => other.to_string() == key,
            })
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }
}

/// Result of running a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The statement produced rows.
    Rows(ResultSet),
    /// The statement modified data.
    Done {
        /// Number of rows changed.
        rows_affected: u64,
    },
}

impl Outcome {
    /// Returns the fetched rows, if the statement produced any.
    #[must_use]
    pub const fn rows(&self) -> Option<&ResultSet> {
        match self {
            Self::Rows(rows) => Some(rows),
            Self::Done { .. } => None,
        }
    }

    #[must_use]
    pub fn into_rows(self) -> Option<ResultSet> {
        match self {
            Self::Rows(rows) => Some(rows),
            Self::Done { .. } => None,
        }
    }

    /// Number of rows returned or changed.
    #[must_use]
    pub fn count(&self) -> u64 {
        match self {
            Self::Rows(rows) => rows.len() as u64,
            Self::Done { rows_affected } => *rows_affected,
        }
    }
}

/// A database connection capable of running rendered statements.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Opens the connection. Connecting twice is a no-op.
    async fn connect(&self) -> Result<(), DriverError>;

    /// Closes the connection. Returns false if it was not open.
    async fn disconnect(&self) -> bool;

    /// Describes the client library.
    fn client_info(&self) -> String;

    /// Describes the connected server.
    async fn server_info(&self) -> Result<String, DriverError>;

    /// Quotes a string literal for inclusion in raw SQL.
    fn escape(&self, data: &str) -> String {
        format!("'{}'", data.replace('\'', "''"))
    }

    /// Runs SQL text without parameters.
    async fn raw(&self, sql: &str, options: &FetchOptions) -> Result<Outcome, DriverError>;

    /// Runs SQL text with positionally bound values.
    async fn prepared(
        &self,
        sql: &str,
        values: &[SqlValue],
        options: &FetchOptions,
    ) -> Result<Outcome, DriverError>;

    /// Runs one statement once per value list, atomically.
    ///
    /// Returns false when there was nothing to run.
    async fn multi(&self, sql: &str, rows: &[Vec<SqlValue>]) -> Result<bool, DriverError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: i64, name: &str) -> Row {
        let mut fields = IndexMap::new();
        fields.insert(String::from("id"), json!(id));
        fields.insert(String::from("name"), json!(name));
        Row { fields }
    }

    #[test]
    fn test_fetch_options_default_is_assoc() {
        let options = FetchOptions::default();
        assert!(options.assoc);
        assert!(options.index.is_none());
        assert!(!FetchOptions::positional().assoc);
    }

    #[test]
    fn test_result_set_lookup_by_index() {
        let set = ResultSet::new(vec![row(1, "a"), row(2, "b")], Some(String::from("id")));
        assert_eq!(set.get("2").and_then(|r| r.get("name")), Some(&json!("b")));
        assert!(set.get("3").is_none());

        let by_name = ResultSet::new(vec![row(1, "a")], Some(String::from("name")));
        assert!(by_name.get("a").is_some());
    }

    #[test]
    fn test_result_set_without_index() {
        let set = ResultSet::new(vec![row(1, "a")], None);
        assert!(set.get("1").is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_outcome_serde() {
        let outcome = Outcome::Rows(ResultSet::new(vec![row(7, "x")], None));
        let bytes = serde_json::to_vec(&outcome).unwrap();
        let back: Outcome = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, outcome);
        assert_eq!(back.count(), 1);

        let done = Outcome::Done { rows_affected: 3 };
        assert_eq!(done.count(), 3);
        assert!(done.rows().is_none());
    }
}
