use async_trait::async_trait;
use edgepanel_core::err::{bail, Result};
use serde_json::Value;

/// A single result row, keyed by the shape's field names
pub type Row = serde_json::Map<String, Value>;

/// Executes EdgeQL against a database
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Runs the query, returning the raw values of the result set
    async fn query_values(&self, query: &str) -> Result<Vec<Value>>;

    /// Runs the query, returning every row of the result set
    async fn query(&self, query: &str) -> Result<Vec<Row>> {
        rows_from_data(self.query_values(query).await?)
    }

    /// Runs a query which is expected to return exactly one scalar value
    async fn query_single(&self, query: &str) -> Result<Value> {
        let rows = self.query_values(query).await?;

        match <[Value; 1]>::try_from(rows) {
            Ok([value]) => Ok(value),
            Err(rows) => bail!(
                "Expected query to return a single value, got {} values",
                rows.len()
            ),
        }
    }

    /// Releases any resources held by the executor
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Converts a result set into rows, every element must be an object
pub fn rows_from_data(data: Vec<Value>) -> Result<Vec<Row>> {
    data.into_iter()
        .enumerate()
        .map(|(idx, val)| match val {
            Value::Object(row) => Ok(row),
            other => bail!(
                "Expected result row {} to be an object, found: {}",
                idx,
                other
            ),
        })
        .collect()
}
