//! The data-access capability surface.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::{DataError, DataResult};
use crate::filter::Filter;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A single row: column name to JSON value.
pub type Record = Map<String, Value>;

/// Minimal insert/select surface over a remote table store.
///
/// Table and column names are plain identifiers. Each call is independent:
/// no retries, no batching.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Insert one row and return it as stored.
    async fn insert(&self, table: &str, record: Record) -> DataResult<Record>;

    /// Read rows matching `filter`, at most `limit` if given.
    async fn select(
        &self,
        table: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> DataResult<Vec<Record>>;

    /// Trivial one-row read to exercise the connection.
    async fn ping(&self, table: &str) -> DataResult<()>;
}

/// Serialize a value into a row. Fails unless it serializes to an object.
pub fn to_record<T: Serialize>(value: &T) -> DataResult<Record> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(DataError::decode(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Deserialize a row into a typed value.
pub fn from_record<T: DeserializeOwned>(record: Record) -> DataResult<T> {
    Ok(serde_json::from_value(Value::Object(record))?)
}
