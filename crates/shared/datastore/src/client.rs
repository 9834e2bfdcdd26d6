//! Supabase (PostgREST) HTTP client.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::DataStoreConfig;
use crate::error::{classify, DataError, DataResult};
use crate::filter::Filter;
use crate::store::{DataStore, Record};

/// REST path prefix under the project URL.
const REST_PATH: &str = "/rest/v1";

/// Client for a Supabase project's REST interface.
///
/// Authenticates every request with the privileged key, so row-level
/// policies may still reject writes the key is not granted.
#[derive(Clone)]
pub struct SupabaseClient {
    /// HTTP client.
    client: Client,
    /// REST base, e.g. `https://xyz.supabase.co/rest/v1`.
    rest_url: String,
    /// Service role key.
    service_key: String,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("rest_url", &self.rest_url)
            .field("service_key", &"[REDACTED]")
            .finish()
    }
}

impl SupabaseClient {
    /// Create a client from explicit settings.
    ///
    /// # Errors
    /// Returns [`DataError::Configuration`] if the URL or key is missing.
    pub fn new(config: &DataStoreConfig) -> DataResult<Self> {
        let (url, key) = match (config.url.as_deref(), config.service_key()) {
            (Some(url), Some(key)) => (url, key),
            _ => {
                let missing = config.missing().join(", ");
                tracing::error!(missing = %missing, "Data store configuration incomplete");
                return Err(DataError::Configuration(missing));
            }
        };

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            rest_url: format!("{}{}", url.trim_end_matches('/'), REST_PATH),
            service_key: key.to_string(),
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> DataResult<Self> {
        Self::new(&DataStoreConfig::from_env())
    }

    /// URL of a table's REST resource.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Accept", "application/json")
    }

    /// Classify failures; decode successful bodies as an array of rows.
    async fn rows(&self, table: &str, response: Response) -> DataResult<Vec<Record>> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify(table, status, &body));
        }

        match serde_json::from_str::<Value>(&body)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(row) => Ok(row),
                    other => Err(DataError::decode(format!(
                        "expected a row object, got {}",
                        other
                    ))),
                })
                .collect(),
            Value::Object(row) => Ok(vec![row]),
            other => Err(DataError::decode(format!(
                "expected an array of rows, got {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl DataStore for SupabaseClient {
    async fn insert(&self, table: &str, record: Record) -> DataResult<Record> {
        let url = self.table_url(table);
        debug!(table, "Inserting row");

        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;

        self.rows(table, response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DataError::decode(format!("insert into {} returned no rows", table)))
    }

    async fn select(
        &self,
        table: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> DataResult<Vec<Record>> {
        let url = self.table_url(table);
        let mut query = vec![("select".to_string(), "*".to_string())];
        query.extend(filter.to_query());
        if let Some(limit) = limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        debug!(table, ?query, "Selecting rows");

        let response = self
            .authorized(self.client.get(&url))
            .query(&query)
            .send()
            .await?;

        self.rows(table, response).await
    }

    async fn ping(&self, table: &str) -> DataResult<()> {
        self.select(table, &Filter::new(), Some(1)).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configuration_rejected() {
        let err = SupabaseClient::new(&DataStoreConfig::default()).unwrap_err();

        match err {
            DataError::Configuration(missing) => {
                assert!(missing.contains("SUPABASE_URL"));
                assert!(missing.contains("SUPABASE_SERVICE_ROLE_KEY"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_table_url_trims_trailing_slash() {
        let client =
            SupabaseClient::new(&DataStoreConfig::new("https://xyz.supabase.co/", "key")).unwrap();

        assert_eq!(
            client.table_url("registrations"),
            "https://xyz.supabase.co/rest/v1/registrations"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let client =
            SupabaseClient::new(&DataStoreConfig::new("https://xyz.supabase.co", "secret-key"))
                .unwrap();

        assert!(!format!("{:?}", client).contains("secret-key"));
    }
}
