//! Data store connection settings.

use std::env;

/// Connection settings for the managed database's REST endpoint.
#[derive(Clone, Default)]
pub struct DataStoreConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub url: Option<String>,
    /// Privileged (service role) access key
    service_key: Option<String>,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for DataStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStoreConfig")
            .field("url", &self.url)
            .field(
                "service_key",
                &self.service_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl DataStoreConfig {
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            url: non_empty(Some(url.into())),
            service_key: non_empty(Some(service_key.into())),
            timeout_secs: None,
        }
    }

    /// Load settings from `SUPABASE_URL`, `SUPABASE_SERVICE_ROLE_KEY`
    /// (or `SUPABASE_KEY`) and `DATASTORE_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self {
            url: non_empty(env::var("SUPABASE_URL").ok()),
            service_key: first_non_empty([
                env::var("SUPABASE_SERVICE_ROLE_KEY").ok(),
                env::var("SUPABASE_KEY").ok(),
            ]),
            timeout_secs: env::var("DATASTORE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0),
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs).filter(|s| *s > 0);
        self
    }

    pub fn service_key(&self) -> Option<&str> {
        self.service_key.as_deref()
    }

    /// Names of required settings that are absent.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.url.is_none() {
            missing.push("SUPABASE_URL");
        }
        if self.service_key.is_none() {
            missing.push("SUPABASE_SERVICE_ROLE_KEY");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The first candidate that is set and not blank.
fn first_non_empty<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates.into_iter().find_map(non_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_settings() {
        let config = DataStoreConfig::default();
        assert_eq!(
            config.missing(),
            vec!["SUPABASE_URL", "SUPABASE_SERVICE_ROLE_KEY"]
        );

        let config = DataStoreConfig::new("https://example.supabase.co", "  ");
        assert_eq!(config.missing(), vec!["SUPABASE_SERVICE_ROLE_KEY"]);
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = DataStoreConfig::new("https://example.supabase.co", "super-secret");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("example.supabase.co"));
    }

    #[test]
    fn test_blank_service_role_key_falls_back() {
        let key = first_non_empty([Some("  ".to_string()), Some("anon-key".to_string())]);
        assert_eq!(key.as_deref(), Some("anon-key"));

        let key = first_non_empty([Some("service".to_string()), Some("anon-key".to_string())]);
        assert_eq!(key.as_deref(), Some("service"));

        assert_eq!(first_non_empty([None, Some(String::new())]), None);
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let config = DataStoreConfig::new("u", "k").with_timeout_secs(0);
        assert_eq!(config.timeout_secs, None);
    }
}
