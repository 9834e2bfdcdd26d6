//! Shared plumbing for the manual data store checks.
//!
//! The binaries talk to the store through the same [`DataStore`] surface
//! the gateway uses and map the result onto a process exit status:
//! classified permission and uniqueness outcomes are expected findings
//! (status 0, logged with a hint), everything else is a failure (status 1).

use std::process::ExitCode;

use clap::Args;
use serde::Serialize;
use tracing::{error, warn};

use datastore::{DataError, DataErrorKind, DataStoreConfig, SupabaseClient};

/// Connection flags. Unset flags fall back to the environment.
#[derive(Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Project URL (default: SUPABASE_URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Service role key (default: SUPABASE_SERVICE_ROLE_KEY)
    #[arg(long)]
    pub key: Option<String>,

    /// Request timeout in seconds (default: DATASTORE_TIMEOUT_SECS, none)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl std::fmt::Debug for ConnectionArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionArgs")
            .field("url", &self.url)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl ConnectionArgs {
    /// Environment settings overridden by any flags given.
    pub fn config(&self) -> DataStoreConfig {
        let env = DataStoreConfig::from_env();
        let url = self.url.clone().or_else(|| env.url.clone());
        let key = self
            .key
            .clone()
            .or_else(|| env.service_key().map(str::to_string));

        let mut config = DataStoreConfig::new(url.unwrap_or_default(), key.unwrap_or_default());
        if let Some(secs) = self.timeout_secs.or(env.timeout_secs) {
            config = config.with_timeout_secs(secs);
        }
        config
    }

    pub fn connect(&self) -> Result<SupabaseClient, DataError> {
        SupabaseClient::new(&self.config())
    }
}

/// How a diagnostic run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The store answered with a classified rejection
    Classified(DataErrorKind),
    Failed,
}

impl Outcome {
    /// Classify and log a failure.
    pub fn from_error(err: &DataError) -> Self {
        let kind = err.kind();
        match kind {
            DataErrorKind::PermissionDenied | DataErrorKind::UniqueViolation => {
                warn!(kind = %kind, hint = hint(kind), "{}", err);
                Outcome::Classified(kind)
            }
            DataErrorKind::Generic => {
                error!(error = %err, "Diagnostic failed");
                Outcome::Failed
            }
        }
    }

    pub fn exit_status(&self) -> u8 {
        match self {
            Outcome::Completed | Outcome::Classified(_) => 0,
            Outcome::Failed => 1,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

/// What to check next for a classified rejection.
pub fn hint(kind: DataErrorKind) -> &'static str {
    match kind {
        DataErrorKind::PermissionDenied => {
            "the key was rejected; use the service role key or review the table's row-level policies"
        }
        DataErrorKind::UniqueViolation => {
            "a row with this key already exists; retry with a different value"
        }
        DataErrorKind::Generic => "check the URL, the table name and network access",
    }
}

/// Print rows as pretty JSON on stdout.
pub fn print_rows<T: Serialize>(rows: &[T]) -> Result<(), DataError> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}
