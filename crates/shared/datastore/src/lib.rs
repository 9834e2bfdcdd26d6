//! Data-access wrapper over a managed database's REST interface.
//!
//! Callers depend on the [`DataStore`] trait and receive a concrete
//! [`SupabaseClient`] (or a test double) by injection; there is no global
//! client handle.
//!
//! Failures are classified by [`DataError::kind`]:
//! - permission denied (credentials rejected by a row-level policy)
//! - uniqueness violation (duplicate key on insert)
//! - generic (everything else, including transport failures)

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod store;

pub use client::SupabaseClient;
pub use config::DataStoreConfig;
pub use error::{classify, DataError, DataErrorKind, DataResult};
pub use filter::{Condition, Direction, Filter, Operator};
pub use store::{from_record, to_record, DataStore, Record};

#[cfg(any(test, feature = "test-utils"))]
pub use store::MockDataStore;
