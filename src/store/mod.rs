//! Persistence adapter for contacts.
//!
//! [`ContactStore`] is the seam the HTTP layer talks to. Backends:
//!
//! - [`InMemoryContactStore`]: always compiled, used by tests and the
//!   `memory` backend setting.
//! - `MongoContactStore`: behind the `mongo` feature.
//!
//! Every backend built through [`StoreConfig::build`] is wrapped in a
//! [`TimeoutStore`] so no call can block a request indefinitely.

mod memory;
#[cfg(feature = "mongo")]
mod mongo;
mod timeout;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::contact::{Contact, ContactId, ContactPatch, NewContact};

pub use memory::InMemoryContactStore;
#[cfg(feature = "mongo")]
pub use mongo::MongoContactStore;
pub use timeout::TimeoutStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no contact matches the given id")]
    NotFound,

    /// Connectivity, query or decode failure. The message carries driver
    /// detail and must not be shown to clients.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store call exceeded {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    pub fn unavailable<E: std::fmt::Display>(err: E) -> Self {
        Self::Unavailable(err.to_string())
    }

    /// Timeouts and driver failures are both "the store cannot serve this".
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

/// Single-collection contact persistence.
///
/// Implementations handle their own synchronization; one instance is shared
/// by every request task.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Persist a new contact; the store assigns the id.
    async fn insert(&self, contact: NewContact) -> StoreResult<Contact>;

    /// Every contact, oldest first. Empty when there are none.
    async fn find_all(&self) -> StoreResult<Vec<Contact>>;

    async fn find_by_id(&self, id: &ContactId) -> StoreResult<Contact>;

    /// Set the supplied fields of `patch`. An empty patch writes nothing but
    /// still reports [`StoreError::NotFound`] for an unknown id.
    async fn update(&self, id: &ContactId, patch: ContactPatch) -> StoreResult<()>;

    /// Hard delete. [`StoreError::NotFound`] when nothing was removed.
    async fn delete(&self, id: &ContactId) -> StoreResult<()>;

    /// Round-trip to the backend; used once at startup.
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Which backend to build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreConfig {
    InMemory,
    Mongo {
        uri: String,
        database: String,
        collection: String,
    },
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        StoreConfig::InMemory
    }

    pub fn mongo<U, D, C>(uri: U, database: D, collection: C) -> Self
    where
        U: Into<String>,
        D: Into<String>,
        C: Into<String>,
    {
        StoreConfig::Mongo {
            uri: uri.into(),
            database: database.into(),
            collection: collection.into(),
        }
    }

    /// Connect the backend, verify it answers, and bound every later call by
    /// `call_timeout`. `connect_timeout` limits the initial connection.
    pub async fn build(
        &self,
        connect_timeout: Duration,
        call_timeout: Duration,
    ) -> StoreResult<Arc<dyn ContactStore>> {
        match self {
            StoreConfig::InMemory => Ok(Arc::new(TimeoutStore::new(
                InMemoryContactStore::new(),
                call_timeout,
            ))),
            StoreConfig::Mongo {
                uri,
                database,
                collection,
            } => {
                #[cfg(feature = "mongo")]
                {
                    let store =
                        MongoContactStore::connect(uri, database, collection, connect_timeout)
                            .await?;
                    Ok(Arc::new(TimeoutStore::new(store, call_timeout)))
                }
                #[cfg(not(feature = "mongo"))]
                {
                    let _ = (uri, database, collection, connect_timeout, call_timeout);
                    Err(StoreError::unavailable(
                        "mongo backend disabled at compile time",
                    ))
                }
            }
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::mongo("mongodb://user-db:27017", "contacts_db", "contacts")
    }
}
