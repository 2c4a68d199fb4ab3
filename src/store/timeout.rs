use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use super::{ContactStore, StoreError, StoreResult};
use crate::contact::{Contact, ContactId, ContactPatch, NewContact};

/// Bounds every call on the inner store by a fixed deadline.
///
/// The inner future is dropped on expiry, which abandons the driver call.
/// A write the backend already committed is not rolled back.
pub struct TimeoutStore<S> {
    inner: S,
    limit: Duration,
}

impl<S> TimeoutStore<S> {
    pub fn new(inner: S, limit: Duration) -> Self {
        Self { inner, limit }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    async fn bounded<T, F>(&self, call: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        match tokio::time::timeout(self.limit, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(limit_ms = %self.limit.as_millis(), "store call timed out");
                Err(StoreError::Timeout(self.limit))
            }
        }
    }
}

#[async_trait]
impl<S: ContactStore> ContactStore for TimeoutStore<S> {
    async fn insert(&self, contact: NewContact) -> StoreResult<Contact> {
        self.bounded(self.inner.insert(contact)).await
    }

    async fn find_all(&self) -> StoreResult<Vec<Contact>> {
        self.bounded(self.inner.find_all()).await
    }

    async fn find_by_id(&self, id: &ContactId) -> StoreResult<Contact> {
        self.bounded(self.inner.find_by_id(id)).await
    }

    async fn update(&self, id: &ContactId, patch: ContactPatch) -> StoreResult<()> {
        self.bounded(self.inner.update(id, patch)).await
    }

    async fn delete(&self, id: &ContactId) -> StoreResult<()> {
        self.bounded(self.inner.delete(id)).await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.bounded(self.inner.ping()).await
    }
}
