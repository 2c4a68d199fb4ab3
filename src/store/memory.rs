use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{ContactStore, StoreError, StoreResult};
use crate::contact::{Contact, ContactId, ContactPatch, NewContact};

/// Process-local contact store.
///
/// Keyed by id; ids sort by creation so iteration order is insertion order.
pub struct InMemoryContactStore {
    records: RwLock<BTreeMap<ContactId, Contact>>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored contacts. A poisoned lock is reported like any
    /// other store call.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.records.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        self.len().map(|n| n == 0)
    }
}

impl Default for InMemoryContactStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::unavailable("poisoned lock")
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn insert(&self, contact: NewContact) -> StoreResult<Contact> {
        let contact = contact.with_id(ContactId::generate());
        self.records
            .write()
            .map_err(poisoned)?
            .insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn find_all(&self) -> StoreResult<Vec<Contact>> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &ContactId) -> StoreResult<Contact> {
        let guard = self.records.read().map_err(poisoned)?;
        guard.get(id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update(&self, id: &ContactId, patch: ContactPatch) -> StoreResult<()> {
        let mut guard = self.records.write().map_err(poisoned)?;
        let contact = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        contact.apply(&patch);
        Ok(())
    }

    async fn delete(&self, id: &ContactId) -> StoreResult<()> {
        self.records
            .write()
            .map_err(poisoned)?
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_contact(name: &str, phone: &str) -> NewContact {
        NewContact::new(name, phone).unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = InMemoryContactStore::new();
        let a = store.insert(new_contact("a", "1")).await.unwrap();
        let b = store.insert(new_contact("b", "2")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[tokio::test]
    async fn find_all_keeps_creation_order() {
        let store = InMemoryContactStore::new();
        for name in ["first", "second", "third"] {
            store.insert(new_contact(name, "0")).await.unwrap();
        }
        let names: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn empty_patch_on_unknown_id_is_not_found() {
        let store = InMemoryContactStore::new();
        let err = store
            .update(&ContactId::generate(), ContactPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let store = InMemoryContactStore::new();
        let contact = store.insert(new_contact("x", "y")).await.unwrap();
        store.delete(&contact.id).await.unwrap();
        assert!(matches!(
            store.delete(&contact.id).await,
            Err(StoreError::NotFound)
        ));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn poisoned_lock_is_unavailable_not_empty() {
        let store = InMemoryContactStore::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.records.write().unwrap();
            panic!("writer died holding the lock");
        }));

        assert!(store.len().unwrap_err().is_unavailable());
        assert!(store.is_empty().unwrap_err().is_unavailable());
    }
}
