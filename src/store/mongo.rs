use std::time::Duration;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, FindOptions};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use super::{ContactStore, StoreError, StoreResult};
use crate::contact::{Contact, ContactId, ContactPatch, NewContact};

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::unavailable(err)
    }
}

/// Persisted shape: `{_id: ObjectId, name, phone}`.
#[derive(Debug, Serialize, Deserialize)]
struct ContactDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    phone: String,
}

impl From<&NewContact> for ContactDocument {
    fn from(contact: &NewContact) -> Self {
        Self {
            id: None,
            name: contact.name().to_string(),
            phone: contact.phone().to_string(),
        }
    }
}

impl TryFrom<ContactDocument> for Contact {
    type Error = StoreError;

    fn try_from(doc: ContactDocument) -> Result<Self, Self::Error> {
        let id = doc
            .id
            .ok_or_else(|| StoreError::unavailable("document without _id"))?;
        Ok(Contact {
            id: id.into(),
            name: doc.name,
            phone: doc.phone,
        })
    }
}

fn by_id(id: &ContactId) -> Document {
    doc! { "_id": id.object_id() }
}

fn set_fields(patch: ContactPatch) -> Document {
    let mut fields = Document::new();
    if let Some(name) = patch.name {
        fields.insert("name", name);
    }
    if let Some(phone) = patch.phone {
        fields.insert("phone", phone);
    }
    doc! { "$set": fields }
}

/// Contacts in a single MongoDB collection.
///
/// The driver's client owns a connection pool and is safe to share across
/// tasks, so no extra locking happens here.
#[derive(Clone)]
pub struct MongoContactStore {
    client: Client,
    collection: Collection<ContactDocument>,
}

impl MongoContactStore {
    /// Connect and ping. Failure here means the process must not serve.
    pub async fn connect(
        uri: &str,
        database: &str,
        collection: &str,
        connect_timeout: Duration,
    ) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.connect_timeout = Some(connect_timeout);
        options.server_selection_timeout = Some(connect_timeout);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options)?;
        let store = Self {
            collection: client.database(database).collection(collection),
            client,
        };
        store.ping().await?;

        tracing::info!(database, collection, "connected to MongoDB");
        Ok(store)
    }
}

#[async_trait]
impl ContactStore for MongoContactStore {
    async fn insert(&self, contact: NewContact) -> StoreResult<Contact> {
        let result = self
            .collection
            .insert_one(ContactDocument::from(&contact), None)
            .await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::unavailable("inserted id is not an ObjectId"))?;
        Ok(contact.with_id(id.into()))
    }

    async fn find_all(&self) -> StoreResult<Vec<Contact>> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let documents: Vec<ContactDocument> = self
            .collection
            .find(None, options)
            .await?
            .try_collect()
            .await?;
        documents.into_iter().map(Contact::try_from).collect()
    }

    async fn find_by_id(&self, id: &ContactId) -> StoreResult<Contact> {
        match self.collection.find_one(by_id(id), None).await? {
            Some(doc) => Contact::try_from(doc),
            None => Err(StoreError::NotFound),
        }
    }

    async fn update(&self, id: &ContactId, patch: ContactPatch) -> StoreResult<()> {
        // `$set: {}` is rejected by older servers; an empty patch only has to
        // prove the id exists.
        if patch.is_empty() {
            return self.find_by_id(id).await.map(|_| ());
        }

        let result = self
            .collection
            .update_one(by_id(id), set_fields(patch), None)
            .await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: &ContactId) -> StoreResult<()> {
        let result = self.collection.delete_one(by_id(id), None).await?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_fields_only_contains_supplied_values() {
        let update = set_fields(ContactPatch {
            name: Some("X".into()),
            phone: None,
        });
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_str("name").unwrap(), "X");
        assert!(!set.contains_key("phone"));
    }

    #[test]
    fn new_contact_document_leaves_id_to_the_server() {
        let doc = bson::to_document(&ContactDocument::from(&NewContact::new("a", "b").unwrap()))
            .unwrap();
        assert!(!doc.contains_key("_id"));
        assert_eq!(doc.get_str("name").unwrap(), "a");
    }

    #[test]
    fn document_without_id_is_rejected() {
        let doc = ContactDocument {
            id: None,
            name: "a".into(),
            phone: "b".into(),
        };
        assert!(Contact::try_from(doc).unwrap_err().is_unavailable());
    }
}
