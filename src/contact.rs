//! The Contact entity and its JSON codec.
//!
//! Wire shape: `{"id": "<24 hex chars>", "name": "...", "phone": "..."}`.
//! Request bodies are decoded from raw bytes so that a missing or wrong
//! `Content-Type` never changes how a payload is judged.

use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Errors produced while decoding or validating a contact payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    /// The body is not JSON, not an object, or a field is not a string.
    #[error("malformed contact payload: {0}")]
    Malformed(String),

    /// `name` or `phone` is absent or empty on create.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A field supplied on update is the empty string.
    #[error("field `{0}` cannot be empty")]
    EmptyField(&'static str),

    /// The identifier is not a 24-character hex object id.
    #[error("invalid contact id `{0}`")]
    InvalidId(String),
}

/// Store-assigned primary key of a contact.
///
/// Backed by the document store's 12-byte object id; rendered as 24
/// lowercase hex characters everywhere outside the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContactId(ObjectId);

impl ContactId {
    /// Generate a fresh id. Ids sort in generation order.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Parse a 24-character hex string.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::InvalidId`] for any other input, including the
    /// empty string and strings containing path separators.
    pub fn parse(raw: &str) -> Result<Self, ContactError> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| ContactError::InvalidId(raw.to_string()))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for ContactId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for ContactId {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

// ObjectId's own serde impl emits extended JSON (`{"$oid": ..}`); the wire
// format wants a bare hex string.
impl Serialize for ContactId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContactId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        ContactId::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A persisted contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
}

impl Contact {
    /// Apply the supplied fields of `patch`; absent fields are left alone.
    pub fn apply(&mut self, patch: &ContactPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(phone) = &patch.phone {
            self.phone.clone_from(phone);
        }
    }
}

/// A validated create payload: both fields present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    name: String,
    phone: String,
}

impl NewContact {
    /// # Errors
    ///
    /// [`ContactError::MissingField`] if either value is empty.
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Result<Self, ContactError> {
        let name = name.into();
        let phone = phone.into();
        if name.is_empty() {
            return Err(ContactError::MissingField("name"));
        }
        if phone.is_empty() {
            return Err(ContactError::MissingField("phone"));
        }
        Ok(Self { name, phone })
    }

    /// Decode and validate a create request body.
    pub fn from_json(body: &[u8]) -> Result<Self, ContactError> {
        let payload = ContactPayload::decode(body)?;
        Self::new(
            payload.name.unwrap_or_default(),
            payload.phone.unwrap_or_default(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn with_id(self, id: ContactId) -> Contact {
        Contact {
            id,
            name: self.name,
            phone: self.phone,
        }
    }
}

/// Partial update: each field is independently supplied or not.
///
/// `None` means "leave unchanged". A supplied value is never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl ContactPatch {
    /// Decode an update request body. `null` counts as not supplied.
    pub fn from_json(body: &[u8]) -> Result<Self, ContactError> {
        let payload = ContactPayload::decode(body)?;
        if payload.name.as_deref() == Some("") {
            return Err(ContactError::EmptyField("name"));
        }
        if payload.phone.as_deref() == Some("") {
            return Err(ContactError::EmptyField("phone"));
        }
        Ok(Self {
            name: payload.name,
            phone: payload.phone,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ContactPayload {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

impl ContactPayload {
    fn decode(body: &[u8]) -> Result<Self, ContactError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| ContactError::Malformed(e.to_string()))?;
        // Derived struct impls also accept JSON arrays; only objects are valid here.
        if !value.is_object() {
            return Err(ContactError::Malformed("expected a JSON object".into()));
        }
        serde_json::from_value(value).map_err(|e| ContactError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_contact_from_valid_body() {
        let body = br#"{"name":"John Doe","phone":"+1-234-567-8900"}"#;
        let contact = NewContact::from_json(body).unwrap();
        assert_eq!(contact.name(), "John Doe");
        assert_eq!(contact.phone(), "+1-234-567-8900");
    }

    #[test]
    fn new_contact_ignores_unknown_keys() {
        let body = br#"{"name":"a","phone":"b","email":"x@y"}"#;
        assert!(NewContact::from_json(body).is_ok());
    }

    #[test]
    fn new_contact_requires_both_fields() {
        assert_eq!(
            NewContact::from_json(br#"{"phone":"1"}"#),
            Err(ContactError::MissingField("name"))
        );
        assert_eq!(
            NewContact::from_json(br#"{"name":"a","phone":""}"#),
            Err(ContactError::MissingField("phone"))
        );
        assert_eq!(
            NewContact::from_json(br#"{"name":null,"phone":"1"}"#),
            Err(ContactError::MissingField("name"))
        );
    }

    #[test]
    fn malformed_bodies_are_rejected() {
        for body in [
            &b""[..],
            b"not json",
            b"[\"a\",\"b\"]",
            b"\"string\"",
            br#"{"name":5,"phone":"1"}"#,
        ] {
            assert!(
                matches!(NewContact::from_json(body), Err(ContactError::Malformed(_))),
                "body {:?} should be malformed",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn patch_distinguishes_absent_from_empty() {
        let patch = ContactPatch::from_json(br#"{"name":"X"}"#).unwrap();
        assert_eq!(patch.name.as_deref(), Some("X"));
        assert!(patch.phone.is_none());

        assert_eq!(
            ContactPatch::from_json(br#"{"phone":""}"#),
            Err(ContactError::EmptyField("phone"))
        );
    }

    #[test]
    fn empty_patch_is_accepted() {
        let patch = ContactPatch::from_json(b"{}").unwrap();
        assert!(patch.is_empty());
        let patch = ContactPatch::from_json(br#"{"name":null}"#).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn apply_only_touches_supplied_fields() {
        let mut contact = NewContact::new("Ann", "111")
            .unwrap()
            .with_id(ContactId::generate());
        contact.apply(&ContactPatch {
            name: None,
            phone: Some("222".into()),
        });
        assert_eq!(contact.name, "Ann");
        assert_eq!(contact.phone, "222");
    }

    #[test]
    fn contact_id_parsing() {
        let id = ContactId::generate();
        let hex = id.to_hex();
        assert_eq!(hex.len(), 24);
        assert_eq!(ContactId::parse(&hex).unwrap(), id);

        for bad in ["", "not-a-valid-id", "abc", "zzzzzzzzzzzzzzzzzzzzzzzz", "0123456789abcdef01234567/x"] {
            assert!(matches!(ContactId::parse(bad), Err(ContactError::InvalidId(_))));
        }
    }

    #[test]
    fn contact_serializes_with_hex_id() {
        let id = ContactId::parse("65a1b2c3d4e5f60718293a4b").unwrap();
        let contact = NewContact::new("Jane", "555").unwrap().with_id(id);
        assert_eq!(
            serde_json::to_value(&contact).unwrap(),
            json!({"id": "65a1b2c3d4e5f60718293a4b", "name": "Jane", "phone": "555"})
        );
    }
}
