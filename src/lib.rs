//! Contact entity, JSON codec and persistence adapter.
//!
//! The HTTP surface lives in the `contacts-server` crate under `crates/server`;
//! this crate holds everything below it:
//!
//! - [`contact`]: `Contact`, `ContactId`, the create/update payloads and their
//!   JSON decoding rules.
//! - [`store`]: the [`ContactStore`] trait, the MongoDB and in-memory
//!   backends, and the per-call timeout wrapper.
//!
//! ```rust
//! use contacts::{ContactPatch, NewContact};
//!
//! let new = NewContact::from_json(br#"{"name":"John Doe","phone":"+1-234-567-8900"}"#)?;
//! assert_eq!(new.name(), "John Doe");
//!
//! let patch = ContactPatch::from_json(br#"{"phone":"555"}"#)?;
//! assert!(patch.name.is_none());
//! # Ok::<(), contacts::ContactError>(())
//! ```

pub mod contact;
pub mod store;

pub use contact::{Contact, ContactError, ContactId, ContactPatch, NewContact};
#[cfg(feature = "mongo")]
pub use store::MongoContactStore;
pub use store::{
    ContactStore, InMemoryContactStore, StoreConfig, StoreError, StoreResult, TimeoutStore,
};
