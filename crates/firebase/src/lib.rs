//! Firebase backend for the ledger.
//!
//! [`FirebaseClient`] implements [`ledger::AuthService`] over the Identity
//! Toolkit REST API and [`ledger::DocumentStore`] over the Firestore REST API.
//! Base URLs are configurable so the client can point at the local emulators.

pub use client::{
    DEFAULT_FIRESTORE_URL, DEFAULT_IDENTITY_URL, DEFAULT_SECURETOKEN_URL, FirebaseClient,
    FirebaseSettings,
};
pub use error::ClientError;
pub use session_file::PersistedSession;

mod client;
mod documents;
mod error;
mod session_file;
