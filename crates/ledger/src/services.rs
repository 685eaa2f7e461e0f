//! Boundaries to the hosted backend.
//!
//! The ledger never talks to the network directly: authentication goes
//! through an [`AuthService`] and persistence through a [`DocumentStore`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::{ExpenseRecord, NewExpense, ServiceError};

/// The authenticated identity of the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub uid: String,
    pub email: Option<String>,
}

/// Value carried by the auth change stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// Nothing delivered yet: the service is still restoring a persisted
    /// session.
    #[default]
    Restoring,
    SignedOut,
    SignedIn(Principal),
}

impl AuthState {
    /// `None` while restoring, otherwise the current principal (or none).
    pub fn resolved(&self) -> Option<Option<&Principal>> {
        match self {
            Self::Restoring => None,
            Self::SignedOut => Some(None),
            Self::SignedIn(principal) => Some(Some(principal)),
        }
    }
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Sign in an existing account.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, ServiceError>;

    /// Create an account and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Principal, ServiceError>;

    async fn sign_out(&self) -> Result<(), ServiceError>;

    /// Change stream. A new value is published on every session transition,
    /// including the first resolution at process start.
    fn subscribe(&self) -> watch::Receiver<AuthState>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All records of `collection` whose owner is `owner`.
    async fn query_by_owner(
        &self,
        collection: &str,
        owner: &str,
    ) -> Result<Vec<ExpenseRecord>, ServiceError>;

    /// Persist a new record and return its generated id.
    async fn insert(&self, collection: &str, expense: &NewExpense) -> Result<String, ServiceError>;

    /// Delete a record by id. Deleting a missing id is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), ServiceError>;
}
