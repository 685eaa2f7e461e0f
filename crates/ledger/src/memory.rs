//! In-process implementations of [`AuthService`] and [`DocumentStore`].
//!
//! They behave like the hosted services closely enough to drive the session
//! and expense logic in tests: the same rejection messages, a change stream,
//! generated ids and delete-is-idempotent.

use std::{
    collections::HashMap,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::{
    AuthService, AuthState, DocumentStore, ExpenseRecord, NewExpense, Principal, ServiceError,
};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug)]
struct Account {
    uid: String,
    password: String,
}

#[derive(Debug)]
pub struct MemoryAuth {
    accounts: Mutex<HashMap<String, Account>>,
    state: watch::Sender<AuthState>,
    next_uid: AtomicU64,
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAuth {
    /// A service still restoring its persisted session.
    pub fn new() -> Self {
        let (state, _) = watch::channel(AuthState::Restoring);
        Self {
            accounts: Mutex::new(HashMap::new()),
            state,
            next_uid: AtomicU64::new(1),
        }
    }

    /// A service that already resolved to signed out.
    pub fn signed_out() -> Self {
        let auth = Self::new();
        auth.publish(AuthState::SignedOut);
        auth
    }

    /// Register an account without signing it in.
    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.create_account(email, password);
        self
    }

    /// Push a value on the change stream, as a restored or expired session
    /// would.
    pub fn publish(&self, state: AuthState) {
        self.state.send_replace(state);
    }

    /// Uid registered for `email`.
    pub fn uid_of(&self, email: &str) -> Option<String> {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(email)
            .map(|account| account.uid.clone())
    }

    fn create_account(&self, email: &str, password: &str) -> String {
        let uid = format!("uid-{}", self.next_uid.fetch_add(1, Ordering::Relaxed));
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                email.to_string(),
                Account {
                    uid: uid.clone(),
                    password: password.to_string(),
                },
            );
        uid
    }

    fn sign_in_as(&self, email: &str, uid: String) -> Principal {
        let principal = Principal {
            uid,
            email: Some(email.to_string()),
        };
        self.publish(AuthState::SignedIn(principal.clone()));
        principal
    }
}

#[async_trait]
impl AuthService for MemoryAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, ServiceError> {
        let uid = {
            let accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
            match accounts.get(email) {
                Some(account) if account.password == password => account.uid.clone(),
                _ => return Err(ServiceError::rejected("INVALID_LOGIN_CREDENTIALS")),
            }
        };
        Ok(self.sign_in_as(email, uid))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Principal, ServiceError> {
        if email.trim().is_empty() {
            return Err(ServiceError::rejected("MISSING_EMAIL"));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ServiceError::rejected(
                "WEAK_PASSWORD : Password should be at least 6 characters",
            ));
        }
        if self.uid_of(email).is_some() {
            return Err(ServiceError::rejected("EMAIL_EXISTS"));
        }
        let uid = self.create_account(email, password);
        Ok(self.sign_in_as(email, uid))
    }

    async fn sign_out(&self) -> Result<(), ServiceError> {
        self.publish(AuthState::SignedOut);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<Vec<(String, ExpenseRecord)>>,
    failure: Mutex<Option<ServiceError>>,
    next_id: AtomicU64,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record directly, bypassing the call counter.
    pub fn seed(&self, collection: &str, expense: NewExpense) -> String {
        let id = self.generate_id();
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((collection.to_string(), expense.into_record(id.clone())));
        id
    }

    /// Make every following call fail with `err` (or succeed again on `None`).
    pub fn fail_with(&self, err: Option<ServiceError>) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = err;
    }

    /// Number of calls made through the [`DocumentStore`] trait.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Number of records stored in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(c, _)| c == collection)
            .count()
    }

    fn generate_id(&self) -> String {
        format!("doc-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn begin_call(&self) -> Result<(), ServiceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query_by_owner(
        &self,
        collection: &str,
        owner: &str,
    ) -> Result<Vec<ExpenseRecord>, ServiceError> {
        self.begin_call()?;
        Ok(self
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(c, record)| c == collection && record.owner == owner)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn insert(&self, collection: &str, expense: &NewExpense) -> Result<String, ServiceError> {
        self.begin_call()?;
        let id = self.generate_id();
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((collection.to_string(), expense.clone().into_record(id.clone())));
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), ServiceError> {
        self.begin_call()?;
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(c, record)| !(c == collection && record.id == id));
        Ok(())
    }
}
