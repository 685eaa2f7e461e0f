//! In-memory expense list of the signed-in user, kept in sync with the
//! document store.
//!
//! Writes go to the store first and are mirrored locally only once the store
//! accepted them, so a failed call never leaves a half-applied list.

use std::sync::Arc;

use crate::{
    DocumentStore, EXPENSES_COLLECTION, ExpenseRecord, LedgerError, MoneyCents, NewExpense,
    SessionHandle, validation::validate_expense,
};

pub struct ExpenseStore {
    store: Arc<dyn DocumentStore>,
    session: SessionHandle,
    /// Owner the current list was loaded for.
    owner: Option<String>,
    records: Vec<ExpenseRecord>,
}

impl std::fmt::Debug for ExpenseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseStore")
            .field("owner", &self.owner)
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl ExpenseStore {
    pub fn new(store: Arc<dyn DocumentStore>, session: SessionHandle) -> Self {
        Self {
            store,
            session,
            owner: None,
            records: Vec::new(),
        }
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&ExpenseRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Owner the list currently belongs to.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Sum of all amounts, zero for an empty list.
    pub fn total(&self) -> MoneyCents {
        self.records.iter().map(|record| record.amount).sum()
    }

    /// Drop every record, as on sign-out.
    pub fn clear(&mut self) {
        self.records.clear();
        self.owner = None;
    }

    /// Replace the list with the signed-in owner's records.
    ///
    /// Without a session the list is cleared. When the store fails the error
    /// is logged and returned, and the list is left as it was, except that
    /// records of a previous owner are never kept.
    pub async fn reload(&mut self) -> Result<usize, LedgerError> {
        let Some(owner) = self.session.owner() else {
            self.clear();
            return Ok(0);
        };

        if self.owner.as_deref() != Some(owner.as_str()) {
            self.records.clear();
            self.owner = Some(owner.clone());
        }

        let loaded = self
            .store
            .query_by_owner(EXPENSES_COLLECTION, &owner)
            .await
            .map_err(|err| {
                tracing::warn!(%owner, "failed to load expenses: {err}");
                LedgerError::Store(err)
            })?;

        if self.session.owner().as_deref() != Some(owner.as_str()) {
            tracing::debug!(%owner, "session changed while loading, discarding result");
            return Ok(self.records.len());
        }

        self.records = loaded
            .into_iter()
            .filter(|record| record.owner == owner)
            .collect();
        tracing::debug!(%owner, count = self.records.len(), "expenses loaded");
        Ok(self.records.len())
    }

    /// Validate, persist and append a new expense.
    pub async fn add(&mut self, title: &str, amount: &str) -> Result<ExpenseRecord, LedgerError> {
        let input = validate_expense(title, amount)?;
        let owner = self.session.owner().ok_or(LedgerError::SignedOut)?;

        let expense = NewExpense {
            title: input.title,
            amount: input.amount,
            owner: owner.clone(),
        };
        let id = self
            .store
            .insert(EXPENSES_COLLECTION, &expense)
            .await
            .map_err(|err| {
                tracing::warn!("failed to add expense: {err}");
                LedgerError::Store(err)
            })?;
        let record = expense.into_record(id);

        match self.owner.as_deref() {
            Some(current) if current != owner => {
                tracing::debug!(id = %record.id, "list owner changed while adding");
            }
            _ => {
                self.owner = Some(owner);
                self.records.push(record.clone());
            }
        }

        tracing::info!(id = %record.id, amount = %record.amount, "expense added");
        Ok(record)
    }

    /// Delete an expense by id. Returns whether a local entry was removed;
    /// an unknown id leaves the list untouched.
    pub async fn remove(&mut self, id: &str) -> Result<bool, LedgerError> {
        if self.session.owner().is_none() {
            return Err(LedgerError::SignedOut);
        }

        self.store
            .delete(EXPENSES_COLLECTION, id)
            .await
            .map_err(|err| {
                tracing::warn!(%id, "failed to delete expense: {err}");
                LedgerError::Store(err)
            })?;

        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        let removed = self.records.len() != before;
        tracing::info!(%id, removed, "expense deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        AuthState, Principal, ServiceError, SessionManager, ValidationError,
        memory::{MemoryAuth, MemoryStore},
    };

    struct Fixture {
        auth: Arc<MemoryAuth>,
        store: Arc<MemoryStore>,
        manager: SessionManager,
        expenses: ExpenseStore,
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    async fn signed_in(uid: &str) -> Fixture {
        let auth = Arc::new(MemoryAuth::new());
        auth.publish(AuthState::SignedIn(Principal {
            uid: uid.to_string(),
            email: None,
        }));
        let store = Arc::new(MemoryStore::new());
        let manager = SessionManager::start(auth.clone(), Duration::ZERO);
        settle().await;
        let expenses = ExpenseStore::new(store.clone(), manager.session());
        Fixture {
            auth,
            store,
            manager,
            expenses,
        }
    }

    fn seed(store: &MemoryStore, owner: &str, title: &str, cents: i64) -> String {
        store.seed(
            EXPENSES_COLLECTION,
            NewExpense {
                title: title.to_string(),
                amount: MoneyCents::new(cents),
                owner: owner.to_string(),
            },
        )
    }

    fn titles(expenses: &ExpenseStore) -> Vec<&str> {
        expenses.records().iter().map(|r| r.title.as_str()).collect()
    }

    #[tokio::test]
    async fn coffee_then_book_totals_sixteen_fifty() {
        let mut fx = signed_in("alice").await;

        fx.expenses.add("Coffee", "4.50").await.unwrap();
        fx.expenses.add("Book", "12").await.unwrap();

        assert_eq!(fx.expenses.total(), MoneyCents::new(1650));
        assert_eq!(fx.expenses.len(), 2);
        assert_eq!(titles(&fx.expenses), ["Coffee", "Book"]);
        assert_eq!(fx.store.count(EXPENSES_COLLECTION), 2);
    }

    #[tokio::test]
    async fn add_grows_list_by_one_and_total_by_amount() {
        let mut fx = signed_in("alice").await;
        for (title, amount, cents) in [("Tea", "0", 0), ("Bus", "1,2", 120), ("Rent", "900.99", 90099)] {
            let len = fx.expenses.len();
            let total = fx.expenses.total();
            let record = fx.expenses.add(title, amount).await.unwrap();
            assert_eq!(record.owner, "alice");
            assert_eq!(fx.expenses.len(), len + 1);
            assert_eq!(fx.expenses.total(), total + MoneyCents::new(cents));
        }
    }

    #[tokio::test]
    async fn empty_title_is_rejected_without_calling_the_store() {
        let mut fx = signed_in("alice").await;

        let err = fx.expenses.add("", "5").await.unwrap_err();

        assert_eq!(err, LedgerError::Validation(ValidationError::MissingTitle));
        assert!(fx.expenses.is_empty());
        assert_eq!(fx.store.calls(), 0);
    }

    #[tokio::test]
    async fn negative_amount_is_rejected() {
        let mut fx = signed_in("alice").await;

        let err = fx.expenses.add("Pen", "-1").await.unwrap_err();

        assert_eq!(err.to_string(), "Please enter a valid amount.");
        assert!(fx.expenses.is_empty());
    }

    #[tokio::test]
    async fn failed_insert_leaves_list_unchanged() {
        let mut fx = signed_in("alice").await;
        fx.expenses.add("Coffee", "4.50").await.unwrap();
        fx.store
            .fail_with(Some(ServiceError::rejected("PERMISSION_DENIED")));

        let err = fx.expenses.add("Book", "12").await.unwrap_err();

        assert_eq!(
            err,
            LedgerError::Store(ServiceError::rejected("PERMISSION_DENIED"))
        );
        assert_eq!(titles(&fx.expenses), ["Coffee"]);
    }

    #[tokio::test]
    async fn remove_drops_only_the_matching_entry() {
        let mut fx = signed_in("alice").await;
        fx.expenses.add("A", "1").await.unwrap();
        let middle = fx.expenses.add("B", "2").await.unwrap();
        fx.expenses.add("C", "3").await.unwrap();

        assert!(fx.expenses.remove(&middle.id).await.unwrap());

        assert_eq!(titles(&fx.expenses), ["A", "C"]);
        assert_eq!(fx.expenses.total(), MoneyCents::new(400));
        assert_eq!(fx.store.count(EXPENSES_COLLECTION), 2);
    }

    #[tokio::test]
    async fn remove_of_unknown_id_is_a_quiet_no_op() {
        let mut fx = signed_in("alice").await;
        fx.expenses.add("A", "1").await.unwrap();

        assert!(!fx.expenses.remove("missing").await.unwrap());
        assert_eq!(fx.expenses.len(), 1);
    }

    #[tokio::test]
    async fn failed_delete_leaves_list_unchanged() {
        let mut fx = signed_in("alice").await;
        let record = fx.expenses.add("A", "1").await.unwrap();
        fx.store
            .fail_with(Some(ServiceError::Transport("offline".to_string())));

        assert!(fx.expenses.remove(&record.id).await.is_err());
        assert_eq!(fx.expenses.len(), 1);
    }

    #[tokio::test]
    async fn total_is_independent_of_order() {
        let mut fx = signed_in("alice").await;
        fx.expenses.add("A", "1.10").await.unwrap();
        fx.expenses.add("B", "2.20").await.unwrap();
        fx.expenses.add("C", "3.30").await.unwrap();
        let total = fx.expenses.total();

        fx.expenses.records.reverse();

        assert_eq!(fx.expenses.total(), total);
        assert_eq!(total, MoneyCents::new(660));
    }

    #[tokio::test]
    async fn title_is_persisted_as_typed() {
        let mut fx = signed_in("alice").await;
        let record = fx.expenses.add(" Tea ", "1").await.unwrap();

        assert_eq!(record.title, " Tea ");
        assert_eq!(titles(&fx.expenses), [" Tea "]);
    }

    #[tokio::test]
    async fn two_largest_amounts_saturate_the_total() {
        let mut fx = signed_in("alice").await;
        fx.expenses.add("Big", "92233720368547758").await.unwrap();
        fx.expenses.add("Big", "92233720368547758").await.unwrap();

        assert_eq!(fx.expenses.len(), 2);
        assert_eq!(fx.expenses.total(), MoneyCents::new(i64::MAX));
    }

    #[tokio::test]
    async fn reload_only_keeps_records_of_the_owner() {
        let mut fx = signed_in("alice").await;
        seed(&fx.store, "alice", "Lunch", 800);
        seed(&fx.store, "bob", "Taxi", 1500);
        seed(&fx.store, "alice", "Dinner", 1200);

        assert_eq!(fx.expenses.reload().await.unwrap(), 2);

        assert_eq!(titles(&fx.expenses), ["Lunch", "Dinner"]);
        assert!(fx.expenses.records().iter().all(|r| r.owner == "alice"));
    }

    #[tokio::test]
    async fn failed_reload_keeps_current_list() {
        let mut fx = signed_in("alice").await;
        seed(&fx.store, "alice", "Lunch", 800);
        fx.expenses.reload().await.unwrap();
        fx.store
            .fail_with(Some(ServiceError::Transport("offline".to_string())));

        assert!(fx.expenses.reload().await.is_err());
        assert_eq!(titles(&fx.expenses), ["Lunch"]);
    }

    #[tokio::test]
    async fn reload_without_session_clears() {
        let mut fx = signed_in("alice").await;
        fx.expenses.add("A", "1").await.unwrap();

        fx.manager.logout().await.unwrap();
        settle().await;

        assert_eq!(fx.expenses.reload().await.unwrap(), 0);
        assert!(fx.expenses.is_empty());
        assert_eq!(fx.expenses.owner(), None);
    }

    #[tokio::test]
    async fn switching_owner_never_keeps_previous_records() {
        let mut fx = signed_in("alice").await;
        fx.expenses.add("Mine", "1").await.unwrap();
        fx.store
            .fail_with(Some(ServiceError::Transport("offline".to_string())));

        fx.auth.publish(AuthState::SignedIn(Principal {
            uid: "bob".to_string(),
            email: None,
        }));
        settle().await;

        assert!(fx.expenses.reload().await.is_err());
        assert!(fx.expenses.is_empty());
        assert_eq!(fx.expenses.owner(), Some("bob"));
    }

    #[tokio::test]
    async fn writes_require_a_session() {
        let mut fx = signed_in("alice").await;
        fx.auth.publish(AuthState::SignedOut);
        settle().await;

        assert_eq!(
            fx.expenses.add("A", "1").await.unwrap_err(),
            LedgerError::SignedOut
        );
        assert_eq!(
            fx.expenses.remove("doc-1").await.unwrap_err(),
            LedgerError::SignedOut
        );
        assert_eq!(fx.store.calls(), 0);
    }
}
