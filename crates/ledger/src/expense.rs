use crate::MoneyCents;

/// Collection holding expense documents in the document store.
pub const EXPENSES_COLLECTION: &str = "expenses";

/// One ledger entry.
///
/// Records are never edited: they are created by a successful add and dropped
/// by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRecord {
    /// Opaque id assigned by the document store.
    pub id: String,
    pub title: String,
    pub amount: MoneyCents,
    /// Uid of the principal that owns the record.
    pub owner: String,
}

/// Fields written to the document store when creating a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub title: String,
    pub amount: MoneyCents,
    pub owner: String,
}

impl NewExpense {
    /// Attach the store-generated id.
    pub fn into_record(self, id: String) -> ExpenseRecord {
        ExpenseRecord {
            id,
            title: self.title,
            amount: self.amount,
            owner: self.owner,
        }
    }
}
