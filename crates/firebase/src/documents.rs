//! Mapping between expense records and Firestore documents.
//!
//! Field names match the documents written by the mobile client:
//! `value` (title), `price` (amount in major units) and `userId` (owner).

use std::collections::BTreeMap;

use api_types::firestore::{Document, Value};
use ledger::{ExpenseRecord, MoneyCents, NewExpense};

pub(crate) const FIELD_TITLE: &str = "value";
pub(crate) const FIELD_AMOUNT: &str = "price";
pub(crate) const FIELD_OWNER: &str = "userId";

pub(crate) fn to_document(expense: &NewExpense) -> Document {
    let fields = BTreeMap::from([
        (
            FIELD_TITLE.to_string(),
            Value::StringValue(expense.title.clone()),
        ),
        (
            FIELD_AMOUNT.to_string(),
            Value::DoubleValue(expense.amount.to_major()),
        ),
        (
            FIELD_OWNER.to_string(),
            Value::StringValue(expense.owner.clone()),
        ),
    ]);
    Document::with_fields(fields)
}

/// Build a record from a stored document. Returns `None` when a required
/// field is missing or has an unexpected type.
pub(crate) fn to_record(document: &Document) -> Option<ExpenseRecord> {
    let id = document.id()?;
    let title = document.field(FIELD_TITLE)?.as_str()?;
    let owner = document.field(FIELD_OWNER)?.as_str()?;
    let amount = match document.field(FIELD_AMOUNT)? {
        Value::DoubleValue(value) => MoneyCents::from_major(*value)?,
        Value::IntegerValue(value) => MoneyCents::new(value.parse::<i64>().ok()?.checked_mul(100)?),
        _ => return None,
    };

    Some(ExpenseRecord {
        id: id.to_string(),
        title: title.to_string(),
        amount,
        owner: owner.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(fields: BTreeMap<String, Value>) -> Document {
        Document {
            name: Some("projects/p/databases/(default)/documents/expenses/abc".to_string()),
            ..Document::with_fields(fields)
        }
    }

    #[test]
    fn new_expense_uses_mobile_field_names() {
        let doc = to_document(&NewExpense {
            title: "Coffee".to_string(),
            amount: MoneyCents::new(450),
            owner: "u1".to_string(),
        });
        assert_eq!(
            doc.field("value"),
            Some(&Value::StringValue("Coffee".to_string()))
        );
        assert_eq!(doc.field("price"), Some(&Value::DoubleValue(4.5)));
        assert_eq!(
            doc.field("userId"),
            Some(&Value::StringValue("u1".to_string()))
        );
        assert_eq!(doc.name, None);
    }

    #[test]
    fn reads_double_and_integer_prices() {
        let mut fields = to_document(&NewExpense {
            title: "Book".to_string(),
            amount: MoneyCents::new(1200),
            owner: "u1".to_string(),
        })
        .fields;
        let record = to_record(&stored(fields.clone())).unwrap();
        assert_eq!(record.id, "abc");
        assert_eq!(record.amount, MoneyCents::new(1200));

        fields.insert(
            FIELD_AMOUNT.to_string(),
            Value::IntegerValue("12".to_string()),
        );
        assert_eq!(
            to_record(&stored(fields)).unwrap().amount,
            MoneyCents::new(1200)
        );
    }

    #[test]
    fn malformed_documents_are_skipped() {
        let fields = BTreeMap::from([(
            FIELD_TITLE.to_string(),
            Value::StringValue("No price".to_string()),
        )]);
        assert_eq!(to_record(&stored(fields)), None);
    }
}
