//! Wire types of the hosted backend's REST APIs.
//!
//! - [`identity`]: Identity Toolkit password sign-in/sign-up.
//! - [`token`]: Secure Token refresh exchange.
//! - [`firestore`]: documents and structured queries.
//! - [`error`]: the error envelope shared by all of them.

use serde::{Deserialize, Serialize};

pub mod error {
    use super::*;

    /// `{ "error": { "code": 400, "message": "EMAIL_EXISTS" } }`
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ErrorResponse {
        pub error: ErrorBody,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub code: u16,
        pub message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub status: Option<String>,
    }

    impl ErrorResponse {
        pub fn new(code: u16, message: impl Into<String>) -> Self {
            Self {
                error: ErrorBody {
                    code,
                    message: message.into(),
                    status: None,
                },
            }
        }
    }
}

pub mod identity {
    use super::*;

    /// Body of `accounts:signInWithPassword` and `accounts:signUp`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PasswordRequest {
        pub email: String,
        pub password: String,
        pub return_secure_token: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AuthResponse {
        /// Uid of the account.
        pub local_id: String,
        #[serde(default)]
        pub email: Option<String>,
        pub id_token: String,
        pub refresh_token: String,
        /// Lifetime of `id_token` in seconds, as a string.
        pub expires_in: String,
    }
}

pub mod token {
    use super::*;

    /// Form body of the refresh exchange.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct RefreshRequest {
        pub grant_type: String,
        pub refresh_token: String,
    }

    impl RefreshRequest {
        pub fn new(refresh_token: impl Into<String>) -> Self {
            Self {
                grant_type: "refresh_token".to_string(),
                refresh_token: refresh_token.into(),
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct RefreshResponse {
        pub id_token: String,
        pub refresh_token: String,
        pub expires_in: String,
        pub user_id: String,
    }
}

pub mod firestore {
    use std::collections::BTreeMap;

    use super::*;

    /// A typed Firestore value, e.g. `{ "stringValue": "Coffee" }`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum Value {
        StringValue(String),
        DoubleValue(f64),
        /// int64 values travel as decimal strings.
        IntegerValue(String),
        BooleanValue(bool),
        TimestampValue(String),
        NullValue(()),
        /// Map, array, reference, bytes and geo point values. Read as opaque
        /// so one such field doesn't fail the whole response.
        #[serde(untagged, skip_serializing)]
        Unsupported(serde::de::IgnoredAny),
    }

    impl Value {
        pub fn as_str(&self) -> Option<&str> {
            match self {
                Self::StringValue(value) => Some(value),
                _ => None,
            }
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Document {
        /// Full resource name, `projects/{p}/databases/{d}/documents/{collection}/{id}`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default)]
        pub fields: BTreeMap<String, Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub create_time: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub update_time: Option<String>,
    }

    impl Document {
        pub fn with_fields(fields: BTreeMap<String, Value>) -> Self {
            Self {
                fields,
                ..Default::default()
            }
        }

        /// Last segment of the resource name.
        pub fn id(&self) -> Option<&str> {
            self.name
                .as_deref()
                .and_then(|name| name.rsplit('/').next())
                .filter(|id| !id.is_empty())
        }

        pub fn field(&self, name: &str) -> Option<&Value> {
            self.fields.get(name)
        }
    }

    /// Body of `documents:runQuery`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RunQueryRequest {
        pub structured_query: StructuredQuery,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct StructuredQuery {
        pub from: Vec<CollectionSelector>,
        #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
        pub filter: Option<Filter>,
    }

    impl StructuredQuery {
        /// `SELECT * FROM collection WHERE field == value`.
        pub fn field_equals(collection: &str, field: &str, value: Value) -> Self {
            Self {
                from: vec![CollectionSelector {
                    collection_id: collection.to_string(),
                }],
                filter: Some(Filter {
                    field_filter: FieldFilter {
                        field: FieldReference {
                            field_path: field.to_string(),
                        },
                        op: FieldOperator::Equal,
                        value,
                    },
                }),
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CollectionSelector {
        pub collection_id: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Filter {
        pub field_filter: FieldFilter,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct FieldFilter {
        pub field: FieldReference,
        pub op: FieldOperator,
        pub value: Value,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FieldReference {
        pub field_path: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum FieldOperator {
        Equal,
    }

    /// One element of the `runQuery` response stream. Elements without a
    /// document only report progress.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RunQueryResponse {
        #[serde(default)]
        pub document: Option<Document>,
        #[serde(default)]
        pub read_time: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::firestore::*;

    #[test]
    fn query_serializes_where_clause() {
        let query = RunQueryRequest {
            structured_query: StructuredQuery::field_equals(
                "expenses",
                "userId",
                Value::StringValue("u1".to_string()),
            ),
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "structuredQuery": {
                    "from": [{ "collectionId": "expenses" }],
                    "where": {
                        "fieldFilter": {
                            "field": { "fieldPath": "userId" },
                            "op": "EQUAL",
                            "value": { "stringValue": "u1" }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn run_query_response_tolerates_progress_entries() {
        let raw = r#"[
            { "readTime": "2026-01-01T00:00:00Z" },
            { "document": {
                "name": "projects/p/databases/(default)/documents/expenses/abc",
                "fields": {
                    "value": { "stringValue": "Coffee" },
                    "price": { "doubleValue": 4.5 },
                    "userId": { "stringValue": "u1" },
                    "note": { "nullValue": null }
                }
              },
              "readTime": "2026-01-01T00:00:00Z" }
        ]"#;
        let entries: Vec<RunQueryResponse> = serde_json::from_str(raw).unwrap();
        assert!(entries[0].document.is_none());
        let doc = entries[1].document.as_ref().unwrap();
        assert_eq!(doc.id(), Some("abc"));
        assert_eq!(doc.field("value").and_then(Value::as_str), Some("Coffee"));
        assert_eq!(doc.field("price"), Some(&Value::DoubleValue(4.5)));
        assert_eq!(doc.field("note"), Some(&Value::NullValue(())));
    }

    #[test]
    fn integer_values_are_strings_on_the_wire() {
        let value: Value = serde_json::from_str(r#"{ "integerValue": "12" }"#).unwrap();
        assert_eq!(value, Value::IntegerValue("12".to_string()));
    }

    #[test]
    fn nested_values_do_not_fail_the_stream() {
        let raw = r#"[
            { "document": {
                "name": "projects/p/databases/(default)/documents/expenses/a",
                "fields": {
                    "value": { "stringValue": "Coffee" },
                    "meta": { "mapValue": { "fields": { "k": { "stringValue": "v" } } } },
                    "tags": { "arrayValue": { "values": [{ "stringValue": "food" }] } }
                }
              } },
            { "document": {
                "name": "projects/p/databases/(default)/documents/expenses/b",
                "fields": { "value": { "stringValue": "Book" } }
              } }
        ]"#;
        let entries: Vec<RunQueryResponse> = serde_json::from_str(raw).unwrap();
        let first = entries[0].document.as_ref().unwrap();
        assert_eq!(first.field("value").and_then(Value::as_str), Some("Coffee"));
        assert!(matches!(first.field("meta"), Some(Value::Unsupported(_))));
        assert!(matches!(first.field("tags"), Some(Value::Unsupported(_))));
        let second = entries[1].document.as_ref().unwrap();
        assert_eq!(second.field("value").and_then(Value::as_str), Some("Book"));
    }
}
