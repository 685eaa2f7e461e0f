//! Errors surfaced by the ledger.
//!
//! - [`ValidationError`] is detected locally, before any network call.
//! - [`ServiceError`] is what the auth service and document store report.
//! - [`LedgerError`] is returned by the session and expense operations and
//!   carries the message shown to the user.
use thiserror::Error;

/// Field-level validation failures for the add-expense form.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter expense title")]
    MissingTitle,
    #[error("Please enter a valid amount.")]
    InvalidAmount,
}

/// Failure reported by an external service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service answered and refused the request. The message is the
    /// service's own, kept verbatim.
    #[error("{message}")]
    Rejected { message: String },
    /// The request never got a usable answer.
    #[error("{0}")]
    Transport(String),
    /// A store call was made without a signed-in principal.
    #[error("not signed in")]
    Unauthenticated,
}

impl ServiceError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Ledger operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Auth(ServiceError),
    #[error("{0}")]
    Store(ServiceError),
    #[error("not signed in")]
    SignedOut,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_messages_are_kept_verbatim() {
        let err = LedgerError::Auth(ServiceError::rejected("EMAIL_EXISTS"));
        assert_eq!(err.to_string(), "EMAIL_EXISTS");
    }

    #[test]
    fn validation_messages_are_user_facing() {
        let err = LedgerError::from(ValidationError::MissingTitle);
        assert_eq!(err.to_string(), "Please enter expense title");
    }
}
