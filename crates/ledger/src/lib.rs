//! Client-side expense state and its sync with the hosted backend.
//!
//! - [`SessionManager`] follows the auth service and owns the current
//!   session; components read it through a [`SessionHandle`].
//! - [`ExpenseStore`] keeps the signed-in user's records and their total.
//! - [`validation`] gates the add-expense form.
//!
//! The backend is reached only through the [`AuthService`] and
//! [`DocumentStore`] traits.

pub use currency::Currency;
pub use error::{LedgerError, ServiceError, ValidationError};
pub use expense::{EXPENSES_COLLECTION, ExpenseRecord, NewExpense};
pub use money::MoneyCents;
pub use services::{AuthService, AuthState, DocumentStore, Principal};
pub use session::{DEFAULT_SPLASH, SessionHandle, SessionManager, SessionState};
pub use store::ExpenseStore;

mod currency;
mod error;
mod expense;
mod money;
mod services;
mod session;
mod store;
pub mod validation;

#[cfg(any(test, feature = "memory"))]
pub mod memory;
