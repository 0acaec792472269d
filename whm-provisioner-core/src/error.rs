//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export client error types
pub use whm_provisioner_client::{ApiError, CredentialValidationError};

use crate::types::AccountState;

/// Lifecycle layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// The order has no external account yet
    #[error("No external account exists for order {0}")]
    ExternalAccountNotFound(String),

    /// The order already has an external account
    #[error("Order {0} already has an external account")]
    ExternalAccountExists(String),

    /// The operation is not allowed in the account's current state
    #[error("Cannot {operation} an account that is {state}")]
    InvalidState {
        operation: &'static str,
        state: AccountState,
    },

    /// Input rejected before any API call (e.g. password policy)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Connection settings are missing or malformed
    #[error("{0}")]
    CredentialValidation(#[from] CredentialValidationError),

    /// External account persistence failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Classified failure from the control panel
    #[error("{0}")]
    Api(#[from] ApiError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, wrong state, refused
    /// credentials). Used for log classification: `warn` when `true`, `error`
    /// otherwise.
    ///
    /// **Please update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ExternalAccountNotFound(_)
            | Self::ExternalAccountExists(_)
            | Self::InvalidState { .. }
            | Self::Validation(_)
            | Self::CredentialValidation(_) => true,
            Self::Api(e) => e.is_expected(),
            Self::Storage(_) => false,
        }
    }

    /// Whether the operation was refused because the account is not in a
    /// state that allows it. No API call was made.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::ExternalAccountNotFound(_)
                | Self::ExternalAccountExists(_)
                | Self::InvalidState { .. }
        )
    }
}

/// Lifecycle layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
