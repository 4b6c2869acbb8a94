//! # Store Errors
//!
//! Error types for the transactional entity store.

use thiserror::Error;

use super::table::{EntityKind, Id};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
///
/// Constraint and precondition errors are always raised before any
/// mutation is applied, so a failed operation leaves every table unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    // ==================
    // Constraint Errors
    // ==================
    /// A live row already holds the candidate's natural key
    #[error("Unique constraint violated on {kind}")]
    UniqueConstraintViolation { kind: EntityKind },

    /// A reference points at a row that is not live, or a referenced row
    /// was about to be removed
    #[error("Foreign constraint violated: {kind} {id}")]
    ForeignConstraintViolation { kind: EntityKind, id: Id },

    /// A table cannot be cleared while rows of a dependent table exist
    #[error("Foreign constraint violated: {dependent} rows reference {kind}")]
    DependentsExist {
        kind: EntityKind,
        dependent: EntityKind,
    },

    // ==================
    // Lookup / Precondition Errors
    // ==================
    /// No row with this identifier
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: Id },

    /// The requested transition is not allowed for the row's current state
    #[error("Precondition failed: {0}")]
    Precondition(String),

    // ==================
    // Locking Errors
    // ==================
    /// The transaction holds a read lock and asked for the write lock
    #[error("Cannot upgrade read lock to write lock on {kind}")]
    LockUpgrade { kind: EntityKind },

    /// A writer panicked while holding the lock
    #[error("Lock poisoned on {kind}")]
    Poisoned { kind: EntityKind },
}

impl StoreError {
    /// Whether the error is caused by the request rather than the store.
    ///
    /// Client errors map to 400 at the HTTP boundary; the rest to 500.
    pub fn is_client_error(&self) -> bool {
        match self {
            StoreError::UniqueConstraintViolation { .. }
            | StoreError::ForeignConstraintViolation { .. }
            | StoreError::DependentsExist { .. }
            | StoreError::NotFound { .. }
            | StoreError::Precondition(_) => true,
            StoreError::LockUpgrade { .. } | StoreError::Poisoned { .. } => false,
        }
    }

    pub(crate) fn precondition(msg: impl Into<String>) -> Self {
        StoreError::Precondition(msg.into())
    }
}
