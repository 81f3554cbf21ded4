use thiserror::Error;

use crate::types::{GoalId, PurchaseId, StoreId};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("validation failed: {message}")]
    Validation {
        message: String,
    },

    #[error("purchase not found: {id}")]
    PurchaseNotFound {
        id: PurchaseId,
    },

    #[error("store not found: {id}")]
    StoreNotFound {
        id: StoreId,
    },

    #[error("goal not found: {id}")]
    GoalNotFound {
        id: GoalId,
    },

    #[error("storage failure: {message}")]
    Storage {
        message: String,
    },

    #[error("purchase {id} was modified concurrently: expected version {expected}, found {found}")]
    ConcurrentModification {
        id: PurchaseId,
        expected: u64,
        found: u64,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        LedgerError::Storage {
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation { .. })
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::storage(format!("io error: {}", err))
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::storage(format!("serialization error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_human_readable() {
        let err = LedgerError::validation("amount must be positive");
        assert_eq!(err.to_string(), "validation failed: amount must be positive");
        assert!(err.is_validation());

        let err = LedgerError::storage("disk full");
        assert_eq!(err.to_string(), "storage failure: disk full");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: LedgerError = io.into();
        assert!(matches!(err, LedgerError::Storage { .. }));
    }
}
