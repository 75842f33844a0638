//! # Persistence Errors
//!
//! Error types cho persistence layer, wrapping sqlx errors.

use thiserror::Error;
use txcost_core::StoreError;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    // === Database errors ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    // === Conversion errors ===
    #[error("Invalid column value: {field} = {value}")]
    InvalidValue { field: String, value: String },
}

/// Result type alias cho PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    /// Tạo NotFound error
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Tạo InvalidValue error
    pub fn invalid_value(field: &str, value: &str) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Kiểm tra có phải lỗi not found không
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Database(e) => StoreError::unavailable(e.to_string()),
            other => StoreError::rejected(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = PersistenceError::not_found("Customer", "CED/8-111-111");
        assert_eq!(
            err.to_string(),
            "Record not found: Customer with id CED/8-111-111"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_into_store_error() {
        let err: StoreError = PersistenceError::invalid_value("status", "MAYBE").into();
        assert!(matches!(err, StoreError::Rejected(_)));

        let err: StoreError = PersistenceError::Database(sqlx::Error::PoolClosed).into();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
