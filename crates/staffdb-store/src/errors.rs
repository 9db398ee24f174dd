//! Error handling for staffdb-store
//!
//! Wraps staffdb-core `ExError` with driver-error classification

use rusqlite::types::FromSqlError;
use rusqlite::ErrorCode;
use staffdb_core::errors::{ExError, ExErrorKind, StaffError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error
///
/// Constraint failures and value-type mismatches get their own kinds so
/// callers can tell a rejected foreign key from a broken connection. The
/// driver's message is kept verbatim.
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            ExErrorKind::ConstraintViolation
        }
        rusqlite::Error::InvalidColumnType(..)
        | rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::IntegralValueOutOfRange(..) => ExErrorKind::Serialization,
        _ => ExErrorKind::Persistence,
    };

    ExError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an error for a row value that does not fit the field type
pub fn column_conversion(index: usize, err: FromSqlError) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("instance_from_db")
        .with_message(format!("Column {}: {}", index, err))
}

/// Create an error for an operation that requires a saved record
pub fn not_persisted(table: &str, op: &str) -> ExError {
    StaffError::NotPersisted {
        table: table.to_string(),
        op: op.to_string(),
    }
    .into()
}

/// Create an error for a record the caller still has borrowed
pub fn record_borrowed(table: &str, op: &str) -> ExError {
    StaffError::RecordBorrowed {
        table: table.to_string(),
        op: op.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_failure_classified() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT NOT NULL)")
            .unwrap();
        let err = conn
            .execute("INSERT INTO t (v) VALUES (NULL)", [])
            .unwrap_err();

        let ex = from_rusqlite(err);
        assert_eq!(ex.kind(), ExErrorKind::ConstraintViolation);
        assert!(ex.message().contains("NOT NULL"));
    }

    #[test]
    fn test_other_failures_are_persistence() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = conn.execute("SELECT * FROM missing", []).unwrap_err();
        assert_eq!(from_rusqlite(err).kind(), ExErrorKind::Persistence);
    }
}
