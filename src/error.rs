//! Error taxonomy for the pipeline.
//!
//! Every error carries enough context to be reported against the file that
//! caused it. [`EtlError::is_fatal`] separates errors that abort the whole run
//! from those that only skip the current file.

use crate::sqlite_persistence::SchemaError;
use rusqlite::ErrorCode;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by the storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused a single operation (constraint violation, bad value).
    #[error("store rejected operation: {0}")]
    Rejected(#[source] rusqlite::Error),

    /// The store can no longer be talked to at all.
    #[error("store connection failed: {0}")]
    Connection(#[source] rusqlite::Error),

    #[error("existing database does not match the warehouse schema: {0}")]
    SchemaMismatch(String),
}

impl StoreError {
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, StoreError::Connection(_))
    }

    /// Only a single rejected operation leaves the store usable.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, StoreError::Rejected(_))
    }
}

impl From<SchemaError> for StoreError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Sqlite(err) => err.into(),
            SchemaError::Mismatch(reason) => StoreError::SchemaMismatch(reason),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        let lost = matches!(
            err.sqlite_error_code(),
            Some(
                ErrorCode::CannotOpen
                    | ErrorCode::NotADatabase
                    | ErrorCode::DatabaseCorrupt
                    | ErrorCode::SystemIoFailure
            )
        );
        if lost {
            StoreError::Connection(err)
        } else {
            StoreError::Rejected(err)
        }
    }
}

#[derive(Debug, Error)]
pub enum EtlError {
    #[error("data root does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("malformed record in {}: {reason}", .path.display())]
    MalformedRecord { path: PathBuf, reason: String },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EtlError {
    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        EtlError::MalformedRecord {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        EtlError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether the run must stop, as opposed to skipping the current file.
    pub fn is_fatal(&self) -> bool {
        match self {
            EtlError::NotFound(_) => true,
            EtlError::Store(store_err) => store_err.is_fatal(),
            EtlError::MalformedRecord { .. } | EtlError::Io { .. } => false,
        }
    }
}

impl From<rusqlite::Error> for EtlError {
    fn from(err: rusqlite::Error) -> Self {
        EtlError::Store(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ffi;

    fn sqlite_failure(code: std::os::raw::c_int) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(ffi::Error::new(code), None)
    }

    #[test]
    fn constraint_violations_are_rejections() {
        let err = StoreError::from(sqlite_failure(ffi::SQLITE_CONSTRAINT));
        assert!(matches!(err, StoreError::Rejected(_)));
        assert!(!EtlError::from(err).is_fatal());
    }

    #[test]
    fn unreadable_database_is_connection_failure() {
        for code in [ffi::SQLITE_CANTOPEN, ffi::SQLITE_NOTADB, ffi::SQLITE_IOERR] {
            let err = StoreError::from(sqlite_failure(code));
            assert!(err.is_connection_failure(), "code {} not fatal", code);
            assert!(EtlError::Store(err).is_fatal());
        }
    }

    #[test]
    fn non_sqlite_errors_are_rejections() {
        let err = StoreError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, StoreError::Rejected(_)));
    }

    #[test]
    fn schema_errors_keep_their_cause() {
        let lost = StoreError::from(SchemaError::Sqlite(sqlite_failure(ffi::SQLITE_NOTADB)));
        assert!(lost.is_connection_failure());

        let mismatch = StoreError::from(SchemaError::Mismatch("Table songs does not exist".into()));
        assert!(matches!(mismatch, StoreError::SchemaMismatch(_)));
        assert!(EtlError::Store(mismatch).is_fatal());
    }

    #[test]
    fn file_level_errors_are_not_fatal() {
        let path = Path::new("/data/song.json");
        assert!(!EtlError::malformed(path, "missing field").is_fatal());
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(!EtlError::io(path, io).is_fatal());
        assert!(EtlError::NotFound(path.to_path_buf()).is_fatal());
    }

    #[test]
    fn malformed_message_names_file() {
        let err = EtlError::malformed(Path::new("/logs/a.json"), "line 3: expected value");
        assert_eq!(
            err.to_string(),
            "malformed record in /logs/a.json: line 3: expected value"
        );
    }
}
