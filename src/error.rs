//! Error handling for sensorlog-sessions
//!
//! This module defines the crate error type and a Result alias. Most pipeline
//! stages never surface these errors to the caller: they are converted into
//! skips or absent streams and reported through a
//! [`DiagnosticObserver`](crate::diagnostics::DiagnosticObserver).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for session discovery operations
#[derive(Error, Debug)]
pub enum SessionError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors raised while unpacking an archive
    #[error("Archive error in {}: {message}", path.display())]
    Archive { path: PathBuf, message: String },

    /// Archive suffix is not one we know how to unpack
    #[error("Unsupported archive format: {}", .0.display())]
    UnsupportedArchive(PathBuf),

    /// Errors related to tabular content (empty file, missing header row)
    #[error("Table error in {}: {message}", path.display())]
    Table { path: PathBuf, message: String },

    /// Errors from the CSV parser
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors from the zip reader
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Errors while walking a directory tree
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SessionError>,
    },
}

impl SessionError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SessionError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an archive error for the given path
    pub fn archive(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        SessionError::Archive {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a table error for the given path
    pub fn table(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        SessionError::Table {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for session discovery operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SessionError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Into::<SessionError>::into(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| Into::<SessionError>::into(e).with_context(f()))
    }
}
