//! Storage error types for stencil

use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// File read/write failed
    #[error("IO error on {path} ({operation}): {source}")]
    IoError {
        path: PathBuf,
        operation: IoOperation,
        source: std::io::Error,
    },

    /// A JSON document could not be parsed
    #[error("Failed to parse {path} as {format}: {message}")]
    ParseError {
        path: PathBuf,
        format: String,
        message: String,
    },

    /// The template source key does not point to a template
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// The template has no descriptor
    #[error("Template descriptor not found: {0}")]
    DescriptorNotFound(PathBuf),

    /// The template descriptor lacks required fields
    #[error("Invalid template descriptor {path}: {message}")]
    InvalidDescriptor { path: PathBuf, message: String },

    /// The target has no manifest
    #[error("No stencil manifest found at {0}; run `stencil init` first")]
    ManifestNotFound(PathBuf),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// IO operation type for error context
#[derive(Debug, Clone, Copy)]
pub enum IoOperation {
    Read,
    Write,
    Copy,
    CreateDir,
}

impl std::fmt::Display for IoOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoOperation::Read => write!(f, "read"),
            IoOperation::Write => write!(f, "write"),
            IoOperation::Copy => write!(f, "copy"),
            IoOperation::CreateDir => write!(f, "create dir"),
        }
    }
}

impl StorageError {
    /// Create an IO error
    pub fn io_error(path: PathBuf, operation: IoOperation, source: std::io::Error) -> Self {
        StorageError::IoError {
            path,
            operation,
            source,
        }
    }

    /// Create a parse error
    pub fn parse_error(
        path: PathBuf,
        format: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        StorageError::ParseError {
            path,
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create an invalid descriptor error
    pub fn invalid_descriptor(path: PathBuf, message: impl Into<String>) -> Self {
        StorageError::InvalidDescriptor {
            path,
            message: message.into(),
        }
    }
}
