//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! Each variant tags the collaborator (or validation stage) it came from so
//! pipeline logs stay attributable.

use std::fmt;

#[derive(Debug)]
pub enum ServiceError {
    /// Missing or malformed caller input, rejected before any side effect
    Validation(String),
    /// A referenced record is absent from its ledger region
    NotFound(String),
    /// Ledger (spreadsheet) read/write failure
    Ledger(String),
    /// Document collaborator failure (duplicate/edit/export)
    Document(String),
    /// Object storage failure (file upload)
    Storage(String),
    /// Messaging gateway failure
    Messaging(String),
    /// Local filesystem staging failure
    Io(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ServiceError::Ledger(msg) => write!(f, "Ledger error: {}", msg),
            ServiceError::Document(msg) => write!(f, "Document error: {}", msg),
            ServiceError::Storage(msg) => write!(f, "Storage error: {}", msg),
            ServiceError::Messaging(msg) => write!(f, "Messaging error: {}", msg),
            ServiceError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self {
        ServiceError::Io(e.to_string())
    }
}
