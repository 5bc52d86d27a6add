//! Error types for the reconciliation pipeline.
//!
//! Repository failures are the only fatal class: they surface to the
//! dispatcher unchanged. Validation and no-match conditions are recovered
//! locally by appending entries to the report document and never raise.

use thiserror::Error;

/// Failure inside the document repository backing the engine.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Document not found: {doc_type} with id {id}")]
    NotFound { doc_type: String, id: String },

    #[error("Write conflict on document {id}")]
    Conflict { id: String },
}

/// Failure while loading the configuration snapshot.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fatal failure while processing one report document.
#[derive(Error, Debug)]
pub enum TransitionError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
