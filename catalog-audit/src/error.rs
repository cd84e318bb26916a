//! Error types for catalog-audit
//!
//! Extraction errors never abort a run: the orchestrator turns them into
//! empty record sets plus a `source-unavailable` finding. Only
//! [`AuditError`] reaches the binary.

use crate::extractors::block_parser::BlockError;
use crate::types::SourceKind;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single extractor
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Required file or directory is absent at its configured path
    #[error("{source_kind} source not found: {path}")]
    MissingSource {
        source_kind: SourceKind,
        path: PathBuf,
    },

    /// Named declaration block cannot be located inside the source
    #[error("{source_kind} block is malformed in {path}: {error}")]
    MalformedBlock {
        source_kind: SourceKind,
        path: PathBuf,
        #[source]
        error: BlockError,
    },

    /// Source exists but could not be read
    #[error("cannot read {source_kind} source {path}: {error}")]
    Io {
        source_kind: SourceKind,
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
}

impl ExtractError {
    pub fn source_kind(&self) -> SourceKind {
        match self {
            ExtractError::MissingSource { source_kind, .. }
            | ExtractError::MalformedBlock { source_kind, .. }
            | ExtractError::Io { source_kind, .. } => *source_kind,
        }
    }

    pub fn path(&self) -> &PathBuf {
        match self {
            ExtractError::MissingSource { path, .. }
            | ExtractError::MalformedBlock { path, .. }
            | ExtractError::Io { path, .. } => path,
        }
    }

    /// Short reason without the path, for report lines
    pub fn reason(&self) -> String {
        match self {
            ExtractError::MissingSource { .. } => "source not found".to_string(),
            ExtractError::MalformedBlock { error, .. } => error.to_string(),
            ExtractError::Io { error, .. } => error.to_string(),
        }
    }
}

/// Fatal audit error
#[derive(Debug, Error)]
pub enum AuditError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] catalog_common::Error),

    /// An extractor or rule task panicked or was cancelled
    #[error("Task '{task}' failed: {error}")]
    TaskJoin {
        task: &'static str,
        #[source]
        error: tokio::task::JoinError,
    },

    /// Report serialization failed
    #[error("Report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for audit operations
pub type AuditResult<T> = Result<T, AuditError>;
