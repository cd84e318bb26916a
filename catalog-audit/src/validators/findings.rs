//! Audit findings
//!
//! A finding is one structured observation: a kind tag, the offending key
//! and enough context to locate the discrepancy. Findings are data; the
//! reporter decides how to print them.

use crate::types::{ServiceId, SourceKind};
use serde::Serialize;
use std::fmt;

/// Report section a finding belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingScope {
    /// About one catalog entry
    Service,
    /// About one category
    Category,
    /// About a raw source as a whole
    Source,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Finding {
    /// Mapping block size differs from the expected total
    ///
    /// Blocks with the same size share one finding.
    CountMismatch {
        sources: Vec<SourceKind>,
        actual: usize,
        expected: usize,
        delta: i64,
    },

    /// Number of services in a category differs from its expectation
    CategoryCountMismatch {
        category: String,
        actual: usize,
        expected: usize,
        delta: i64,
    },

    /// Service present in exactly one of the two mapping blocks
    CoverageMismatch {
        service_id: ServiceId,
        present_in: SourceKind,
        missing_from: SourceKind,
    },

    /// Bound component has no artifact file
    MissingArtifact {
        service_id: ServiceId,
        component: String,
    },

    /// Bound component has no import declaration
    MissingImport {
        service_id: ServiceId,
        component: String,
    },

    /// Artifact lives in a directory other than its category's
    DirectoryMismatch {
        service_id: ServiceId,
        category: String,
        expected_directory: String,
        actual_directory: String,
    },

    /// Category is not in the recognized set
    InvalidCategory {
        service_id: ServiceId,
        category: String,
    },

    /// Interface declared more than once in a category file
    DuplicateDeclaration {
        category: String,
        name: String,
        occurrences: usize,
    },

    /// Key repeated within a source; the last occurrence was kept
    DuplicateKey {
        source: SourceKind,
        key: String,
        occurrences: usize,
    },

    /// Line inside a recognized block that did not match the entry grammar
    UnparsedLine {
        source: SourceKind,
        line: usize,
        text: String,
        reason: String,
    },

    /// Source missing or its block not found; audited as empty
    SourceUnavailable {
        source: SourceKind,
        location: String,
        reason: String,
    },

    /// Relative import path does not point at an existing file
    UnresolvedImportPath {
        component: String,
        path: String,
        resolved: String,
    },

    /// Same component stem found in several category directories
    DuplicateArtifact {
        component: String,
        directories: Vec<String>,
    },
}

impl Finding {
    /// Stable kebab-case tag
    pub fn kind_tag(&self) -> &'static str {
        match self {
            Finding::CountMismatch { .. } => "count-mismatch",
            Finding::CategoryCountMismatch { .. } => "category-count-mismatch",
            Finding::CoverageMismatch { .. } => "coverage-mismatch",
            Finding::MissingArtifact { .. } => "missing-artifact",
            Finding::MissingImport { .. } => "missing-import",
            Finding::DirectoryMismatch { .. } => "directory-mismatch",
            Finding::InvalidCategory { .. } => "invalid-category",
            Finding::DuplicateDeclaration { .. } => "duplicate-declaration",
            Finding::DuplicateKey { .. } => "duplicate-key",
            Finding::UnparsedLine { .. } => "unparsed-line",
            Finding::SourceUnavailable { .. } => "source-unavailable",
            Finding::UnresolvedImportPath { .. } => "unresolved-import-path",
            Finding::DuplicateArtifact { .. } => "duplicate-artifact",
        }
    }

    pub fn scope(&self) -> FindingScope {
        match self {
            Finding::CoverageMismatch { .. }
            | Finding::MissingArtifact { .. }
            | Finding::MissingImport { .. }
            | Finding::DirectoryMismatch { .. }
            | Finding::InvalidCategory { .. } => FindingScope::Service,
            Finding::CategoryCountMismatch { .. } | Finding::DuplicateDeclaration { .. } => {
                FindingScope::Category
            }
            Finding::CountMismatch { .. }
            | Finding::DuplicateKey { .. }
            | Finding::UnparsedLine { .. }
            | Finding::SourceUnavailable { .. }
            | Finding::UnresolvedImportPath { .. }
            | Finding::DuplicateArtifact { .. } => FindingScope::Source,
        }
    }

    /// The offending key: service id, category, component or source label
    pub fn subject(&self) -> String {
        match self {
            Finding::CountMismatch { sources, .. } => sources
                .iter()
                .map(SourceKind::label)
                .collect::<Vec<_>>()
                .join(", "),
            Finding::CategoryCountMismatch { category, .. }
            | Finding::DuplicateDeclaration { category, .. } => category.clone(),
            Finding::CoverageMismatch { service_id, .. }
            | Finding::MissingArtifact { service_id, .. }
            | Finding::MissingImport { service_id, .. }
            | Finding::DirectoryMismatch { service_id, .. }
            | Finding::InvalidCategory { service_id, .. } => service_id.to_string(),
            Finding::DuplicateKey { source, key, .. } => format!("{source} {key}"),
            Finding::UnparsedLine { source, line, .. } => format!("{source} line {line}"),
            Finding::SourceUnavailable { source, .. } => source.label().to_string(),
            Finding::UnresolvedImportPath { component, .. }
            | Finding::DuplicateArtifact { component, .. } => component.clone(),
        }
    }

    /// Human-readable detail
    pub fn message(&self) -> String {
        match self {
            Finding::CountMismatch {
                actual,
                expected,
                delta,
                ..
            }
            | Finding::CategoryCountMismatch {
                actual,
                expected,
                delta,
                ..
            } => format!("{actual} vs {expected}, Δ={delta:+}"),
            Finding::CoverageMismatch {
                present_in,
                missing_from,
                ..
            } => format!("present in {present_in}, missing from {missing_from}"),
            Finding::MissingArtifact { component, .. } => {
                format!("no artifact file for component {component}")
            }
            Finding::MissingImport { component, .. } => {
                format!("no import declaration for component {component}")
            }
            Finding::DirectoryMismatch {
                category,
                expected_directory,
                actual_directory,
                ..
            } => format!(
                "mapped to '{category}' (expects {expected_directory}/) but artifact is in {actual_directory}/"
            ),
            Finding::InvalidCategory { category, .. } => {
                format!("invalid category '{category}'")
            }
            Finding::DuplicateDeclaration {
                name, occurrences, ..
            } => format!("{name} declared {occurrences} times"),
            Finding::DuplicateKey { occurrences, .. } => {
                format!("appears {occurrences} times, last occurrence kept")
            }
            Finding::UnparsedLine { text, reason, .. } => format!("{reason}: `{text}`"),
            Finding::SourceUnavailable {
                location, reason, ..
            } => format!("{reason} ({location}), audited as empty"),
            Finding::UnresolvedImportPath { path, resolved, .. } => {
                format!("import '{path}' does not resolve ({resolved})")
            }
            Finding::DuplicateArtifact { directories, .. } => {
                format!("artifact found in {}", directories.join(", "))
            }
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind_tag(), self.subject(), self.message())
    }
}

/// Signed difference `actual - expected`
pub fn signed_delta(actual: usize, expected: usize) -> i64 {
    actual as i64 - expected as i64
}
