//! Source quality rules
//!
//! Surface what the extractors noticed while building the record sets:
//! degraded sources, unrecognized block lines, overwritten keys, broken
//! import paths, shadowed artifacts and repeated interface declarations.

use super::findings::Finding;
use super::ConsistencyRule;
use crate::types::{ImportTarget, OrderedMap, RecordSets, SourceKind};
use catalog_common::CatalogExpectations;

/// A missing source or block was audited as empty
pub struct SourceAvailabilityRule;

impl ConsistencyRule for SourceAvailabilityRule {
    fn name(&self) -> &'static str {
        "source-availability"
    }

    fn check(&self, records: &RecordSets, _catalog: &CatalogExpectations) -> Vec<Finding> {
        records
            .diagnostics
            .issues
            .iter()
            .map(|issue| Finding::SourceUnavailable {
                source: issue.source,
                location: issue.location.clone(),
                reason: issue.reason.clone(),
            })
            .collect()
    }
}

pub struct UnparsedLineRule;

impl ConsistencyRule for UnparsedLineRule {
    fn name(&self) -> &'static str {
        "unparsed-line"
    }

    fn check(&self, records: &RecordSets, _catalog: &CatalogExpectations) -> Vec<Finding> {
        records
            .diagnostics
            .unparsed
            .iter()
            .map(|unparsed| Finding::UnparsedLine {
                source: unparsed.source,
                line: unparsed.line,
                text: unparsed.text.clone(),
                reason: unparsed.reason.clone(),
            })
            .collect()
    }
}

/// Keys overwritten by a later occurrence in the same source
///
/// The last value was kept during extraction; this only reports it, once
/// per key.
pub struct DuplicateKeyRule;

impl ConsistencyRule for DuplicateKeyRule {
    fn name(&self) -> &'static str {
        "duplicate-key"
    }

    fn check(&self, records: &RecordSets, _catalog: &CatalogExpectations) -> Vec<Finding> {
        let mut counts: OrderedMap<(SourceKind, String), usize> = OrderedMap::new();
        for duplicate in &records.diagnostics.duplicates {
            let key = (duplicate.source, duplicate.key.clone());
            // first occurrence plus every overwrite
            let occurrences = counts.get(&key).copied().unwrap_or(1) + 1;
            counts.insert(key, occurrences);
        }

        counts
            .iter()
            .map(|((source, key), occurrences)| Finding::DuplicateKey {
                source: *source,
                key: key.clone(),
                occurrences: *occurrences,
            })
            .collect()
    }
}

/// Interface names declared more than once within a category
pub struct DuplicateDeclarationRule;

impl ConsistencyRule for DuplicateDeclarationRule {
    fn name(&self) -> &'static str {
        "duplicate-declaration"
    }

    fn check(&self, records: &RecordSets, _catalog: &CatalogExpectations) -> Vec<Finding> {
        let mut counts: OrderedMap<(String, String), usize> = OrderedMap::new();
        for declaration in &records.interfaces {
            let key = (declaration.category.clone(), declaration.name.clone());
            let occurrences = counts.get(&key).copied().unwrap_or(0) + 1;
            counts.insert(key, occurrences);
        }

        counts
            .iter()
            .filter(|(_, occurrences)| **occurrences > 1)
            .map(|((category, name), occurrences)| Finding::DuplicateDeclaration {
                category: category.clone(),
                name: name.clone(),
                occurrences: *occurrences,
            })
            .collect()
    }
}

/// Relative imports whose target file does not exist
pub struct ImportPathRule;

impl ConsistencyRule for ImportPathRule {
    fn name(&self) -> &'static str {
        "import-path"
    }

    fn check(&self, records: &RecordSets, _catalog: &CatalogExpectations) -> Vec<Finding> {
        records
            .imports
            .values()
            .filter_map(|import| match &import.target {
                ImportTarget::Missing(resolved) => Some(Finding::UnresolvedImportPath {
                    component: import.component.clone(),
                    path: import.path.clone(),
                    resolved: resolved.display().to_string(),
                }),
                ImportTarget::Resolved(_) | ImportTarget::External => None,
            })
            .collect()
    }
}

/// Component stems found in more than one category directory
///
/// Directories are listed in discovery order; the last one is the artifact
/// the other checks see.
pub struct DuplicateArtifactRule;

impl ConsistencyRule for DuplicateArtifactRule {
    fn name(&self) -> &'static str {
        "duplicate-artifact"
    }

    fn check(&self, records: &RecordSets, _catalog: &CatalogExpectations) -> Vec<Finding> {
        let mut directories: OrderedMap<String, Vec<String>> = OrderedMap::new();
        for shadowed in &records.diagnostics.shadowed_artifacts {
            let mut seen = directories
                .get(shadowed.component.as_str())
                .cloned()
                .unwrap_or_default();
            seen.push(shadowed.directory.clone());
            directories.insert(shadowed.component.clone(), seen);
        }

        directories
            .iter()
            .map(|(component, shadowed)| {
                let mut all = shadowed.clone();
                if let Some(kept) = records.artifacts.get(component.as_str()) {
                    all.push(kept.directory.clone());
                }
                Finding::DuplicateArtifact {
                    component: component.clone(),
                    directories: all,
                }
            })
            .collect()
    }
}
