//! Consistency rules
//!
//! Every rule is a pure function over the five record sets and the catalog
//! expectations. Rules never mutate their input and do not depend on each
//! other, so they can run in any order or concurrently.
//!
//! # Modules
//! - **counts** - total and per-category entry counts
//! - **coverage** - component map vs category map key sets
//! - **bindings** - artifact/import existence, category directory agreement
//! - **source_quality** - what the extractors recorded on the way

pub mod bindings;
pub mod counts;
pub mod coverage;
pub mod findings;
pub mod source_quality;

pub use bindings::{CategoryDirectoryRule, ExistenceRule};
pub use counts::{CategoryCountRule, TotalCountRule};
pub use coverage::CoverageRule;
pub use findings::{signed_delta, Finding, FindingScope};
pub use source_quality::{
    DuplicateArtifactRule, DuplicateDeclarationRule, DuplicateKeyRule, ImportPathRule,
    SourceAvailabilityRule, UnparsedLineRule,
};

use crate::error::{AuditError, AuditResult};
use crate::types::RecordSets;
use catalog_common::CatalogExpectations;
use std::sync::Arc;
use tracing::debug;

/// A single consistency check
pub trait ConsistencyRule: Send + Sync {
    /// Rule name, for logging
    fn name(&self) -> &'static str;

    /// Findings for these record sets; empty when consistent
    fn check(&self, records: &RecordSets, catalog: &CatalogExpectations) -> Vec<Finding>;
}

/// Every rule, in report order
pub fn default_rules() -> Vec<Arc<dyn ConsistencyRule>> {
    vec![
        Arc::new(SourceAvailabilityRule),
        Arc::new(UnparsedLineRule),
        Arc::new(DuplicateKeyRule),
        Arc::new(TotalCountRule),
        Arc::new(CategoryCountRule),
        Arc::new(CoverageRule),
        Arc::new(ExistenceRule),
        Arc::new(CategoryDirectoryRule),
        Arc::new(ImportPathRule),
        Arc::new(DuplicateArtifactRule),
        Arc::new(DuplicateDeclarationRule),
    ]
}

/// Run every rule on the current thread
pub fn check_all(records: &RecordSets, catalog: &CatalogExpectations) -> Vec<Finding> {
    default_rules()
        .iter()
        .flat_map(|rule| {
            let findings = rule.check(records, catalog);
            debug!(rule = rule.name(), findings = findings.len(), "Rule complete");
            findings
        })
        .collect()
}

/// Run every rule as its own blocking task
///
/// Per-rule lists are concatenated in rule order once all tasks finish, so
/// the result equals [`check_all`].
pub async fn check_all_concurrent(
    records: Arc<RecordSets>,
    catalog: Arc<CatalogExpectations>,
) -> AuditResult<Vec<Finding>> {
    let rules = default_rules();

    let tasks = rules.iter().map(|rule| {
        let rule = Arc::clone(rule);
        let records = Arc::clone(&records);
        let catalog = Arc::clone(&catalog);
        tokio::task::spawn_blocking(move || rule.check(&records, &catalog))
    });

    let results = futures::future::join_all(tasks).await;

    let mut findings = Vec::new();
    for (rule, result) in rules.iter().zip(results) {
        let rule_findings = result.map_err(|error| AuditError::TaskJoin {
            task: rule.name(),
            error,
        })?;
        debug!(rule = rule.name(), findings = rule_findings.len(), "Rule complete");
        findings.extend(rule_findings);
    }

    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The end-to-end single-entry catalog
    fn single_entry() -> RecordSets {
        RecordSets::new()
            .with_component("a-1", "CompA")
            .with_category("a-1", "automations")
            .with_artifact("CompA", "Automations")
            .with_import("CompA", "some/path")
    }

    #[test]
    fn test_single_entry_yields_one_count_mismatch() {
        let findings = check_all(&single_entry(), &CatalogExpectations::default());

        let counts: Vec<_> = findings
            .iter()
            .filter(|f| f.kind_tag() == "count-mismatch")
            .collect();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].message(), "1 vs 59, Δ=-58");

        for tag in [
            "coverage-mismatch",
            "missing-artifact",
            "missing-import",
            "directory-mismatch",
            "invalid-category",
        ] {
            assert!(
                findings.iter().all(|f| f.kind_tag() != tag),
                "unexpected {tag} finding"
            );
        }
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let records = single_entry()
            .with_component("impl-crm", "ImplCrmSpec")
            .with_category("impl-crm", "systemImplementations")
            .with_artifact("ImplCrmSpec", "Integrations")
            .with_category("orphan", "bogus");
        let catalog = CatalogExpectations::default();

        let sequential = check_all(&records, &catalog);
        let concurrent = check_all_concurrent(Arc::new(records), Arc::new(catalog))
            .await
            .unwrap();

        assert_eq!(sequential, concurrent);
        assert!(!sequential.is_empty());
    }
}
