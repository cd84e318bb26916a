//! Audit report
//!
//! The report is a plain value built once per run from the record sets and
//! the merged findings. It carries no timestamps or absolute state, so two
//! runs over unchanged sources render byte-identical output.

mod text;

pub use text::{render_text, TextOptions};

use crate::error::AuditResult;
use crate::types::{RecordSets, ServiceId};
use crate::validators::{signed_delta, Finding, FindingScope};
use catalog_common::CatalogExpectations;
use serde::Serialize;
use std::collections::HashSet;

/// Summary label for categories outside the recognized set
pub const UNRECOGNIZED_CATEGORY: &str = "(unrecognized)";

/// Raw record counts per source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCounts {
    pub component_map: usize,
    pub category_map: usize,
    pub artifacts: usize,
    pub interfaces: usize,
    pub imports: usize,
    /// Distinct component names bound in the component map
    pub unique_components: usize,
    /// Component map entries sharing a component with an earlier entry
    pub reused_components: usize,
}

impl SourceCounts {
    pub fn from_records(records: &RecordSets) -> Self {
        let unique_components = records
            .components
            .values()
            .map(String::as_str)
            .collect::<HashSet<_>>()
            .len();

        Self {
            component_map: records.components.len(),
            category_map: records.categories.len(),
            artifacts: records.artifacts.len(),
            interfaces: records.interfaces.len(),
            imports: records.imports.len(),
            unique_components,
            reused_components: records.components.len() - unique_components,
        }
    }
}

/// One row of the actual-vs-expected table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub actual: usize,
    pub expected: usize,
    pub delta: i64,
}

impl CategorySummary {
    fn new(category: impl Into<String>, actual: usize, expected: usize) -> Self {
        Self {
            category: category.into(),
            actual,
            expected,
            delta: signed_delta(actual, expected),
        }
    }
}

/// Service ids of one category, sorted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryServices {
    pub category: String,
    pub services: Vec<ServiceId>,
}

/// Complete result of one audit pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub source_counts: SourceCounts,
    pub findings: Vec<Finding>,
    pub category_summary: Vec<CategorySummary>,
    pub total: CategorySummary,
    pub services_by_category: Vec<CategoryServices>,
}

impl AuditReport {
    pub fn build(
        records: &RecordSets,
        catalog: &CatalogExpectations,
        findings: Vec<Finding>,
    ) -> Self {
        let mut category_summary: Vec<CategorySummary> = catalog
            .categories
            .iter()
            .map(|c| CategorySummary::new(&c.name, records.category_count(&c.name), c.expected_count))
            .collect();

        let unrecognized = records
            .categories
            .values()
            .filter(|c| !catalog.is_known(c))
            .count();
        if unrecognized > 0 {
            category_summary.push(CategorySummary::new(UNRECOGNIZED_CATEGORY, unrecognized, 0));
        }

        let total = CategorySummary::new(
            "total",
            records.categories.len(),
            catalog.expected_total,
        );

        Self {
            source_counts: SourceCounts::from_records(records),
            findings,
            category_summary,
            total,
            services_by_category: services_by_category(records, catalog),
        }
    }

    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    /// Findings belonging to one report section, in rule order
    pub fn findings_in(&self, scope: FindingScope) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.scope() == scope)
    }

    pub fn render_json(&self) -> AuditResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Recognized categories in catalog order, then unrecognized ones by name
fn services_by_category(
    records: &RecordSets,
    catalog: &CatalogExpectations,
) -> Vec<CategoryServices> {
    let mut names: Vec<String> = catalog.category_names().map(str::to_string).collect();

    let mut unknown: Vec<String> = records
        .categories
        .values()
        .filter(|c| !catalog.is_known(c))
        .cloned()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    unknown.sort();
    names.extend(unknown);

    names
        .into_iter()
        .map(|category| {
            let mut services: Vec<ServiceId> = records
                .categories
                .iter()
                .filter(|(_, c)| **c == category)
                .map(|(id, _)| id.clone())
                .collect();
            services.sort();
            CategoryServices { category, services }
        })
        .collect()
}
