//! Count checks: mapping block sizes and the per-category distribution

use super::findings::{signed_delta, Finding};
use super::ConsistencyRule;
use crate::types::{RecordSets, SourceKind};
use catalog_common::CatalogExpectations;

/// Compares each mapping block's size against the expected total
///
/// When both blocks miss the total by the same amount they are reported
/// together as one finding; otherwise each offending block gets its own.
pub struct TotalCountRule;

impl ConsistencyRule for TotalCountRule {
    fn name(&self) -> &'static str {
        "total-count"
    }

    fn check(&self, records: &RecordSets, catalog: &CatalogExpectations) -> Vec<Finding> {
        let expected = catalog.expected_total;
        let sizes = [
            (SourceKind::ComponentMap, records.components.len()),
            (SourceKind::CategoryMap, records.categories.len()),
        ];

        let mut findings: Vec<Finding> = Vec::new();
        for (source, actual) in sizes {
            if actual == expected {
                continue;
            }

            let grouped = findings.iter_mut().find_map(|f| match f {
                Finding::CountMismatch {
                    sources,
                    actual: seen,
                    ..
                } if *seen == actual => Some(sources),
                _ => None,
            });

            match grouped {
                Some(sources) => sources.push(source),
                None => findings.push(Finding::CountMismatch {
                    sources: vec![source],
                    actual,
                    expected,
                    delta: signed_delta(actual, expected),
                }),
            }
        }

        findings
    }
}

/// Compares the number of services per category against its expectation
pub struct CategoryCountRule;

impl ConsistencyRule for CategoryCountRule {
    fn name(&self) -> &'static str {
        "category-count"
    }

    fn check(&self, records: &RecordSets, catalog: &CatalogExpectations) -> Vec<Finding> {
        catalog
            .categories
            .iter()
            .filter_map(|category| {
                let actual = records.category_count(&category.name);
                (actual != category.expected_count).then(|| Finding::CategoryCountMismatch {
                    category: category.name.clone(),
                    actual,
                    expected: category.expected_count,
                    delta: signed_delta(actual, category.expected_count),
                })
            })
            .collect()
    }
}
