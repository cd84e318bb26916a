//! Bidirectional coverage between the two mapping blocks

use super::findings::Finding;
use super::ConsistencyRule;
use crate::types::{RecordSets, SourceKind};
use catalog_common::CatalogExpectations;

/// Symmetric difference of the component map and category map key sets
///
/// Ids only in the component map are reported first, in its order, then
/// ids only in the category map.
pub struct CoverageRule;

impl ConsistencyRule for CoverageRule {
    fn name(&self) -> &'static str {
        "coverage"
    }

    fn check(&self, records: &RecordSets, _catalog: &CatalogExpectations) -> Vec<Finding> {
        let missing_categories = records
            .components
            .keys()
            .filter(|id| !records.categories.contains_key(*id))
            .map(|id| Finding::CoverageMismatch {
                service_id: id.clone(),
                present_in: SourceKind::ComponentMap,
                missing_from: SourceKind::CategoryMap,
            });

        let missing_components = records
            .categories
            .keys()
            .filter(|id| !records.components.contains_key(*id))
            .map(|id| Finding::CoverageMismatch {
                service_id: id.clone(),
                present_in: SourceKind::CategoryMap,
                missing_from: SourceKind::ComponentMap,
            });

        missing_categories.chain(missing_components).collect()
    }
}
