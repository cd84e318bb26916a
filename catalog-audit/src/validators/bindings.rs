//! Component binding checks
//!
//! Follow each mapping entry to the artifact and import it should resolve
//! to, and check that the artifact sits in its category's directory.

use super::findings::Finding;
use super::ConsistencyRule;
use crate::types::RecordSets;
use catalog_common::CatalogExpectations;

/// Every bound component needs an artifact and an import
///
/// The two absences are independent findings; a component missing from
/// both yields two.
pub struct ExistenceRule;

impl ConsistencyRule for ExistenceRule {
    fn name(&self) -> &'static str {
        "existence"
    }

    fn check(&self, records: &RecordSets, _catalog: &CatalogExpectations) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (service_id, component) in records.components.iter() {
            if !records.artifacts.contains_key(component.as_str()) {
                findings.push(Finding::MissingArtifact {
                    service_id: service_id.clone(),
                    component: component.clone(),
                });
            }
            if !records.imports.contains_key(component.as_str()) {
                findings.push(Finding::MissingImport {
                    service_id: service_id.clone(),
                    component: component.clone(),
                });
            }
        }

        findings
    }
}

/// The stated category's directory must hold the bound artifact
///
/// An unrecognized category is reported as such and not compared. Entries
/// whose component or artifact cannot be resolved are left to the coverage
/// and existence checks.
pub struct CategoryDirectoryRule;

impl ConsistencyRule for CategoryDirectoryRule {
    fn name(&self) -> &'static str {
        "category-directory"
    }

    fn check(&self, records: &RecordSets, catalog: &CatalogExpectations) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (service_id, category) in records.categories.iter() {
            let Some(expected_directory) = catalog.directory_for(category) else {
                findings.push(Finding::InvalidCategory {
                    service_id: service_id.clone(),
                    category: category.clone(),
                });
                continue;
            };

            let Some(artifact) = records
                .components
                .get(service_id)
                .and_then(|component| records.artifacts.get(component.as_str()))
            else {
                continue;
            };

            if artifact.directory != expected_directory {
                findings.push(Finding::DirectoryMismatch {
                    service_id: service_id.clone(),
                    category: category.clone(),
                    expected_directory: expected_directory.to_string(),
                    actual_directory: artifact.directory.clone(),
                });
            }
        }

        findings
    }
}
