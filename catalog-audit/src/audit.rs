//! Audit orchestration
//!
//! One pass runs in two fan-out/fan-in phases:
//! 1. The five extractors run as independent blocking tasks and are joined
//! 2. The consistency rules run over the frozen record sets and are joined
//!
//! No state crosses task boundaries except through the joins.

use crate::error::{AuditError, AuditResult, ExtractError};
use crate::extractors::{
    extract_imports_file, extract_interfaces, extract_mapping_file, ArtifactScanner, ValueKind,
};
use crate::report::AuditReport;
use crate::types::{Extracted, RecordSets, SourceIssue, SourceKind};
use crate::validators::{check_all, check_all_concurrent};
use catalog_common::{AuditConfig, CatalogExpectations, SourceLayout};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{info, warn};

/// Runs audit passes over one project
pub struct Auditor {
    root: PathBuf,
    layout: Arc<SourceLayout>,
    catalog: Arc<CatalogExpectations>,
    concurrent_rules: bool,
}

impl Auditor {
    /// Auditor for the project root the configuration resolves to
    pub fn new(config: AuditConfig) -> Self {
        let root = config.resolve_project_root(None);
        Self::with_root(root, config)
    }

    /// Auditor for an explicit project root
    pub fn with_root(root: impl Into<PathBuf>, config: AuditConfig) -> Self {
        Self {
            root: root.into(),
            layout: Arc::new(config.layout),
            catalog: Arc::new(config.catalog),
            concurrent_rules: true,
        }
    }

    /// Run rules one after another on the calling task
    pub fn sequential_rules(mut self) -> Self {
        self.concurrent_rules = false;
        self
    }

    /// Build the five record sets
    ///
    /// A source that cannot be read degrades to an empty record set and a
    /// [`SourceIssue`]; only a failed task join is an error.
    pub async fn extract(&self) -> AuditResult<RecordSets> {
        let mapping_path = self.layout.mapping_source_path(&self.root);
        let components_root = self.layout.components_root_path(&self.root);

        let components = {
            let path = mapping_path.clone();
            let block = self.layout.component_block.clone();
            tokio::task::spawn_blocking(move || {
                extract_mapping_file(&path, &block, ValueKind::Identifier, SourceKind::ComponentMap)
            })
        };

        let categories = {
            let path = mapping_path.clone();
            let block = self.layout.category_block.clone();
            tokio::task::spawn_blocking(move || {
                extract_mapping_file(&path, &block, ValueKind::Quoted, SourceKind::CategoryMap)
            })
        };

        let artifacts = {
            let scanner = ArtifactScanner::new(self.layout.artifact_extension.clone());
            tokio::task::spawn_blocking(move || scanner.scan(&components_root))
        };

        let interfaces = {
            let root = self.root.clone();
            let layout = Arc::clone(&self.layout);
            let catalog = Arc::clone(&self.catalog);
            tokio::task::spawn_blocking(move || extract_interfaces(&root, &layout, &catalog))
        };

        let imports = {
            let path = mapping_path;
            let extension = self.layout.artifact_extension.clone();
            tokio::task::spawn_blocking(move || extract_imports_file(&path, &extension))
        };

        let (components, categories, artifacts, interfaces, imports) =
            tokio::join!(components, categories, artifacts, interfaces, imports);

        let components = degrade(joined("component-map", components)?);
        let categories = degrade(joined("category-map", categories)?);
        let artifacts = degrade(joined("artifacts", artifacts)?);
        let interfaces = joined("interfaces", interfaces)?;
        let imports = degrade(joined("imports", imports)?);

        let mut records = RecordSets::new();
        records.diagnostics.merge(components.diagnostics);
        records.diagnostics.merge(categories.diagnostics);
        records.diagnostics.merge(artifacts.diagnostics);
        records.diagnostics.merge(interfaces.diagnostics);
        records.diagnostics.merge(imports.diagnostics);
        records.components = components.records;
        records.categories = categories.records;
        records.artifacts = artifacts.records;
        records.interfaces = interfaces.records;
        records.imports = imports.records;

        info!(
            "Extraction complete: {} component bindings, {} category bindings, {} artifacts, {} interfaces, {} imports",
            records.components.len(),
            records.categories.len(),
            records.artifacts.len(),
            records.interfaces.len(),
            records.imports.len()
        );

        Ok(records)
    }

    /// Extract, check and build the report
    pub async fn run(&self) -> AuditResult<AuditReport> {
        info!("Auditing catalog under {}", self.root.display());

        let records = Arc::new(self.extract().await?);

        let findings = if self.concurrent_rules {
            check_all_concurrent(Arc::clone(&records), Arc::clone(&self.catalog)).await?
        } else {
            check_all(&records, &self.catalog)
        };

        info!("Checks complete: {} findings", findings.len());

        Ok(AuditReport::build(&records, &self.catalog, findings))
    }
}

fn joined<T>(task: &'static str, result: Result<T, JoinError>) -> AuditResult<T> {
    result.map_err(|error| AuditError::TaskJoin { task, error })
}

/// Substitute an empty record set for a failed extraction
fn degrade<T: Default>(result: Result<Extracted<T>, ExtractError>) -> Extracted<T> {
    match result {
        Ok(extracted) => extracted,
        Err(e) => {
            warn!("{}; auditing it as empty", e);
            let mut empty = Extracted::new(T::default());
            empty.diagnostics.issues.push(SourceIssue {
                source: e.source_kind(),
                location: e.path().display().to_string(),
                reason: e.reason(),
            });
            empty
        }
    }
}
