//! Interface declaration extractor
//!
//! Each category has one source file of `export interface <Name> {`
//! declarations. Only names ending in one of the configured suffixes count.
//! Names are kept in first-seen order and are not deduplicated: a repeated
//! declaration is a catalog defect for the checker to report.

use super::read_source;
use crate::error::ExtractError;
use crate::types::{Extracted, InterfaceDeclaration, SourceIssue, SourceKind};
use catalog_common::{CatalogExpectations, SourceLayout};
use regex::Regex;
use std::path::Path;
use tracing::{debug, warn};

/// Compiled matcher for suffixed interface declarations
pub struct InterfaceScanner {
    pattern: Option<Regex>,
}

impl InterfaceScanner {
    /// Build a scanner for the given name suffixes
    ///
    /// With no suffixes nothing matches.
    pub fn new(suffixes: &[String]) -> Self {
        let alternatives: Vec<String> = suffixes
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| regex::escape(s))
            .collect();

        let pattern = if alternatives.is_empty() {
            None
        } else {
            let source = format!(
                r"\bexport\s+interface\s+(\w+(?:{}))\s*\{{",
                alternatives.join("|")
            );
            Regex::new(&source).ok()
        };

        Self { pattern }
    }

    /// Declarations in `source`, attributed to `category`
    pub fn scan(&self, source: &str, category: &str) -> Vec<InterfaceDeclaration> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        pattern
            .captures_iter(source)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?;
                Some(InterfaceDeclaration {
                    category: category.to_string(),
                    name: name.as_str().to_string(),
                    line: source[..whole.start()].matches('\n').count() + 1,
                })
            })
            .collect()
    }

    pub fn scan_file(
        &self,
        path: &Path,
        category: &str,
    ) -> Result<Vec<InterfaceDeclaration>, ExtractError> {
        let content = read_source(path, SourceKind::Interfaces)?;
        Ok(self.scan(&content, category))
    }
}

/// Scan every category's interface file
///
/// A missing or unreadable file degrades to no declarations for that
/// category and is recorded as a source issue; other categories still run.
pub fn extract_interfaces(
    root: &Path,
    layout: &SourceLayout,
    catalog: &CatalogExpectations,
) -> Extracted<Vec<InterfaceDeclaration>> {
    let scanner = InterfaceScanner::new(&layout.interface_suffixes);
    let mut extracted = Extracted::new(Vec::new());

    for category in &catalog.categories {
        let path = layout.interface_file_path(root, category);
        match scanner.scan_file(&path, &category.name) {
            Ok(declarations) => {
                debug!(
                    category = %category.name,
                    declarations = declarations.len(),
                    "Interface file scanned"
                );
                extracted.records.extend(declarations);
            }
            Err(e) => {
                warn!("{}", e);
                extracted.diagnostics.issues.push(SourceIssue {
                    source: SourceKind::Interfaces,
                    location: path.display().to_string(),
                    reason: e.reason(),
                });
            }
        }
    }

    extracted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffixes() -> Vec<String> {
        vec!["Requirements".to_string(), "Config".to_string()]
    }

    #[test]
    fn collects_suffixed_declarations_in_order_with_duplicates() {
        let source = "\
export interface AutoReportsRequirements {
  frequency: string;
}
export interface Helper {
}
interface PrivateConfig {
}
export interface AutoCrmConfig {
}
export interface AutoReportsRequirements {
}
";
        let scanner = InterfaceScanner::new(&suffixes());
        let names: Vec<_> = scanner
            .scan(source, "automations")
            .into_iter()
            .map(|d| (d.name, d.line))
            .collect();

        assert_eq!(
            names,
            vec![
                ("AutoReportsRequirements".to_string(), 1),
                ("AutoCrmConfig".to_string(), 8),
                ("AutoReportsRequirements".to_string(), 10),
            ]
        );
    }

    #[test]
    fn no_suffixes_matches_nothing() {
        let scanner = InterfaceScanner::new(&[]);
        assert!(scanner
            .scan("export interface FooRequirements {}", "automations")
            .is_empty());
    }
}
