//! Import declaration extractor
//!
//! Scans the mapping source for `import { Name } from 'Path'`. Only
//! single-name imports bind a component; `import React from 'react'` and
//! multi-name imports are ignored. A repeated Name keeps the most recent
//! path.

use super::read_source;
use crate::error::ExtractError;
use crate::types::{DuplicateEntry, Extracted, ImportBinding, ImportBindings, ImportTarget, SourceKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s*\{\s*(\w+)\s*\}\s*from\s*['"]([^'"]+)['"]"#)
        .expect("import pattern is valid")
});

/// Extract import bindings from `source`
///
/// Relative paths are resolved against `base_dir` (the mapping source's
/// directory) with `extension` appended when the path has none.
pub fn extract_imports(
    source: &str,
    base_dir: Option<&Path>,
    extension: &str,
) -> Extracted<ImportBindings> {
    let mut extracted = Extracted::new(ImportBindings::new());

    for caps in IMPORT_RE.captures_iter(source) {
        let (Some(whole), Some(name), Some(path)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let line = source[..whole.start()].matches('\n').count() + 1;
        let component = name.as_str().to_string();
        let binding = ImportBinding {
            component: component.clone(),
            path: path.as_str().to_string(),
            line,
            target: resolve_target(path.as_str(), base_dir, extension),
        };

        if extracted.records.insert(component.clone(), binding).is_some() {
            extracted.diagnostics.duplicates.push(DuplicateEntry {
                source: SourceKind::Imports,
                key: component,
                line,
            });
        }
    }

    extracted
}

/// Read the mapping source and extract its imports
pub fn extract_imports_file(
    path: &Path,
    extension: &str,
) -> Result<Extracted<ImportBindings>, ExtractError> {
    let content = read_source(path, SourceKind::Imports)?;
    let extracted = extract_imports(&content, path.parent(), extension);
    debug!(
        imports = extracted.records.len(),
        duplicates = extracted.diagnostics.duplicates.len(),
        "Import declarations extracted"
    );
    Ok(extracted)
}

fn resolve_target(import_path: &str, base_dir: Option<&Path>, extension: &str) -> ImportTarget {
    let Some(base_dir) = base_dir else {
        return ImportTarget::External;
    };
    if !(import_path.starts_with("./") || import_path.starts_with("../")) {
        return ImportTarget::External;
    }

    let mut candidate: PathBuf = base_dir.join(import_path);
    if candidate.extension().is_none() {
        candidate.set_extension(extension);
    }

    if candidate.is_file() {
        ImportTarget::Resolved(candidate)
    } else {
        ImportTarget::Missing(candidate)
    }
}
