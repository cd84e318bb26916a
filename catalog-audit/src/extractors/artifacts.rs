//! Generated artifact discovery
//!
//! The components root holds one subdirectory per category. Every file with
//! the artifact extension directly inside such a subdirectory is an
//! artifact whose identity is its file stem. Directories and files are
//! visited in name order so discovery is deterministic.

use crate::error::ExtractError;
use crate::types::{ComponentArtifact, ComponentArtifacts, Extracted, SourceKind};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Artifact scanner for one components root
pub struct ArtifactScanner {
    extension: String,
    ignore_patterns: Vec<String>,
}

impl ArtifactScanner {
    /// Create a scanner for files ending in `.<extension>`
    ///
    /// Ignores VCS and dependency directories.
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            ignore_patterns: vec![
                ".git".to_string(),
                ".svn".to_string(),
                "node_modules".to_string(),
            ],
        }
    }

    /// Discover artifacts under `root`
    ///
    /// A component found in more than one directory keeps the later one; the
    /// earlier artifact is recorded as shadowed.
    pub fn scan(&self, root: &Path) -> Result<Extracted<ComponentArtifacts>, ExtractError> {
        if !root.is_dir() {
            return Err(ExtractError::MissingSource {
                source_kind: SourceKind::Artifacts,
                path: root.to_path_buf(),
            });
        }

        let mut extracted = Extracted::new(ComponentArtifacts::new());

        for category_dir in self.category_dirs(root) {
            let directory = file_name_of(&category_dir);

            for file in self.artifact_files(&category_dir) {
                let Some(component) = file.file_stem().map(|s| s.to_string_lossy().into_owned())
                else {
                    continue;
                };

                let artifact = ComponentArtifact {
                    component: component.clone(),
                    directory: directory.clone(),
                    path: file,
                };

                if let Some(shadowed) = extracted.records.insert(component, artifact) {
                    tracing::debug!(
                        "Artifact {} in {} shadowed by a later directory",
                        shadowed.component,
                        shadowed.directory
                    );
                    extracted.diagnostics.shadowed_artifacts.push(shadowed);
                }
            }
        }

        tracing::debug!(
            "Artifact discovery complete: {} components under {}",
            extracted.records.len(),
            root.display()
        );

        Ok(extracted)
    }

    fn category_dirs(&self, root: &Path) -> Vec<PathBuf> {
        WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_dir() && !self.is_ignored(entry.path()))
            .map(|entry| entry.into_path())
            .collect()
    }

    fn artifact_files(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && self.has_artifact_extension(entry.path()))
            .map(|entry| entry.into_path())
            .collect()
    }

    fn has_artifact_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let name = file_name_of(path);
        self.ignore_patterns.iter().any(|p| name == *p)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
