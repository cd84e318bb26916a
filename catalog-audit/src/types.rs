//! Core record types for the catalog audit
//!
//! Every audit pass rebuilds these from scratch. Extractors produce them,
//! validators read them, nothing mutates them once the checking phase starts.

use serde::Serialize;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::path::PathBuf;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique catalog entry identifier (lowercase alphanumerics and hyphens)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Parse a raw key, rejecting anything outside `[a-z0-9-]+`
    pub fn parse(raw: &str) -> Option<Self> {
        if is_valid_service_id(raw) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ServiceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

pub fn is_valid_service_id(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Which raw source a record or diagnostic came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    ComponentMap,
    CategoryMap,
    Artifacts,
    Interfaces,
    Imports,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::ComponentMap => "component map",
            SourceKind::CategoryMap => "category map",
            SourceKind::Artifacts => "artifacts",
            SourceKind::Interfaces => "interfaces",
            SourceKind::Imports => "imports",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Ordered map
// ============================================================================

/// Insertion-ordered map with "last write wins" semantics
///
/// A repeated key keeps its first position and takes the newest value.
/// Callers that care about the overwrite inspect the returned old value.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; returns the previous value on overwrite
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

// ============================================================================
// Record sets
// ============================================================================

/// service → component name (the component mapping block)
pub type ComponentBindings = OrderedMap<ServiceId, String>;

/// service → category name (the category mapping block)
pub type CategoryBindings = OrderedMap<ServiceId, String>;

/// component name → generated artifact on disk
pub type ComponentArtifacts = OrderedMap<String, ComponentArtifact>;

/// component name → import declaration
pub type ImportBindings = OrderedMap<String, ImportBinding>;

/// A generated artifact found under the components root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentArtifact {
    /// File stem, the component identity
    pub component: String,
    /// Category subdirectory the file was found in
    pub directory: String,
    pub path: PathBuf,
}

/// A named declaration in a category's interface file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceDeclaration {
    pub category: String,
    pub name: String,
    pub line: usize,
}

/// Where an import path points once resolved against the mapping source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "path", rename_all = "kebab-case")]
pub enum ImportTarget {
    /// Relative path resolving to an existing file
    Resolved(PathBuf),
    /// Relative path whose target file does not exist
    Missing(PathBuf),
    /// Package or aliased path, not resolved on disk
    External,
}

/// `import { Component } from 'path'`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportBinding {
    pub component: String,
    pub path: String,
    pub line: usize,
    pub target: ImportTarget,
}

// ============================================================================
// Extraction diagnostics
// ============================================================================

/// A source that could not be read or whose block could not be located
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceIssue {
    pub source: SourceKind,
    pub location: String,
    pub reason: String,
}

/// A line inside a recognized block that did not match the entry grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnparsedLine {
    pub source: SourceKind,
    pub line: usize,
    pub text: String,
    pub reason: String,
}

/// A key that appeared again and overwrote an earlier value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateEntry {
    pub source: SourceKind,
    pub key: String,
    pub line: usize,
}

/// Everything an extractor noticed besides the records themselves
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub issues: Vec<SourceIssue>,
    pub unparsed: Vec<UnparsedLine>,
    pub duplicates: Vec<DuplicateEntry>,
    /// Artifacts replaced by a same-named file in a later directory
    pub shadowed_artifacts: Vec<ComponentArtifact>,
}

impl Diagnostics {
    pub fn merge(&mut self, other: Diagnostics) {
        self.issues.extend(other.issues);
        self.unparsed.extend(other.unparsed);
        self.duplicates.extend(other.duplicates);
        self.shadowed_artifacts.extend(other.shadowed_artifacts);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
            && self.unparsed.is_empty()
            && self.duplicates.is_empty()
            && self.shadowed_artifacts.is_empty()
    }
}

/// Output of one extractor: records plus what it noticed on the way
#[derive(Debug, Clone, Default)]
pub struct Extracted<T> {
    pub records: T,
    pub diagnostics: Diagnostics,
}

impl<T> Extracted<T> {
    pub fn new(records: T) -> Self {
        Self {
            records,
            diagnostics: Diagnostics::default(),
        }
    }
}

/// The five normalized record sets of one audit pass
#[derive(Debug, Clone, Default)]
pub struct RecordSets {
    pub components: ComponentBindings,
    pub categories: CategoryBindings,
    pub artifacts: ComponentArtifacts,
    pub interfaces: Vec<InterfaceDeclaration>,
    pub imports: ImportBindings,
    pub diagnostics: Diagnostics,
}

impl RecordSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of CategoryBinding entries naming `category`
    pub fn category_count(&self, category: &str) -> usize {
        self.categories.values().filter(|c| c.as_str() == category).count()
    }
}

/// Fixture builders for rule and report tests
#[cfg(test)]
impl RecordSets {
    /// Bind a service to a component (panics on an invalid id)
    pub fn with_component(mut self, service_id: &str, component: &str) -> Self {
        self.components.insert(fixture_id(service_id), component.to_string());
        self
    }

    pub fn with_category(mut self, service_id: &str, category: &str) -> Self {
        self.categories.insert(fixture_id(service_id), category.to_string());
        self
    }

    pub fn with_artifact(mut self, component: &str, directory: &str) -> Self {
        self.artifacts.insert(
            component.to_string(),
            ComponentArtifact {
                component: component.to_string(),
                directory: directory.to_string(),
                path: PathBuf::from(directory).join(component),
            },
        );
        self
    }

    /// Import whose target is not checked on disk
    pub fn with_import(mut self, component: &str, path: &str) -> Self {
        self.imports.insert(
            component.to_string(),
            ImportBinding {
                component: component.to_string(),
                path: path.to_string(),
                line: 0,
                target: ImportTarget::External,
            },
        );
        self
    }

    pub fn with_interface(mut self, category: &str, name: &str) -> Self {
        let line = self.interfaces.len() + 1;
        self.interfaces.push(InterfaceDeclaration {
            category: category.to_string(),
            name: name.to_string(),
            line,
        });
        self
    }
}

#[cfg(test)]
fn fixture_id(raw: &str) -> ServiceId {
    match ServiceId::parse(raw) {
        Some(id) => id,
        None => panic!("invalid service id in fixture: {raw}"),
    }
}
