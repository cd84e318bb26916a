//! Configuration loading and catalog expectations
//!
//! The audit has no ambient constants: the expected total, the per-category
//! expectations and the category → directory table all live in
//! [`CatalogExpectations`], which is passed explicitly into the checker.
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`CATALOG_AUDIT_CONFIG`)
//! 3. `catalog-audit.toml` in the working directory
//! 4. `<user config dir>/catalog-audit/config.toml`
//! 5. Compiled defaults (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "CATALOG_AUDIT_CONFIG";

/// Environment variable naming the audited project root
pub const ROOT_ENV_VAR: &str = "CATALOG_AUDIT_ROOT";

/// Config file name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "catalog-audit.toml";

/// One catalog category: its logical name, artifact directory, expected size
/// and the source file holding its interface declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    pub directory: String,
    pub expected_count: usize,
    pub interface_file: String,
}

impl CategorySpec {
    pub fn new(
        name: impl Into<String>,
        directory: impl Into<String>,
        expected_count: usize,
        interface_file: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            expected_count,
            interface_file: interface_file.into(),
        }
    }
}

/// Expected shape of the catalog
///
/// Category order is significant: reports and per-category checks follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogExpectations {
    /// Expected number of entries in each mapping block
    pub expected_total: usize,
    /// Recognized categories in report order
    pub categories: Vec<CategorySpec>,
}

impl Default for CatalogExpectations {
    fn default() -> Self {
        Self {
            expected_total: 59,
            categories: vec![
                CategorySpec::new("automations", "Automations", 20, "automationServices.ts"),
                CategorySpec::new("aiAgentServices", "AIAgents", 10, "aiAgentServices.ts"),
                CategorySpec::new(
                    "integrationServices",
                    "Integrations",
                    10,
                    "integrationServices.ts",
                ),
                CategorySpec::new(
                    "systemImplementations",
                    "SystemImplementations",
                    9,
                    "systemImplementationServices.ts",
                ),
                CategorySpec::new(
                    "additionalServices",
                    "AdditionalServices",
                    10,
                    "additionalServices.ts",
                ),
            ],
        }
    }
}

impl CatalogExpectations {
    pub fn new(expected_total: usize, categories: Vec<CategorySpec>) -> Self {
        Self {
            expected_total,
            categories,
        }
    }

    /// Look up a category by logical name
    pub fn category(&self, name: &str) -> Option<&CategorySpec> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Directory expected to hold artifacts of the named category
    pub fn directory_for(&self, name: &str) -> Option<&str> {
        self.category(name).map(|c| c.directory.as_str())
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.category(name).is_some()
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Sum of the per-category expectations
    pub fn per_category_total(&self) -> usize {
        self.categories.iter().map(|c| c.expected_count).sum()
    }

    /// Reject tables the checker cannot interpret unambiguously
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(Error::Config("catalog defines no categories".to_string()));
        }

        let mut names = HashSet::new();
        let mut directories = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() || category.directory.trim().is_empty() {
                return Err(Error::Config(
                    "category name and directory must be non-empty".to_string(),
                ));
            }
            if !names.insert(category.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate category name '{}'",
                    category.name
                )));
            }
            if !directories.insert(category.directory.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate category directory '{}'",
                    category.directory
                )));
            }
        }

        let sum = self.per_category_total();
        if sum != self.expected_total {
            return Err(Error::Config(format!(
                "expected_total is {} but per-category expectations sum to {}",
                self.expected_total, sum
            )));
        }

        Ok(())
    }
}

/// Where each source lives, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLayout {
    /// File holding both mapping blocks and the import declarations
    pub mapping_source: PathBuf,
    /// Directory with one subdirectory per category of generated artifacts
    pub components_root: PathBuf,
    /// Directory holding the per-category interface files
    pub types_dir: PathBuf,
    /// Name of the service → component block
    pub component_block: String,
    /// Name of the service → category block
    pub category_block: String,
    /// Extension (without dot) of artifact files
    pub artifact_extension: String,
    /// Name suffixes that mark an interface declaration as catalog-relevant
    pub interface_suffixes: Vec<String>,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            mapping_source: PathBuf::from("src/config/serviceComponentMapping.ts"),
            components_root: PathBuf::from("src/components/Phase2/ServiceRequirements"),
            types_dir: PathBuf::from("src/types"),
            component_block: "SERVICE_COMPONENT_MAP".to_string(),
            category_block: "SERVICE_CATEGORY_MAP".to_string(),
            artifact_extension: "tsx".to_string(),
            interface_suffixes: vec!["Requirements".to_string(), "Config".to_string()],
        }
    }
}

impl SourceLayout {
    pub fn mapping_source_path(&self, root: &Path) -> PathBuf {
        root.join(&self.mapping_source)
    }

    pub fn components_root_path(&self, root: &Path) -> PathBuf {
        root.join(&self.components_root)
    }

    pub fn interface_file_path(&self, root: &Path, category: &CategorySpec) -> PathBuf {
        root.join(&self.types_dir).join(&category.interface_file)
    }

    /// Reject block names and extensions the extractors cannot match
    pub fn validate(&self) -> Result<()> {
        for block in [&self.component_block, &self.category_block] {
            let valid = !block.is_empty()
                && block
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
            if !valid {
                return Err(Error::InvalidInput(format!(
                    "block name '{}' is not an identifier",
                    block
                )));
            }
        }

        if self.component_block == self.category_block {
            return Err(Error::InvalidInput(
                "component and category blocks must have different names".to_string(),
            ));
        }

        if self.artifact_extension.is_empty() || self.artifact_extension.starts_with('.') {
            return Err(Error::InvalidInput(format!(
                "artifact extension '{}' must be non-empty and given without a dot",
                self.artifact_extension
            )));
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Complete audit configuration as read from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Root of the audited project (optional, see [`AuditConfig::resolve_project_root`])
    pub project_root: Option<PathBuf>,
    pub layout: SourceLayout,
    pub catalog: CatalogExpectations,
    pub logging: LoggingConfig,
}

impl AuditConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self> {
        let config: AuditConfig = toml::from_str(content).map_err(|source| Error::TomlParse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.layout.validate()?;
        config.catalog.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content, path)
    }

    /// Project root priority: CLI → ENV → TOML → working directory
    pub fn resolve_project_root(&self, cli_arg: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_arg {
            return path.to_path_buf();
        }

        if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.project_root {
            return path.clone();
        }

        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    WorkingDirectory(PathBuf),
    UserConfig(PathBuf),
    CompiledDefaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::CommandLine(p)
            | ConfigSource::Environment(p)
            | ConfigSource::WorkingDirectory(p)
            | ConfigSource::UserConfig(p) => Some(p),
            ConfigSource::CompiledDefaults => None,
        }
    }

    /// Explicitly named files must exist; discovered ones are optional
    fn is_explicit(&self) -> bool {
        matches!(
            self,
            ConfigSource::CommandLine(_) | ConfigSource::Environment(_)
        )
    }
}

/// Resolves which config file (if any) to load
pub struct ConfigResolver {
    cli_arg: Option<PathBuf>,
    working_dir: PathBuf,
}

impl ConfigResolver {
    pub fn new(cli_arg: Option<PathBuf>) -> Self {
        Self {
            cli_arg,
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Override the directory searched for `catalog-audit.toml`
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Pick the highest-priority config source without reading it
    pub fn locate(&self) -> ConfigSource {
        if let Some(path) = &self.cli_arg {
            return ConfigSource::CommandLine(path.clone());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return ConfigSource::Environment(PathBuf::from(path));
            }
        }

        let local = self.working_dir.join(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return ConfigSource::WorkingDirectory(local);
        }

        if let Some(user) = dirs::config_dir().map(|d| d.join("catalog-audit").join("config.toml"))
        {
            if user.is_file() {
                return ConfigSource::UserConfig(user);
            }
        }

        ConfigSource::CompiledDefaults
    }

    /// Load the effective configuration
    ///
    /// A missing explicitly named file is an error; with no file at all the
    /// compiled defaults are used.
    pub fn load(&self) -> Result<(AuditConfig, ConfigSource)> {
        let source = self.locate();
        match source.path() {
            Some(path) => {
                if source.is_explicit() && !path.exists() {
                    return Err(Error::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                debug!("Loading config from {}", path.display());
                let config = AuditConfig::load(path)?;
                Ok((config, source))
            }
            None => {
                info!("No config file found, using compiled catalog defaults");
                Ok((AuditConfig::default(), source))
            }
        }
    }
}
