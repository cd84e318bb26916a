//! Tests for configuration resolution and graceful degradation
//!
//! Covers:
//! - Config file priority (CLI → ENV → working directory → defaults)
//! - Project root priority (CLI → ENV → TOML → working directory)
//! - Partial TOML documents falling back to defaults
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate CATALOG_AUDIT_CONFIG or CATALOG_AUDIT_ROOT are
//! marked with #[serial].

use catalog_common::config::{
    AuditConfig, CatalogExpectations, ConfigResolver, ConfigSource, CONFIG_ENV_VAR,
    LOCAL_CONFIG_FILE, ROOT_ENV_VAR,
};
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SMALL_CATALOG: &str = r#"
project_root = "/srv/app"

[catalog]
expected_total = 3

[[catalog.categories]]
name = "automations"
directory = "Automations"
expected_count = 2
interface_file = "automationServices.ts"

[[catalog.categories]]
name = "additionalServices"
directory = "AdditionalServices"
expected_count = 1
interface_file = "additionalServices.ts"

[logging]
level = "debug"
"#;

#[test]
#[serial]
fn test_no_config_uses_compiled_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let empty = TempDir::new().unwrap();

    let resolver = ConfigResolver::new(None).with_working_dir(empty.path());
    let (config, source) = resolver.load().unwrap();

    // A user-level config could exist on the machine running the tests
    if source == ConfigSource::CompiledDefaults {
        assert_eq!(config.catalog, CatalogExpectations::default());
    }
}

#[test]
#[serial]
fn test_cli_argument_has_highest_priority() {
    let dir = TempDir::new().unwrap();
    let cli_path = dir.path().join("cli.toml");
    let env_path = dir.path().join("env.toml");
    fs::write(&cli_path, SMALL_CATALOG).unwrap();
    fs::write(&env_path, "").unwrap();
    env::set_var(CONFIG_ENV_VAR, &env_path);

    let resolver = ConfigResolver::new(Some(cli_path.clone())).with_working_dir(dir.path());
    let (config, source) = resolver.load().unwrap();

    assert_eq!(source, ConfigSource::CommandLine(cli_path));
    assert_eq!(config.catalog.expected_total, 3);
    assert_eq!(config.logging.level, "debug");

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_beats_working_directory() {
    let dir = TempDir::new().unwrap();
    let env_path = dir.path().join("env.toml");
    fs::write(&env_path, SMALL_CATALOG).unwrap();
    fs::write(dir.path().join(LOCAL_CONFIG_FILE), "").unwrap();
    env::set_var(CONFIG_ENV_VAR, &env_path);

    let resolver = ConfigResolver::new(None).with_working_dir(dir.path());
    assert_eq!(resolver.locate(), ConfigSource::Environment(env_path));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_working_directory_file_is_discovered() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let local = dir.path().join(LOCAL_CONFIG_FILE);
    fs::write(&local, SMALL_CATALOG).unwrap();

    let resolver = ConfigResolver::new(None).with_working_dir(dir.path());
    let (config, source) = resolver.load().unwrap();

    assert_eq!(source, ConfigSource::WorkingDirectory(local));
    assert_eq!(config.catalog.categories.len(), 2);
    assert_eq!(config.catalog.directory_for("additionalServices"), Some("AdditionalServices"));
}

#[test]
#[serial]
fn test_missing_explicit_config_is_an_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let resolver = ConfigResolver::new(Some(PathBuf::from("/nonexistent/catalog-audit.toml")));
    let err = resolver.load().unwrap_err();
    assert!(err.to_string().contains("config file not found"));
}

#[test]
fn test_unparsable_config_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[catalog\nexpected_total = ").unwrap();

    let err = AuditConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn test_inconsistent_catalog_is_rejected() {
    let toml = r#"
[catalog]
expected_total = 60
"#;
    let err = AuditConfig::from_toml_str(toml, Path::new("inline.toml")).unwrap_err();
    assert!(err.to_string().contains("sum to 59"));
}

#[test]
fn test_partial_layout_keeps_other_defaults() {
    let toml = r#"
[layout]
artifact_extension = "vue"
"#;
    let config = AuditConfig::from_toml_str(toml, Path::new("inline.toml")).unwrap();
    assert_eq!(config.layout.artifact_extension, "vue");
    assert_eq!(config.layout.component_block, "SERVICE_COMPONENT_MAP");
    assert_eq!(config.layout.interface_suffixes, vec!["Requirements", "Config"]);
}

#[test]
#[serial]
fn test_project_root_priority() {
    let config = AuditConfig::from_toml_str(SMALL_CATALOG, Path::new("inline.toml")).unwrap();

    env::set_var(ROOT_ENV_VAR, "/from/env");
    assert_eq!(
        config.resolve_project_root(Some(Path::new("/from/cli"))),
        PathBuf::from("/from/cli")
    );
    assert_eq!(config.resolve_project_root(None), PathBuf::from("/from/env"));

    env::remove_var(ROOT_ENV_VAR);
    assert_eq!(config.resolve_project_root(None), PathBuf::from("/srv/app"));
}
