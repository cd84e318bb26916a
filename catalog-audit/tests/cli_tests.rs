//! Binary exit status and output tests

mod common;

use assert_cmd::Command;
use common::{write_file, ProjectFixture};
use predicates::prelude::*;
use std::path::Path;

/// Binary isolated from the caller's environment, run inside the fixture
fn base_cmd(fixture: &ProjectFixture) -> Command {
    let mut cmd = Command::cargo_bin("catalog-audit").expect("binary built");
    cmd.env_remove("CATALOG_AUDIT_CONFIG")
        .env_remove("CATALOG_AUDIT_ROOT")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", fixture.root.join(".xdg"))
        .current_dir(&fixture.root);
    cmd
}

fn audit_cmd(fixture: &ProjectFixture) -> Command {
    let mut cmd = base_cmd(fixture);
    cmd.arg("--root").arg(&fixture.root);
    cmd
}

#[test]
fn test_consistent_project_exits_zero() {
    let fixture = ProjectFixture::consistent();

    audit_cmd(&fixture)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("CATALOG CONSISTENCY AUDIT"))
        .stdout(predicate::str::contains("Result: no findings"));
}

#[test]
fn test_findings_exit_one() {
    let fixture = ProjectFixture::consistent();
    fixture.move_artifact("SystemImplementationsService3", "SystemImplementations", "Integrations");

    audit_cmd(&fixture)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "[directory-mismatch] systemimplementations-3",
        ));
}

#[test]
fn test_missing_explicit_config_exits_two() {
    let fixture = ProjectFixture::consistent();

    audit_cmd(&fixture)
        .arg("--config")
        .arg(fixture.root.join("absent.toml"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_json_format_is_parseable() {
    let fixture = ProjectFixture::consistent();
    fixture.move_artifact("AutomationsService7", "Automations", "AIAgents");

    let output = audit_cmd(&fixture)
        .args(["--format", "json"])
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(report["source_counts"]["component_map"], 59);
    assert_eq!(report["findings"][0]["kind"], "directory-mismatch");
    assert_eq!(report["findings"][0]["service_id"], "automations-7");
}

#[test]
fn test_detailed_lists_services_sorted() {
    let fixture = ProjectFixture::consistent();

    audit_cmd(&fixture)
        .arg("--detailed")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("== Services by category =="))
        .stdout(predicate::str::contains(
            "  systemImplementations (9):\n    - systemimplementations-1\n",
        ));
}

#[test]
fn test_local_config_drives_custom_catalog() {
    let fixture = ProjectFixture::consistent();
    write_file(
        &fixture.root.join("catalog-audit.toml"),
        r#"
[catalog]
expected_total = 60

[[catalog.categories]]
name = "automations"
directory = "Automations"
expected_count = 21
interface_file = "automationServices.ts"

[[catalog.categories]]
name = "aiAgentServices"
directory = "AIAgents"
expected_count = 10
interface_file = "aiAgentServices.ts"

[[catalog.categories]]
name = "integrationServices"
directory = "Integrations"
expected_count = 10
interface_file = "integrationServices.ts"

[[catalog.categories]]
name = "systemImplementations"
directory = "SystemImplementations"
expected_count = 9
interface_file = "systemImplementationServices.ts"

[[catalog.categories]]
name = "additionalServices"
directory = "AdditionalServices"
expected_count = 10
interface_file = "additionalServices.ts"
"#,
    );

    audit_cmd(&fixture)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("59 vs 60, Δ=-1"))
        .stdout(predicate::str::contains("[category-count-mismatch] automations: 20 vs 21, Δ=-1"));
}

#[test]
fn test_logs_stay_off_stdout() {
    let fixture = ProjectFixture::consistent();

    audit_cmd(&fixture)
        .args(["--log-level", "debug", "--format", "json", "--sequential"])
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("{"))
        .stderr(predicate::str::contains("Starting catalog-audit"));
}

#[test]
fn test_missing_project_reports_unavailable_sources() {
    let fixture = ProjectFixture::consistent();
    base_cmd(&fixture)
        .arg("--root")
        .arg(Path::new("/nonexistent/catalog-project"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[source-unavailable] component map"));
}
