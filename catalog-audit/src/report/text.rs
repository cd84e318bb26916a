//! Plain-text rendering
//!
//! Sections always appear in the same order: header, source counts,
//! service findings, category findings, source findings, category summary,
//! optional per-category service listing, result line.

use super::AuditReport;
use crate::validators::{Finding, FindingScope};
use std::fmt;

/// Text rendering switches
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOptions {
    /// Also list the service ids of every category
    pub detailed: bool,
}

pub fn render_text(report: &AuditReport, options: &TextOptions) -> String {
    TextReport { report, options }.to_string()
}

struct TextReport<'a> {
    report: &'a AuditReport,
    options: &'a TextOptions,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;

        writeln!(f, "CATALOG CONSISTENCY AUDIT")?;
        writeln!(f, "=========================")?;

        let counts = &report.source_counts;
        writeln!(f)?;
        writeln!(f, "== Source counts ==")?;
        for (label, value) in [
            ("Component map entries", counts.component_map),
            ("Category map entries", counts.category_map),
            ("Artifacts", counts.artifacts),
            ("Interface declarations", counts.interfaces),
            ("Import declarations", counts.imports),
            ("Unique components", counts.unique_components),
            ("Reused components", counts.reused_components),
        ] {
            writeln!(f, "  {:<24}{:>5}", format!("{label}:"), value)?;
        }

        for (title, scope) in [
            ("Service findings", FindingScope::Service),
            ("Category findings", FindingScope::Category),
            ("Source findings", FindingScope::Source),
        ] {
            let findings: Vec<&Finding> = report.findings_in(scope).collect();
            writeln!(f)?;
            writeln!(f, "== {} ({}) ==", title, findings.len())?;
            if findings.is_empty() {
                writeln!(f, "  (none)")?;
            }
            for finding in findings {
                writeln!(f, "  {finding}")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "== Category summary ==")?;
        writeln!(
            f,
            "  {:<24}{:>8}{:>10}{:>8}",
            "Category", "Actual", "Expected", "Delta"
        )?;
        for row in report.category_summary.iter().chain([&report.total]) {
            writeln!(
                f,
                "  {:<24}{:>8}{:>10}{:>8}",
                row.category,
                row.actual,
                row.expected,
                format!("{:+}", row.delta)
            )?;
        }

        if self.options.detailed {
            writeln!(f)?;
            writeln!(f, "== Services by category ==")?;
            for group in &report.services_by_category {
                writeln!(f, "  {} ({}):", group.category, group.services.len())?;
                for service in &group.services {
                    writeln!(f, "    - {service}")?;
                }
            }
        }

        writeln!(f)?;
        match report.findings.len() {
            0 => writeln!(f, "Result: no findings"),
            1 => writeln!(f, "Result: 1 finding"),
            n => writeln!(f, "Result: {n} findings"),
        }
    }
}
