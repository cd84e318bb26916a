//! catalog-audit library interface
//!
//! Extracts the catalog's five record sets from a project tree, runs the
//! consistency rules over them and renders the findings.

pub mod audit;
pub mod error;
pub mod extractors;
pub mod report;
pub mod types;
pub mod validators;

pub use crate::audit::Auditor;
pub use crate::error::{AuditError, AuditResult, ExtractError};
pub use crate::report::{render_text, AuditReport, TextOptions};
pub use crate::types::{RecordSets, ServiceId, SourceKind};
pub use crate::validators::{check_all, check_all_concurrent, ConsistencyRule, Finding, FindingScope};
