//! Mapping block extractors (service → component, service → category)
//!
//! Both blocks share the grammar in [`block_parser`](super::block_parser).
//! They differ only in the value shape: component names are bare
//! identifiers, categories are quoted strings. An entry whose key is not a
//! valid service id, or whose value has the wrong shape, is reported as an
//! unparsed line rather than kept.

use super::block_parser::{parse_block, BlockError, BlockValue};
use super::read_source;
use crate::error::ExtractError;
use crate::types::{
    DuplicateEntry, Extracted, OrderedMap, ServiceId, SourceKind, UnparsedLine,
};
use std::path::Path;
use tracing::debug;

/// Expected value shape of a mapping block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Identifier,
    Quoted,
}

/// Extract service → value pairs from block `block_name` of `source`
///
/// Source order is kept. On a duplicate key the last value wins and the
/// overwrite is recorded as a [`DuplicateEntry`].
pub fn extract_mapping(
    source: &str,
    block_name: &str,
    kind: ValueKind,
    source_kind: SourceKind,
) -> Result<Extracted<OrderedMap<ServiceId, String>>, BlockError> {
    let block = parse_block(source, block_name)?;
    let mut extracted = Extracted::new(OrderedMap::new());

    for unparsed in block.unparsed {
        extracted.diagnostics.unparsed.push(UnparsedLine {
            source: source_kind,
            line: unparsed.line,
            text: unparsed.text,
            reason: unparsed.reason,
        });
    }

    for entry in block.entries {
        let Some(service_id) = ServiceId::parse(&entry.key) else {
            extracted.diagnostics.unparsed.push(UnparsedLine {
                source: source_kind,
                line: entry.line,
                text: format!("{}: {}", entry.key, entry.value.as_str()),
                reason: format!("invalid service id '{}'", entry.key),
            });
            continue;
        };

        let value = match (kind, entry.value) {
            (ValueKind::Identifier, BlockValue::Identifier(v)) => v,
            (ValueKind::Quoted, BlockValue::Quoted(v)) => v,
            (ValueKind::Identifier, BlockValue::Quoted(v)) => {
                extracted.diagnostics.unparsed.push(UnparsedLine {
                    source: source_kind,
                    line: entry.line,
                    text: format!("{}: '{}'", entry.key, v),
                    reason: "expected an identifier value".to_string(),
                });
                continue;
            }
            (ValueKind::Quoted, BlockValue::Identifier(v)) => {
                extracted.diagnostics.unparsed.push(UnparsedLine {
                    source: source_kind,
                    line: entry.line,
                    text: format!("{}: {}", entry.key, v),
                    reason: "expected a quoted value".to_string(),
                });
                continue;
            }
        };

        if extracted.records.insert(service_id.clone(), value).is_some() {
            extracted.diagnostics.duplicates.push(DuplicateEntry {
                source: source_kind,
                key: service_id.to_string(),
                line: entry.line,
            });
        }
    }

    extracted.diagnostics.unparsed.sort_by_key(|u| u.line);
    Ok(extracted)
}

/// Read the mapping source and extract one of its blocks
pub fn extract_mapping_file(
    path: &Path,
    block_name: &str,
    kind: ValueKind,
    source_kind: SourceKind,
) -> Result<Extracted<OrderedMap<ServiceId, String>>, ExtractError> {
    let content = read_source(path, source_kind)?;
    let extracted = extract_mapping(&content, block_name, kind, source_kind).map_err(|error| {
        ExtractError::MalformedBlock {
            source_kind,
            path: path.to_path_buf(),
            error,
        }
    })?;

    debug!(
        block = block_name,
        entries = extracted.records.len(),
        unparsed = extracted.diagnostics.unparsed.len(),
        "Mapping block extracted"
    );
    Ok(extracted)
}
