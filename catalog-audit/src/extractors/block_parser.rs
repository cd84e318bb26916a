//! Mapping block grammar
//!
//! A mapping block is a named top-level declaration:
//!
//! ```text
//! [export] const NAME [: Type] = {
//!   KEY ':' VALUE ','      (one or more per line)
//!   // comments, /* block comments */ (may span lines)
//! }                        (first line starting with '}')
//! ```
//!
//! KEY is a quoted string or a bare identifier, VALUE is a quoted string or
//! an identifier. Lines inside the block that do not follow the grammar are
//! returned as [`UnparsedEntry`] records instead of being dropped.

use thiserror::Error;

/// Block could not be isolated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    /// No `const NAME ... = {` declaration
    #[error("declaration '{name}' not found")]
    MissingHeader { name: String },

    /// Header found but no line-anchored closing brace before the next declaration
    #[error("declaration '{name}' opened on line {header_line} is never closed")]
    Unterminated { name: String, header_line: usize },
}

/// Entry value as written in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockValue {
    /// Bare identifier, e.g. `ImplCrmSpec`
    Identifier(String),
    /// Quoted string, e.g. `'systemImplementations'`
    Quoted(String),
}

impl BlockValue {
    pub fn as_str(&self) -> &str {
        match self {
            BlockValue::Identifier(s) | BlockValue::Quoted(s) => s,
        }
    }
}

/// One `KEY: VALUE,` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEntry {
    pub key: String,
    pub value: BlockValue,
    /// 1-based line number in the whole source
    pub line: usize,
}

/// A line inside the block that did not match the entry grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparsedEntry {
    pub line: usize,
    pub text: String,
    pub reason: String,
}

/// Isolated block contents in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub name: String,
    pub header_line: usize,
    pub entries: Vec<BlockEntry>,
    pub unparsed: Vec<UnparsedEntry>,
}

/// Locate the block named `name` and parse its entries
pub fn parse_block(source: &str, name: &str) -> Result<Block, BlockError> {
    let (decl_start, body_start) = find_header(source, name).ok_or_else(|| {
        BlockError::MissingHeader {
            name: name.to_string(),
        }
    })?;

    let header_line = line_number_at(source, decl_start);
    let body_line = line_number_at(source, body_start);

    let mut entries = Vec::new();
    let mut unparsed = Vec::new();
    let mut closed = false;
    // inside an unclosed `/*`
    let mut in_comment = false;

    for (offset, raw) in source[body_start..].split('\n').enumerate() {
        let line_no = body_line + offset;
        let line = raw.trim_end_matches('\r');

        // braces and declarations inside a comment are text
        if !in_comment {
            if offset == 0 {
                // Remainder of the header line after '{'
                if line.trim_start().starts_with('}') {
                    closed = true;
                    break;
                }
            } else if line.starts_with('}') {
                closed = true;
                break;
            } else if starts_declaration(line) {
                break;
            }
        }

        parse_line(line, line_no, &mut in_comment, &mut entries, &mut unparsed);
    }

    if !closed {
        return Err(BlockError::Unterminated {
            name: name.to_string(),
            header_line,
        });
    }

    Ok(Block {
        name: name.to_string(),
        header_line,
        entries,
        unparsed,
    })
}

/// Returns (declaration start, offset just past the opening brace)
fn find_header(source: &str, name: &str) -> Option<(usize, usize)> {
    let mut line_start = 0;
    for line in source.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        let decl = trimmed.strip_prefix("export").map(str::trim_start).unwrap_or(trimmed);

        if let Some(after_const) = decl.strip_prefix("const") {
            if after_const.starts_with(char::is_whitespace) {
                let after_const = after_const.trim_start();
                if let Some(after_name) = after_const.strip_prefix(name) {
                    if !after_name.starts_with(is_ident_char) {
                        let name_end = line_start + line.len() - after_name.len();
                        if let Some(body) = find_opening_brace(source, name_end) {
                            return Some((line_start + indent, body));
                        }
                    }
                }
            }
        }

        line_start += line.len();
    }
    None
}

/// Find `= {` after the declaration name, not crossing a ';'
fn find_opening_brace(source: &str, from: usize) -> Option<usize> {
    let rest = &source[from..];
    for (i, c) in rest.char_indices() {
        match c {
            ';' => return None,
            '=' => {
                let after = &rest[i + 1..];
                let skipped = after.len() - after.trim_start().len();
                if after.trim_start().starts_with('{') {
                    return Some(from + i + 1 + skipped + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn starts_declaration(line: &str) -> bool {
    ["export ", "const ", "let ", "function ", "import "]
        .iter()
        .any(|kw| line.starts_with(kw))
}

fn line_number_at(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Parse one body line, skipping `//` and `/* … */` comments
///
/// `in_comment` carries an unclosed `/*` over to the following lines.
fn parse_line(
    line: &str,
    line_no: usize,
    in_comment: &mut bool,
    entries: &mut Vec<BlockEntry>,
    unparsed: &mut Vec<UnparsedEntry>,
) {
    let mut rest = line.trim();

    loop {
        if *in_comment {
            match rest.find("*/") {
                Some(end) => {
                    *in_comment = false;
                    rest = rest[end + 2..].trim_start();
                }
                None => return,
            }
        }

        if rest.is_empty() || rest.starts_with("//") {
            return;
        }
        if let Some(after) = rest.strip_prefix("/*") {
            *in_comment = true;
            rest = after;
            continue;
        }

        match parse_entry(rest) {
            Ok((key, value, remaining)) => {
                entries.push(BlockEntry {
                    key,
                    value,
                    line: line_no,
                });
                rest = remaining.trim_start();
            }
            Err(reason) => {
                unparsed.push(UnparsedEntry {
                    line: line_no,
                    text: line.trim().to_string(),
                    reason,
                });
                return;
            }
        }
    }
}


/// `KEY ':' VALUE ','` → (key, value, remaining input)
fn parse_entry(input: &str) -> Result<(String, BlockValue, &str), String> {
    let (key, rest) = match parse_quoted(input)? {
        Some((key, rest)) => (key, rest),
        None => match parse_identifier(input) {
            Some((key, rest)) => (key, rest),
            None => return Err("expected a key".to_string()),
        },
    };

    let rest = rest.trim_start();
    let rest = rest
        .strip_prefix(':')
        .ok_or_else(|| format!("expected ':' after key '{key}'"))?
        .trim_start();

    let (value, rest) = match parse_quoted(rest)? {
        Some((value, rest)) => (BlockValue::Quoted(value), rest),
        None => match parse_identifier(rest) {
            Some((value, rest)) => (BlockValue::Identifier(value), rest),
            None => return Err(format!("expected a value for key '{key}'")),
        },
    };

    let rest = rest
        .trim_start()
        .strip_prefix(',')
        .ok_or_else(|| format!("missing ',' after entry '{key}'"))?;

    Ok((key, value, rest))
}

/// Quoted string with matching `'` or `"`; Ok(None) if input is not quoted
fn parse_quoted(input: &str) -> Result<Option<(String, &str)>, String> {
    let quote = match input.chars().next() {
        Some(q @ ('\'' | '"')) => q,
        _ => return Ok(None),
    };
    let body = &input[1..];
    match body.find(quote) {
        Some(end) => Ok(Some((body[..end].to_string(), &body[end + 1..]))),
        None => Err("unterminated string".to_string()),
    }
}

fn parse_identifier(input: &str) -> Option<(String, &str)> {
    let end = input
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    if end == 0 {
        None
    } else {
        Some((input[..end].to_string(), &input[end..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "\
import React from 'react';

export const SERVICE_COMPONENT_MAP: Record<string, React.FC> = {
  // ==== AUTOMATIONS ====
  'auto-lead-response': AutoLeadResponseSpec,
  'auto-crm-update': AutoCRMUpdateSpec, // trailing note
  'impl-crm': ImplCrmSpec, 'impl-erp': ImplErpSpec,
};

export const SERVICE_CATEGORY_MAP: Record<string, string> = {
  'auto-lead-response': 'automations',
  'impl-crm': 'systemImplementations'
  'impl-erp': 'systemImplementations',
};
";

    #[test]
    fn isolates_named_block_in_source_order() {
        let block = parse_block(SOURCE, "SERVICE_COMPONENT_MAP").unwrap();
        let keys: Vec<_> = block.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["auto-lead-response", "auto-crm-update", "impl-crm", "impl-erp"]
        );
        assert_eq!(block.header_line, 3);
        assert_eq!(block.entries[0].line, 5);
        assert_eq!(
            block.entries[1].value,
            BlockValue::Identifier("AutoCRMUpdateSpec".to_string())
        );
        assert!(block.unparsed.is_empty());
    }

    #[test]
    fn reports_line_missing_trailing_comma() {
        let block = parse_block(SOURCE, "SERVICE_CATEGORY_MAP").unwrap();
        assert_eq!(block.entries.len(), 2);
        assert_eq!(block.unparsed.len(), 1);
        assert_eq!(block.unparsed[0].line, 12);
        assert!(block.unparsed[0].reason.contains("missing ','"));
    }

    #[test]
    fn name_prefix_does_not_match_longer_declaration() {
        let source = "export const MAP_EXTRA = {\n  'a': B,\n};\n";
        assert_eq!(
            parse_block(source, "MAP"),
            Err(BlockError::MissingHeader {
                name: "MAP".to_string()
            })
        );
    }

    #[test]
    fn missing_close_does_not_run_into_sibling() {
        let source = "export const A = {\n  'a': X,\nexport const B = {\n  'b': Y,\n};\n";
        assert_eq!(
            parse_block(source, "A"),
            Err(BlockError::Unterminated {
                name: "A".to_string(),
                header_line: 1
            })
        );
    }

    #[test]
    fn empty_inline_block() {
        let block = parse_block("const EMPTY = {};\n", "EMPTY").unwrap();
        assert!(block.entries.is_empty());
        assert!(block.unparsed.is_empty());
    }

    #[test]
    fn indented_brace_does_not_close_block() {
        let source = "const M = {\n  'a': X,\n  },\n  'b': Y,\n};\n";
        let block = parse_block(source, "M").unwrap();
        assert_eq!(block.entries.len(), 2);
        assert_eq!(block.unparsed.len(), 1);
    }

    fn keys(block: &Block) -> Vec<&str> {
        block.entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn leading_block_comment_keeps_entry() {
        let source = "const M = {\n  /* legacy */ 'a-1': CompA,\n  'a-2': CompB,\n};\n";
        let block = parse_block(source, "M").unwrap();
        assert_eq!(keys(&block), vec!["a-1", "a-2"]);
        assert_eq!(block.entries[0].line, 2);
        assert!(block.unparsed.is_empty());
    }

    #[test]
    fn multi_line_block_comment_is_skipped() {
        let source = "const M = {\n  /*\n    Services 41-49\n}\n  */\n  'a-1': CompA,\n};\n";
        let block = parse_block(source, "M").unwrap();
        assert_eq!(keys(&block), vec!["a-1"]);
        assert_eq!(block.entries[0].line, 6);
        assert!(block.unparsed.is_empty());
    }

    #[test]
    fn trailing_block_comment_after_entry() {
        let source = "const M = {\n  'a-1': CompA, /* note */\n  'a-2': CompB, /* spans\n  lines */ 'a-3': CompC,\n};\n";
        let block = parse_block(source, "M").unwrap();
        assert_eq!(keys(&block), vec!["a-1", "a-2", "a-3"]);
        assert_eq!(block.entries[2].line, 4);
        assert!(block.unparsed.is_empty());
    }

    #[test]
    fn text_after_closed_comment_is_still_checked() {
        let source = "const M = {\n  /* legacy */ 'a-1' CompA,\n};\n";
        let block = parse_block(source, "M").unwrap();
        assert!(block.entries.is_empty());
        assert_eq!(block.unparsed.len(), 1);
        assert_eq!(block.unparsed[0].line, 2);
        assert!(block.unparsed[0].reason.contains("expected ':'"));
    }

    #[test]
    fn unclosed_comment_leaves_block_unterminated() {
        let source = "const M = {\n  'a-1': CompA,\n  /* never closed\n};\n";
        assert_eq!(
            parse_block(source, "M"),
            Err(BlockError::Unterminated {
                name: "M".to_string(),
                header_line: 1
            })
        );
    }
}
