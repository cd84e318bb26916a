//! Source extractors
//!
//! Five independent readers, one per raw source:
//! 1. Component map - `SERVICE_COMPONENT_MAP` block of the mapping source
//! 2. Category map - `SERVICE_CATEGORY_MAP` block of the mapping source
//! 3. Artifacts - generated files under the components root
//! 4. Interfaces - suffixed declarations in each category's types file
//! 5. Imports - `import { Name } from 'Path'` lines of the mapping source
//!
//! Extractors share no state and may run in parallel.

pub mod artifacts;
pub mod block_parser;
pub mod imports;
pub mod interfaces;
pub mod mapping;

pub use artifacts::ArtifactScanner;
pub use block_parser::{parse_block, Block, BlockEntry, BlockError, BlockValue};
pub use imports::{extract_imports, extract_imports_file};
pub use interfaces::{extract_interfaces, InterfaceScanner};
pub use mapping::{extract_mapping, extract_mapping_file, ValueKind};

use crate::error::ExtractError;
use crate::types::SourceKind;
use std::io::ErrorKind;
use std::path::Path;

/// Read a whole source file
///
/// The handle is scoped to this call and released on every exit path.
pub(crate) fn read_source(path: &Path, source_kind: SourceKind) -> Result<String, ExtractError> {
    std::fs::read_to_string(path).map_err(|error| {
        if error.kind() == ErrorKind::NotFound {
            ExtractError::MissingSource {
                source_kind,
                path: path.to_path_buf(),
            }
        } else {
            ExtractError::Io {
                source_kind,
                path: path.to_path_buf(),
                error,
            }
        }
    })
}
