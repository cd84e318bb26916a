//! # Catalog Common Library
//!
//! Shared code for the catalog audit tooling:
//! - Configuration loading (TOML bootstrap + CLI/ENV overrides)
//! - Catalog expectations (expected counts, category → directory table)
//! - Common error types

pub mod config;
pub mod error;

pub use config::{
    AuditConfig, CatalogExpectations, CategorySpec, ConfigResolver, ConfigSource, LoggingConfig,
    SourceLayout,
};
pub use error::{Error, Result};
