//! Core API for hotcheck
//!
//! This crate defines the types shared by the import extractors and the
//! dynamic-import checker:
//! - [`ImportRecord`] and [`ModuleSpecifier`], the output of an extractor
//! - [`ImportExtractor`], the pluggable parsing seam (one per source language)
//! - [`SourceReader`], the pluggable file access seam
//! - [`HotcheckError`], the error taxonomy

use async_trait::async_trait;
use std::path::Path;

pub mod error;
pub mod import;

pub use error::{HotcheckError, HotcheckResult};
pub use import::{ImportRecord, ModuleSpecifier, SpecifierKind};

/// Extracts the import statements of one source file.
///
/// Implementations perform static analysis only and must return an empty
/// vector for sources without imports. Unparseable sources fail with
/// [`HotcheckError::Parse`].
pub trait ImportExtractor: Send + Sync {
    /// Parse `source` and return its imports in source order.
    ///
    /// `path` is only used to pick the language dialect and to label errors.
    fn extract(&self, source: &str, path: Option<&Path>) -> HotcheckResult<Vec<ImportRecord>>;
}

/// Reads the full text of a source file.
#[async_trait]
pub trait SourceReader: Send + Sync {
    /// Fails with [`HotcheckError::FileRead`] when the file is missing or unreadable.
    async fn read_source(&self, path: &Path) -> HotcheckResult<String>;
}
