//! TypeScript/JavaScript import extraction for hotcheck

pub mod parser;

use hotcheck_api::{HotcheckResult, ImportExtractor, ImportRecord};
use std::path::Path;

/// File extensions handled by [`SwcImportExtractor`]
pub const EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// [`ImportExtractor`] backed by the SWC ECMAScript/TypeScript parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwcImportExtractor;

impl SwcImportExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Whether the file extension of `path` is one this extractor understands
    pub fn handles(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EXTENSIONS.contains(&ext))
    }
}

impl ImportExtractor for SwcImportExtractor {
    fn extract(&self, source: &str, path: Option<&Path>) -> HotcheckResult<Vec<ImportRecord>> {
        parser::parse_imports(source, path)
    }
}
