//! Cached validation that hot-reloadable modules are imported dynamically
//!
//! A file watcher or module-graph builder calls
//! [`DynamicImportChecker::ensure_dynamic`] before marking a module as
//! hot-reloadable, and [`DynamicImportChecker::invalidate_cache`] whenever a
//! parent file changes on disk.

pub mod cache;
pub mod checker;
pub mod reader;

pub use cache::{CacheStats, ValidationCache};
pub use checker::DynamicImportChecker;
pub use hotcheck_api::{HotcheckError, HotcheckResult, ImportExtractor, ImportRecord, SourceReader};
pub use reader::FsSourceReader;
