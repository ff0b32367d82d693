//! Validation that a reloadable module is reached through a dynamic `import()`
//!
//! Static imports are bound when the parent module is linked and cannot be
//! swapped afterwards, so a module can only be hot-reloaded when its parent
//! loads it with an `import()` expression. [`DynamicImportChecker`] answers
//! that question per (parent file, specifier) pair and memoizes the answer
//! until the parent is invalidated.

use crate::cache::{CacheStats, ValidationCache};
use crate::reader::FsSourceReader;
use hotcheck_api::{HotcheckError, HotcheckResult, ImportExtractor, SourceReader};
use hotcheck_config::AppConfig;
use hotcheck_lang_typescript::SwcImportExtractor;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Checks, with caching, that specifiers are imported dynamically from their parent file
pub struct DynamicImportChecker {
    project_root: PathBuf,
    reader: Arc<dyn SourceReader>,
    extractor: Arc<dyn ImportExtractor>,
    cache: ValidationCache,
}

impl fmt::Debug for DynamicImportChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicImportChecker")
            .field("project_root", &self.project_root)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl DynamicImportChecker {
    /// Checker reading from disk and parsing with SWC
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self::with_components(
            project_root,
            Arc::new(FsSourceReader),
            Arc::new(SwcImportExtractor::new()),
        )
    }

    /// Checker rooted at the configured project root
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.project_root.clone())
    }

    /// Checker with custom file access and import extraction
    pub fn with_components(
        project_root: impl Into<PathBuf>,
        reader: Arc<dyn SourceReader>,
        extractor: Arc<dyn ImportExtractor>,
    ) -> Self {
        let project_root = project_root.into();
        debug!(project_root = %project_root.display(), "DynamicImportChecker initialized");
        Self {
            project_root,
            reader,
            extractor,
            cache: ValidationCache::new(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Whether `parent_path` imports `specifier` through a dynamic `import()`.
    ///
    /// A recorded answer is returned without touching the file. Otherwise the
    /// parent is read and parsed once and the answer, positive or negative,
    /// is recorded. Read and parse failures are returned as-is and leave the
    /// cache untouched.
    pub async fn is_dynamic(&self, parent_path: &Path, specifier: &str) -> HotcheckResult<bool> {
        if let Some(cached) = self.cache.get(parent_path, specifier) {
            debug!(
                parent = %parent_path.display(),
                specifier,
                is_dynamic = cached,
                "Using cached import check"
            );
            return Ok(cached);
        }

        let source = self.reader.read_source(parent_path).await?;
        let imports = self.extractor.extract(&source, Some(parent_path))?;

        let is_dynamic = imports
            .iter()
            .any(|record| record.is_dynamic_import_of(specifier));

        debug!(
            parent = %parent_path.display(),
            specifier,
            imports = imports.len(),
            is_dynamic,
            "Checked imports of parent file"
        );

        self.cache
            .insert(parent_path.to_path_buf(), specifier.to_string(), is_dynamic);

        Ok(is_dynamic)
    }

    /// Fail with [`HotcheckError::NotDynamicallyImported`] unless `parent_path`
    /// imports `specifier` through a dynamic `import()`.
    ///
    /// Negative answers are cached like positive ones, so repeated checks of
    /// an offending pair fail without re-reading the parent.
    pub async fn ensure_dynamic(&self, parent_path: &Path, specifier: &str) -> HotcheckResult<()> {
        if self.is_dynamic(parent_path, specifier).await? {
            return Ok(());
        }

        let parent = self.relative_display(parent_path);
        warn!(
            parent = %parent,
            specifier,
            "Module is not imported dynamically and cannot be hot-reloaded"
        );
        Err(HotcheckError::not_dynamically_imported(specifier, parent))
    }

    /// Forget every answer recorded for `parent_path`, typically after it changed on disk
    pub fn invalidate_cache(&self, parent_path: &Path) {
        self.cache.invalidate(parent_path);
    }

    /// Forget every recorded answer
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Whether an answer is recorded for the pair
    pub fn is_cached(&self, parent_path: &Path, specifier: &str) -> bool {
        self.cache.contains(parent_path, specifier)
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn relative_display(&self, path: &Path) -> String {
        pathdiff::diff_paths(path, &self.project_root)
            .unwrap_or_else(|| path.to_path_buf())
            .display()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hotcheck_api::ImportRecord;
    use mockall::mock;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    mock! {
        pub Reader {}

        #[async_trait]
        impl SourceReader for Reader {
            async fn read_source(&self, path: &Path) -> HotcheckResult<String>;
        }
    }

    /// SWC extractor that counts how often it is asked to parse
    #[derive(Default)]
    struct CountingExtractor {
        calls: AtomicUsize,
    }

    impl ImportExtractor for CountingExtractor {
        fn extract(&self, source: &str, path: Option<&Path>) -> HotcheckResult<Vec<ImportRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            SwcImportExtractor.extract(source, path)
        }
    }

    fn checker_with(
        source: &'static str,
        expected_reads: usize,
    ) -> (DynamicImportChecker, Arc<CountingExtractor>) {
        let mut reader = MockReader::new();
        reader
            .expect_read_source()
            .times(expected_reads)
            .returning(move |_| Ok(source.to_string()));

        let extractor = Arc::new(CountingExtractor::default());
        let checker = DynamicImportChecker::with_components(
            "/project",
            Arc::new(reader),
            extractor.clone(),
        );
        (checker, extractor)
    }

    #[tokio::test]
    async fn test_dynamic_import_reads_once() {
        let (checker, extractor) = checker_with("export const load = () => import('./plugin.js');\n", 1);
        let parent = Path::new("/project/src/app.ts");

        checker.ensure_dynamic(parent, "./plugin.js").await.unwrap();
        checker.ensure_dynamic(parent, "./plugin.js").await.unwrap();
        assert!(checker.is_dynamic(parent, "./plugin.js").await.unwrap());

        assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
        assert_eq!(checker.stats().hits, 2);
        assert_eq!(checker.stats().misses, 1);
    }

    #[tokio::test]
    async fn test_static_import_fails_fast_from_cache() {
        let (checker, extractor) = checker_with("import plugin from './plugin.js';\n", 1);
        let parent = Path::new("/project/src/app.ts");

        for _ in 0..3 {
            let err = checker.ensure_dynamic(parent, "./plugin.js").await.unwrap_err();
            assert!(err.is_not_dynamically_imported());
        }

        assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
        assert!(checker.is_cached(parent, "./plugin.js"));
    }

    #[tokio::test]
    async fn test_each_specifier_is_checked_separately() {
        let (checker, extractor) = checker_with(
            "import a from './a.js';\nconst b = () => import('./b.js');\n",
            2,
        );
        let parent = Path::new("/project/index.js");

        assert!(!checker.is_dynamic(parent, "./a.js").await.unwrap());
        assert!(checker.is_dynamic(parent, "./b.js").await.unwrap());
        assert!(!checker.is_dynamic(parent, "./a.js").await.unwrap());

        assert_eq!(extractor.calls.load(Ordering::SeqCst), 2);
        assert_eq!(checker.stats().current_entries, 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reread() {
        let (checker, extractor) = checker_with("import('./plugin.js');\n", 2);
        let parent = Path::new("/project/src/app.ts");

        checker.ensure_dynamic(parent, "./plugin.js").await.unwrap();
        checker.invalidate_cache(parent);
        assert!(!checker.is_cached(parent, "./plugin.js"));
        checker.ensure_dynamic(parent, "./plugin.js").await.unwrap();

        assert_eq!(extractor.calls.load(Ordering::SeqCst), 2);
        assert_eq!(checker.stats().invalidations, 1);
    }

    #[tokio::test]
    async fn test_read_failure_is_not_cached() {
        let mut reader = MockReader::new();
        reader.expect_read_source().times(2).returning(|path| {
            Err(HotcheckError::file_read(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            ))
        });
        let checker = DynamicImportChecker::with_components(
            "/project",
            Arc::new(reader),
            Arc::new(SwcImportExtractor),
        );
        let parent = Path::new("/project/locked.ts");

        for _ in 0..2 {
            let err = checker.ensure_dynamic(parent, "./a.js").await.unwrap_err();
            assert!(matches!(err, HotcheckError::FileRead { .. }));
        }
        assert!(!checker.is_cached(parent, "./a.js"));
        assert_eq!(checker.stats().inserts, 0);
    }

    #[tokio::test]
    async fn test_error_message_uses_project_relative_path() {
        let (checker, _) = checker_with("export {};\n", 1);

        let err = checker
            .ensure_dynamic(Path::new("/project/src/routes/index.ts"), "./missing.js")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "The import \"./missing.js\" is not imported dynamically from src/routes/index.ts.\n\
             You must use a dynamic import() to make it reloadable (HMR)."
        );
    }

    #[test]
    fn test_from_config_uses_project_root() {
        let config = AppConfig::with_project_root("/srv/app");
        let checker = DynamicImportChecker::from_config(&config);
        assert_eq!(checker.project_root(), Path::new("/srv/app"));
        assert_eq!(checker.stats(), CacheStats::default());
    }
}
