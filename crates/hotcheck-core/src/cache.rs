//! Per-file cache of dynamic-import validation results

use dashmap::DashMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Cache statistics for monitoring and debugging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub inserts: u64,
    /// Number of cached (parent, specifier) pairs
    pub current_entries: usize,
}

impl CacheStats {
    /// Cache hit ratio as a percentage
    pub fn hit_ratio(&self) -> f64 {
        let total = (self.hits + self.misses) as f64;
        if total == 0.0 {
            0.0
        } else {
            (self.hits as f64 / total) * 100.0
        }
    }
}

/// Thread-safe two-level cache: parent file path -> (specifier -> result).
///
/// Entries never expire. They only go away through [`ValidationCache::invalidate`]
/// or [`ValidationCache::clear`].
#[derive(Debug, Default)]
pub struct ValidationCache {
    entries: DashMap<PathBuf, HashMap<String, bool>>,
    stats: DashMap<&'static str, u64>,
}

impl ValidationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a recorded result, counting the hit or miss
    pub fn get(&self, parent: &Path, specifier: &str) -> Option<bool> {
        let cached = self
            .entries
            .get(parent)
            .and_then(|specifiers| specifiers.get(specifier).copied());

        match cached {
            Some(_) => {
                self.increment_stat("hits");
                trace!(parent = %parent.display(), specifier, "Cache hit");
            }
            None => {
                self.increment_stat("misses");
                trace!(parent = %parent.display(), specifier, "Cache miss");
            }
        }

        cached
    }

    /// Whether a result is recorded, without touching statistics
    pub fn contains(&self, parent: &Path, specifier: &str) -> bool {
        self.entries
            .get(parent)
            .is_some_and(|specifiers| specifiers.contains_key(specifier))
    }

    /// Record a result, overwriting any previous value for the pair
    pub fn insert(&self, parent: PathBuf, specifier: String, is_dynamic: bool) {
        self.entries
            .entry(parent)
            .or_default()
            .insert(specifier, is_dynamic);
        self.increment_stat("inserts");
    }

    /// Drop every result recorded under `parent`. Returns whether anything was removed.
    pub fn invalidate(&self, parent: &Path) -> bool {
        match self.entries.remove(parent) {
            Some((_, specifiers)) => {
                self.increment_stat("invalidations");
                debug!(
                    parent = %parent.display(),
                    entries = specifiers.len(),
                    "Invalidated cached import checks"
                );
                true
            }
            None => false,
        }
    }

    /// Clear all cached entries
    pub fn clear(&self) {
        let count = self.entries.len();
        self.entries.clear();
        debug!("Cleared cached import checks for {} files", count);
    }

    /// Number of cached (parent, specifier) pairs
    pub fn len(&self) -> usize {
        self.entries.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.get_stat("hits"),
            misses: self.get_stat("misses"),
            invalidations: self.get_stat("invalidations"),
            inserts: self.get_stat("inserts"),
            current_entries: self.len(),
        }
    }

    fn increment_stat(&self, key: &'static str) {
        *self.stats.entry(key).or_insert(0) += 1;
    }

    fn get_stat(&self, key: &str) -> u64 {
        self.stats.get(key).map(|v| *v).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_and_get() {
        let cache = ValidationCache::new();
        let parent = PathBuf::from("/app/src/index.ts");

        assert_eq!(cache.get(&parent, "./a.js"), None);

        cache.insert(parent.clone(), "./a.js".to_string(), true);
        cache.insert(parent.clone(), "./b.js".to_string(), false);

        assert_eq!(cache.get(&parent, "./a.js"), Some(true));
        assert_eq!(cache.get(&parent, "./b.js"), Some(false));
        assert_eq!(cache.len(), 2);

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.inserts, 2);
        assert_eq!(stats.current_entries, 2);
    }

    #[test]
    fn test_invalidate_only_touches_one_parent() {
        let cache = ValidationCache::new();
        let first = PathBuf::from("/app/a.ts");
        let second = PathBuf::from("/app/b.ts");

        cache.insert(first.clone(), "./x.js".to_string(), true);
        cache.insert(first.clone(), "./y.js".to_string(), false);
        cache.insert(second.clone(), "./x.js".to_string(), true);

        assert!(cache.invalidate(&first));
        assert!(!cache.contains(&first, "./x.js"));
        assert!(!cache.contains(&first, "./y.js"));
        assert!(cache.contains(&second, "./x.js"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn test_invalidate_unknown_parent_is_noop() {
        let cache = ValidationCache::new();
        let known = PathBuf::from("/app/a.ts");
        cache.insert(known.clone(), "./x.js".to_string(), true);

        assert!(!cache.invalidate(Path::new("/app/never-seen.ts")));
        assert!(cache.contains(&known, "./x.js"));
        assert_eq!(cache.stats().invalidations, 0);
    }

    #[test]
    fn test_clear_and_hit_ratio() {
        let cache = ValidationCache::new();
        let parent = PathBuf::from("/app/a.ts");

        assert_eq!(cache.stats().hit_ratio(), 0.0);

        cache.insert(parent.clone(), "./x.js".to_string(), true);
        cache.get(&parent, "./x.js");
        cache.get(&parent, "./x.js");
        cache.get(&parent, "./x.js");
        cache.get(&parent, "./missing.js");
        assert_eq!(cache.stats().hit_ratio(), 75.0);

        cache.clear();
        assert!(cache.is_empty());
    }
}
