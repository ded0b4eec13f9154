//! Shared registry of loaded segmenters.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use ahash::AHashMap;
use parking_lot::Mutex;

use super::{DictionaryLoader, FileDictionaryLoader, Segmenter};
use crate::error::{Result, SegoError};

/// Maps dictionary identifiers to loaded segmenters.
///
/// Each distinct identifier is loaded at most once, even when several threads
/// acquire it for the first time concurrently; every caller afterwards gets
/// the same shared handle. Handles are never reloaded, so changes to the
/// underlying files are not picked up for the lifetime of the cache.
///
/// # Examples
///
/// ```no_run
/// use sego_analysis::segmenter::SegmenterCache;
///
/// let cache = SegmenterCache::default();
/// let first = cache.acquire("dict.txt").unwrap();
/// let second = cache.acquire("dict.txt").unwrap();
/// assert_eq!(cache.len(), 1);
/// ```
pub struct SegmenterCache {
    loader: Arc<dyn DictionaryLoader>,
    segmenters: Mutex<AHashMap<String, Arc<dyn Segmenter>>>,
}

impl SegmenterCache {
    /// Create a cache that loads dictionaries with `loader`.
    pub fn new(loader: Arc<dyn DictionaryLoader>) -> Self {
        SegmenterCache {
            loader,
            segmenters: Mutex::new(AHashMap::new()),
        }
    }

    /// Return the segmenter for `files`, loading it on first use.
    ///
    /// Load failures are returned to the caller and nothing is cached, so a
    /// later call retries the load.
    pub fn acquire(&self, files: &str) -> Result<Arc<dyn Segmenter>> {
        if files.trim().is_empty() {
            return Err(SegoError::configuration("dictionary file paths required"));
        }

        let mut segmenters = self.segmenters.lock();
        if let Some(segmenter) = segmenters.get(files) {
            log::debug!("reusing segmenter for '{files}'");
            return Ok(Arc::clone(segmenter));
        }

        let started = Instant::now();
        let segmenter = self.loader.load(files).map_err(|e| match e {
            SegoError::DictionaryLoad(_) => e,
            other => SegoError::dictionary_load(format!("{files}: {other}")),
        })?;
        log::info!(
            "loaded dictionary '{}' in {} ms",
            files,
            started.elapsed().as_millis()
        );

        segmenters.insert(files.to_string(), Arc::clone(&segmenter));
        Ok(segmenter)
    }

    /// Whether a segmenter for `files` has already been loaded.
    pub fn contains(&self, files: &str) -> bool {
        self.segmenters.lock().contains_key(files)
    }

    /// Number of loaded dictionaries.
    pub fn len(&self) -> usize {
        self.segmenters.lock().len()
    }

    /// Whether no dictionary has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.segmenters.lock().is_empty()
    }
}

impl Default for SegmenterCache {
    fn default() -> Self {
        Self::new(Arc::new(FileDictionaryLoader::new()))
    }
}

impl fmt::Debug for SegmenterCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segmenters = self.segmenters.lock();
        f.debug_struct("SegmenterCache")
            .field("dictionaries", &segmenters.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;
    use crate::segmenter::Segment;

    struct NoopSegmenter;

    impl Segmenter for NoopSegmenter {
        fn segment(&self, _input: &[u8]) -> Vec<Segment> {
            Vec::new()
        }
    }

    #[derive(Default)]
    struct CountingLoader {
        loads: AtomicUsize,
    }

    impl DictionaryLoader for CountingLoader {
        fn load(&self, files: &str) -> Result<Arc<dyn Segmenter>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if files == "broken.txt" {
                return Err(SegoError::dictionary_load("broken.txt: unreadable"));
            }
            Ok(Arc::new(NoopSegmenter))
        }
    }

    #[test]
    fn test_acquire_loads_once() {
        let loader = Arc::new(CountingLoader::default());
        let cache = SegmenterCache::new(loader.clone());

        let first = cache.acquire("dict.txt").unwrap();
        let second = cache.acquire("dict.txt").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
        assert!(cache.contains("dict.txt"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_identifiers_load_separately() {
        let loader = Arc::new(CountingLoader::default());
        let cache = SegmenterCache::new(loader.clone());

        cache.acquire("a.txt").unwrap();
        cache.acquire("a.txt,b.txt").unwrap();

        assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_concurrent_acquire_loads_once() {
        let loader = Arc::new(CountingLoader::default());
        let cache = Arc::new(SegmenterCache::new(loader.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.acquire("dict.txt").map(|_| ()))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_load_failure_is_not_cached() {
        let loader = Arc::new(CountingLoader::default());
        let cache = SegmenterCache::new(loader.clone());

        assert!(cache.acquire("broken.txt").err().unwrap().is_dictionary_load());
        assert!(cache.acquire("broken.txt").is_err());

        assert!(!cache.contains("broken.txt"));
        assert!(cache.is_empty());
        assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_identifier_is_rejected() {
        let loader = Arc::new(CountingLoader::default());
        let cache = SegmenterCache::new(loader.clone());

        assert!(cache.acquire("").err().unwrap().is_configuration());
        assert!(cache.acquire("   ").err().unwrap().is_configuration());
        assert_eq!(loader.loads.load(Ordering::SeqCst), 0);
    }
}
