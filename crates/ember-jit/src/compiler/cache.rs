//! Compile cache for lowered callables
//!
//! Lowered text indexed by declared callable name. Entries live as long as
//! the cache does; there is no eviction and no invalidation. Only successful
//! lowerings are inserted.

use std::sync::Arc;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Name-keyed store of lowered callables
pub trait CompileCache {
    /// Look up previously lowered text for `name`
    fn get(&self, name: &str) -> Option<String>;

    /// Record lowered text for `name`
    fn insert(&mut self, name: String, code: String);

    /// Number of cached callables
    fn len(&self) -> usize;

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Single-threaded cache owned by one compiler
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: FxHashMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompileCache for MemoryCache {
    fn get(&self, name: &str) -> Option<String> {
        self.entries.get(name).cloned()
    }

    fn insert(&mut self, name: String, code: String) {
        self.entries.insert(name, code);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

/// Thread-safe cache shared by several compilers
///
/// Cloning yields another handle to the same entries. Two threads lowering
/// the same name at once may both compute it; the second insert wins. Callers
/// that need compute-once semantics must coordinate above this layer.
#[derive(Debug, Clone, Default)]
pub struct SharedCache {
    entries: Arc<RwLock<FxHashMap<String, String>>>,
}

impl SharedCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompileCache for SharedCache {
    fn get(&self, name: &str) -> Option<String> {
        self.entries.read().get(name).cloned()
    }

    fn insert(&mut self, name: String, code: String) {
        self.entries.write().insert(name, code);
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_insert_and_get() {
        let mut cache = MemoryCache::new();
        assert!(cache.is_empty());
        assert!(!cache.contains("f"));

        cache.insert("f".to_string(), "function f() {\n}".to_string());
        assert!(cache.contains("f"));
        assert_eq!(cache.get("f").as_deref(), Some("function f() {\n}"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_replace_entry() {
        let mut cache = MemoryCache::new();
        cache.insert("f".to_string(), "a".to_string());
        cache.insert("f".to_string(), "b".to_string());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("f").as_deref(), Some("b"));
    }

    #[test]
    fn test_shared_handles_see_same_entries() {
        let mut a = SharedCache::new();
        let b = a.clone();
        a.insert("g".to_string(), "text".to_string());
        assert!(b.contains("g"));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = SharedCache::new();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let mut cache = cache.clone();
                std::thread::spawn(move || cache.insert(format!("f{}", i), String::new()))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 4);
    }
}
