//! Per-title disk size cache.
//!
//! Each title directory may carry a `sizes.json` mapping disk directory names
//! to byte counts. Entries are trusted verbatim once present: archived disks
//! are assumed never to change size.

use crate::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Cache file name inside a title directory.
pub const SIZE_CACHE_FILE: &str = "sizes.json";

/// Disk directory name to size in bytes.
pub type SizeMap = HashMap<String, u64>;

fn cache_path(title_dir: &Path) -> PathBuf {
    title_dir.join(SIZE_CACHE_FILE)
}

/// Load the cache for a title directory.
///
/// A missing, unreadable or malformed file yields an empty map.
pub fn load(title_dir: &Path) -> SizeMap {
    let path = cache_path(title_dir);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return SizeMap::new(),
    };

    match serde_json::from_str(&content) {
        Ok(map) => map,
        Err(e) => {
            tracing::debug!("Discarding malformed size cache {:?}: {}", path, e);
            SizeMap::new()
        }
    }
}

/// Overwrite the cache for a title directory with pretty-printed JSON.
pub fn save(title_dir: &Path, sizes: &SizeMap) -> Result<()> {
    let json = serde_json::to_string_pretty(sizes)?;
    fs::write(cache_path(title_dir), json)?;
    Ok(())
}

/// Cache for one title directory, tracking whether it needs saving.
#[derive(Debug)]
pub struct SizeCache {
    title_dir: PathBuf,
    sizes: SizeMap,
    dirty: bool,
}

impl SizeCache {
    /// Load the cache for a title directory.
    pub fn open(title_dir: &Path) -> Self {
        Self {
            title_dir: title_dir.to_path_buf(),
            sizes: load(title_dir),
            dirty: false,
        }
    }

    /// Size of a disk directory: the cached value on a hit, otherwise the
    /// result of `measure`, which is recorded on success.
    ///
    /// A failed measurement degrades to zero and is not cached.
    pub fn resolve<F>(&mut self, disk_dir_name: &str, measure: F) -> u64
    where
        F: FnOnce() -> Result<u64>,
    {
        if let Some(&size) = self.sizes.get(disk_dir_name) {
            return size;
        }

        match measure() {
            Ok(size) => {
                self.sizes.insert(disk_dir_name.to_string(), size);
                self.dirty = true;
                size
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to measure {:?} in {:?}: {}",
                    disk_dir_name,
                    self.title_dir,
                    e
                );
                0
            }
        }
    }

    /// Whether any new entry has been recorded since loading.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Save once if anything changed. Failures are logged and ignored.
    pub fn flush(&mut self) {
        if !self.dirty {
            return;
        }
        match save(&self.title_dir, &self.sizes) {
            Ok(()) => self.dirty = false,
            Err(e) => {
                tracing::warn!("Failed to save size cache for {:?}: {}", self.title_dir, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(SIZE_CACHE_FILE), "{ not json").unwrap();
        assert!(load(temp_dir.path()).is_empty());

        fs::write(temp_dir.path().join(SIZE_CACHE_FILE), r#"{"Disk [DVD]": -4}"#).unwrap();
        assert!(load(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let mut sizes = SizeMap::new();
        sizes.insert("Disk [Blu-Ray]".to_string(), 42_000_000_000);
        save(temp_dir.path(), &sizes).unwrap();

        let content = fs::read_to_string(temp_dir.path().join(SIZE_CACHE_FILE)).unwrap();
        assert!(content.contains("\n  \"Disk [Blu-Ray]\": 42000000000"));
        assert_eq!(load(temp_dir.path()), sizes);
    }

    #[test]
    fn test_resolve_hit_skips_measurement() {
        let temp_dir = TempDir::new().unwrap();
        let mut sizes = SizeMap::new();
        sizes.insert("Disk [DVD]".to_string(), 7);
        save(temp_dir.path(), &sizes).unwrap();

        let mut cache = SizeCache::open(temp_dir.path());
        let size = cache.resolve("Disk [DVD]", || panic!("should not measure"));
        assert_eq!(size, 7);
        assert!(!cache.is_dirty());
    }

    #[test]
    fn test_resolve_miss_records_and_flushes() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = SizeCache::open(temp_dir.path());

        assert_eq!(cache.resolve("Disk [DVD]", || Ok(1234)), 1234);
        assert!(cache.is_dirty());
        cache.flush();
        assert!(!cache.is_dirty());

        assert_eq!(load(temp_dir.path()).get("Disk [DVD]"), Some(&1234));
    }

    #[test]
    fn test_resolve_failure_degrades_to_zero() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = SizeCache::open(temp_dir.path());

        let size = cache.resolve("Disk [DVD]", || {
            Err(crate::Error::PathNotFound("gone".to_string()))
        });
        assert_eq!(size, 0);
        assert!(!cache.is_dirty());
    }
}
