//! File system utilities.

use crate::Result;
use std::path::Path;
use walkdir::WalkDir;

/// Check if a path exists and is a directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(crate::Error::NotADirectory(path.display().to_string()));
    }
    Ok(())
}

/// Sum the sizes of all regular files below `path`.
///
/// Symlinks are not followed. Any unreadable entry fails the whole walk so
/// callers can decide how to degrade.
pub fn dir_size(path: &Path) -> Result<u64> {
    let mut total = 0u64;
    for entry in WalkDir::new(path).follow_links(false) {
        let entry = entry.map_err(|e| {
            e.into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop"))
        })?;
        if entry.file_type().is_file() {
            total += entry.metadata().map_err(|e| {
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("metadata unavailable"))
            })?.len();
        }
    }
    Ok(total)
}

/// Names of the immediate subdirectories of `path`, in listing order.
///
/// Names that are not valid UTF-8 are skipped: they cannot be joined back
/// onto `path` after a lossy conversion.
pub fn subdirectories(path: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => tracing::debug!("Skipping non-UTF-8 directory name: {:?}", raw),
        }
    }
    Ok(names)
}

/// Read a sidecar text file, trimmed. Missing or unreadable files yield `None`.
pub fn read_sidecar(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_dir_size_sums_nested_files() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("BDMV").join("STREAM");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("00001.m2ts"), vec![0u8; 1000]).unwrap();
        fs::write(temp_dir.path().join("index.bdmv"), vec![0u8; 24]).unwrap();

        assert_eq!(dir_size(temp_dir.path()).unwrap(), 1024);
    }

    #[test]
    fn test_dir_size_missing_path() {
        assert!(dir_size(Path::new("/nonexistent/shelf/disk")).is_err());
    }

    #[test]
    fn test_read_sidecar_trims() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tmdb.txt");
        fs::write(&path, "  603\n").unwrap();

        assert_eq!(read_sidecar(&path).as_deref(), Some("603"));
        assert_eq!(read_sidecar(&temp_dir.path().join("missing.txt")), None);
    }

    #[test]
    fn test_subdirectories_lists_dirs_only() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("Disk [DVD]")).unwrap();
        fs::write(temp_dir.path().join("sizes.json"), "{}").unwrap();

        assert_eq!(subdirectories(temp_dir.path()).unwrap(), vec!["Disk [DVD]"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_subdirectories_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let raw = temp_dir.path().join(OsStr::from_bytes(b"DISC\xff"));
        if fs::create_dir(&raw).is_err() {
            // Filesystem refuses non-UTF-8 names.
            return;
        }
        fs::create_dir(temp_dir.path().join("DISC")).unwrap();

        assert_eq!(subdirectories(temp_dir.path()).unwrap(), vec!["DISC"]);
    }

    #[test]
    fn test_ensure_directory_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(matches!(
            ensure_directory(&file),
            Err(crate::Error::NotADirectory(_))
        ));
    }
}
