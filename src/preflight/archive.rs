//! Archive and inbox directory checks.

use super::CheckResult;
use crate::utils::fs::ensure_directory;
use std::path::Path;

/// The archive root must exist and be a directory.
pub fn check_media_dir(path: &Path) -> CheckResult {
    match ensure_directory(path) {
        Ok(()) => CheckResult::ok("Media directory", path.display().to_string()),
        Err(e) => CheckResult::fail(
            "Media directory",
            e.to_string(),
            "Set MEDIA_DIR or pass --media-dir",
        ),
    }
}

/// The inbox is optional, but must be a directory when configured.
pub fn check_import_dir(path: Option<&Path>) -> CheckResult {
    match path {
        None => CheckResult::ok("Import directory", "not configured, import disabled"),
        Some(path) => match ensure_directory(path) {
            Ok(()) => CheckResult::ok("Import directory", path.display().to_string()),
            Err(e) => CheckResult::fail(
                "Import directory",
                e.to_string(),
                "Set IMPORT_DIR or pass --import-dir",
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_check_media_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(check_media_dir(temp_dir.path()).passed());
        assert!(!check_media_dir(&temp_dir.path().join("missing")).passed());
    }

    #[test]
    fn test_import_dir_optional() {
        assert!(check_import_dir(None).passed());
        assert!(!check_import_dir(Some(Path::new("/nonexistent/inbox"))).passed());
    }
}
