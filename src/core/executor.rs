//! Import executor.
//!
//! Moves a fully specified import session's source directory into the
//! archive with a single rename:
//! - the destination disk directory must not exist
//! - the title directory is created if needed
//! - `tmdb.txt` is written only if the title has none yet

use crate::core::store::SessionStore;
use crate::core::workflow::{self, Destination};
use crate::models::media::TMDB_ID_FILE;
use crate::models::session::{ImportSession, Placement};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of a successful import.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Title directory holding the imported disk.
    pub title_dir: PathBuf,
    /// New location of the disk.
    pub disk_dir: PathBuf,
    /// Whether the title directory was created by this import.
    pub created_title: bool,
    /// Non-fatal problems after the move succeeded.
    pub warnings: Vec<String>,
}

/// Execute an import session against the archive root.
///
/// On error nothing has been moved and the session can be retried.
pub fn execute(session: &ImportSession, media_root: &Path) -> Result<ImportOutcome> {
    let Destination { title_dir, disk_dir } = workflow::destination(session, media_root)?;
    let source = &session.source.path;

    // Preconditions: nothing is touched until all of these hold.
    if fs::symlink_metadata(&disk_dir).is_ok() {
        return Err(Error::DestinationExists(disk_dir));
    }
    if matches!(session.placement, Some(Placement::Existing { .. })) && !title_dir.is_dir() {
        return Err(Error::ExistingTitleMissing(title_dir));
    }
    if !source.is_dir() {
        return Err(Error::PathNotFound(source.display().to_string()));
    }

    let created_title = !title_dir.exists();
    if created_title {
        fs::create_dir_all(&title_dir)?;
        tracing::debug!("Created title directory: {:?}", title_dir);
    }

    if let Err(e) = fs::rename(source, &disk_dir) {
        if created_title {
            // Only succeeds while still empty.
            let _ = fs::remove_dir(&title_dir);
        }
        return Err(Error::Move {
            from: source.clone(),
            to: disk_dir,
            source: e,
        });
    }
    tracing::info!("Imported {:?} -> {:?}", source, disk_dir);

    let mut warnings = Vec::new();
    if let Some(tmdb_id) = session.tmdb_id.as_deref() {
        if let Err(e) = write_tmdb_id(&title_dir, tmdb_id) {
            tracing::warn!("Failed to write {} in {:?}: {}", TMDB_ID_FILE, title_dir, e);
            warnings.push(format!("Failed to write {}: {}", TMDB_ID_FILE, e));
        }
    }

    Ok(ImportOutcome {
        title_dir,
        disk_dir,
        created_title,
        warnings,
    })
}

/// Write the identifier sidecar unless one already exists.
fn write_tmdb_id(title_dir: &Path, tmdb_id: &str) -> Result<()> {
    let path = title_dir.join(TMDB_ID_FILE);
    if path.exists() {
        tracing::debug!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(&path, tmdb_id)?;
    Ok(())
}

/// Execute a stored session, deleting it from the store on success.
pub fn execute_stored(store: &SessionStore, id: &str, media_root: &Path) -> Result<ImportOutcome> {
    let session = store
        .get(id)
        .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
    let outcome = execute(&session, media_root)?;
    store.delete(id);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::SourceDirectory;

    #[test]
    fn test_incomplete_session_rejected() {
        let session = ImportSession::new(
            SourceDirectory {
                name: "X".to_string(),
                path: PathBuf::from("/nonexistent/X"),
                size: 0,
            },
            None,
        );
        assert!(matches!(
            execute(&session, Path::new("/nonexistent")),
            Err(Error::IncompleteSession(_))
        ));
    }
}
