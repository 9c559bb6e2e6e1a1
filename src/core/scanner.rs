//! Archive and inbox scanners.
//!
//! The archive scanner turns the encoded directory tree into catalog titles:
//! every immediate subdirectory whose name matches a title grammar becomes a
//! [`Title`], and its subdirectories matching the disk grammar become
//! [`Disk`]s. Anything else is skipped without complaint.

use crate::core::naming::{self, TitleDirName};
use crate::core::size_cache::SizeCache;
use crate::models::media::{Disk, DiskFormat, MediaKind, Title, TITLE_FILE, TMDB_ID_FILE};
use crate::models::session::SourceDirectory;
use crate::utils::fs::{dir_size, ensure_directory, read_sidecar, subdirectories};
use crate::Result;
use std::collections::HashMap;
use std::path::Path;

/// Scan the archive root into titles, in directory-listing order.
///
/// Fails only if the root itself is missing, not a directory or unreadable.
pub fn scan_archive(root: &Path) -> Result<Vec<Title>> {
    ensure_directory(root)?;

    let mut titles = Vec::new();
    for name in subdirectories(root)? {
        match naming::parse_title_dir(&name) {
            Some(parsed) => titles.push(scan_title(root, &name, parsed)),
            None => tracing::debug!("Skipping non-title directory: {}", name),
        }
    }

    tracing::info!(
        "Scanned {}: {} titles, {} disks",
        root.display(),
        titles.len(),
        titles.iter().map(|t| t.disks.len()).sum::<usize>()
    );

    Ok(titles)
}

fn scan_title(root: &Path, dir_name: &str, parsed: TitleDirName) -> Title {
    let path = root.join(dir_name);
    let disks = collect_disks(&path, parsed.kind);

    // The official title replaces the parsed one; the year always comes from the name.
    let title = read_sidecar(&path.join(TITLE_FILE))
        .filter(|t| !t.is_empty())
        .unwrap_or(parsed.title);
    let tmdb_id = read_sidecar(&path.join(TMDB_ID_FILE)).filter(|id| !id.is_empty());

    Title {
        title,
        kind: parsed.kind,
        year: parsed.year,
        tmdb_id,
        disks,
        path,
    }
}

fn collect_disks(title_dir: &Path, kind: MediaKind) -> Vec<Disk> {
    let names = match subdirectories(title_dir) {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!("Cannot list disks in {:?}: {}", title_dir, e);
            return Vec::new();
        }
    };

    let mut cache = SizeCache::open(title_dir);
    let mut disks = Vec::new();

    for name in names {
        let Some(parsed) = naming::parse_disk_dir(&name, kind) else {
            tracing::debug!("Skipping non-disk directory in {:?}: {}", title_dir, name);
            continue;
        };

        let path = title_dir.join(&name);
        let size = cache.resolve(&name, || dir_size(&path));
        let display_name = match parsed.numbering {
            Some((series, disk)) => format!("Series {} Disk {}", series, disk),
            None => format!("Disk {}", disks.len() + 1),
        };

        disks.push(Disk {
            name: display_name,
            format: parsed.format,
            size,
            path,
        });
    }

    cache.flush();
    disks
}

/// List raw backups waiting in the inbox, measuring each one.
pub fn scan_inbox(import_dir: &Path) -> Result<Vec<SourceDirectory>> {
    ensure_directory(import_dir)?;

    let sources = subdirectories(import_dir)?
        .into_iter()
        .map(|name| {
            let path = import_dir.join(&name);
            let size = dir_size(&path).unwrap_or_else(|e| {
                tracing::warn!("Failed to measure {:?}: {}", path, e);
                0
            });
            SourceDirectory { name, path, size }
        })
        .collect::<Vec<_>>();

    tracing::info!("Found {} import candidates in {}", sources.len(), import_dir.display());
    Ok(sources)
}

/// Guess the disk format from marker directories: `BDMV` for Blu-Ray and
/// `VIDEO_TS` for DVD.
pub fn detect_disk_format(dir: &Path) -> Option<DiskFormat> {
    if dir.join("BDMV").is_dir() {
        Some(DiskFormat::BluRay)
    } else if dir.join("VIDEO_TS").is_dir() {
        Some(DiskFormat::Dvd)
    } else {
        None
    }
}

/// Scanned titles with lookup helpers.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    titles: Vec<Title>,
}

impl Catalog {
    /// Wrap scanned titles, warning about titles that share a slug.
    pub fn new(titles: Vec<Title>) -> Self {
        let catalog = Self { titles };
        for (slug, paths) in catalog.slug_collisions() {
            tracing::warn!("Slug {:?} is shared by {} titles: {:?}", slug, paths.len(), paths);
        }
        catalog
    }

    /// Scan an archive root into a catalog.
    pub fn scan(root: &Path) -> Result<Self> {
        Ok(Self::new(scan_archive(root)?))
    }

    /// All titles in scan order.
    pub fn titles(&self) -> &[Title] {
        &self.titles
    }

    /// First title with the given slug.
    pub fn find_by_slug(&self, slug: &str) -> Option<&Title> {
        self.titles.iter().find(|t| t.slug() == slug)
    }

    /// Titles an import of `kind` can be appended to.
    pub fn compatible_with(&self, kind: MediaKind) -> impl Iterator<Item = &Title> {
        self.titles.iter().filter(move |t| t.kind == kind)
    }

    /// Slugs used by more than one title, with the paths of those titles.
    pub fn slug_collisions(&self) -> Vec<(String, Vec<String>)> {
        let mut by_slug: HashMap<String, Vec<String>> = HashMap::new();
        for title in &self.titles {
            by_slug
                .entry(title.slug())
                .or_default()
                .push(title.path.display().to_string());
        }
        let mut collisions: Vec<_> = by_slug
            .into_iter()
            .filter(|(_, paths)| paths.len() > 1)
            .collect();
        collisions.sort();
        collisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn title(name: &str, kind: MediaKind, year: u16, path: &str) -> Title {
        Title {
            title: name.to_string(),
            kind,
            year,
            tmdb_id: None,
            disks: vec![],
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn test_detect_disk_format() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(detect_disk_format(temp_dir.path()), None);

        fs::create_dir(temp_dir.path().join("VIDEO_TS")).unwrap();
        assert_eq!(detect_disk_format(temp_dir.path()), Some(DiskFormat::Dvd));

        fs::create_dir(temp_dir.path().join("BDMV")).unwrap();
        assert_eq!(detect_disk_format(temp_dir.path()), Some(DiskFormat::BluRay));
    }

    #[test]
    fn test_detect_ignores_marker_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("BDMV"), "not a dir").unwrap();
        assert_eq!(detect_disk_format(temp_dir.path()), None);
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::new(vec![
            title("Alien", MediaKind::Film, 1979, "/a"),
            title("Lost", MediaKind::Series, 0, "/b"),
        ]);

        assert_eq!(catalog.find_by_slug("alien-1979").unwrap().path, PathBuf::from("/a"));
        assert!(catalog.find_by_slug("alien").is_none());
        let series: Vec<_> = catalog.compatible_with(MediaKind::Series).collect();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].title, "Lost");
    }

    #[test]
    fn test_slug_collisions() {
        let catalog = Catalog::new(vec![
            title("Dune: Part One", MediaKind::Film, 2021, "/a"),
            title("Dune_ Part One", MediaKind::Film, 2021, "/b"),
            title("Dune", MediaKind::Film, 1984, "/c"),
        ]);

        let collisions = catalog.slug_collisions();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].0, "dune-part-one-2021");
        assert_eq!(collisions[0].1, vec!["/a".to_string(), "/b".to_string()]);
    }
}
