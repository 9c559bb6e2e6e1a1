//! Import session step transitions.
//!
//! Each transition validates its whole input before touching the session, so
//! a rejected step leaves the session exactly as it was. Steps must be taken
//! in order; revisiting an earlier step is allowed and keeps later values.

use crate::core::naming;
use crate::core::scanner::{detect_disk_format, Catalog};
use crate::models::media::{DiskFormat, MediaKind};
use crate::models::session::{ImportSession, ImportStep, Placement, ProviderIdentity, SourceDirectory};
use crate::utils::fs::{dir_size, ensure_directory};
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Where an import will land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Title directory (existing or to be created).
    pub title_dir: PathBuf,
    /// Disk directory the source will be renamed to.
    pub disk_dir: PathBuf,
}

/// Step 1: pick an immediate subdirectory of the inbox.
///
/// The source is measured eagerly and probed for a format guess.
pub fn start(import_dir: &Path, name: &str) -> Result<ImportSession> {
    let name = name.trim();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(Error::validation(
            "source",
            format!("'{}' is not a directory name", name),
        ));
    }
    ensure_directory(import_dir)?;
    let path = import_dir.join(name);
    ensure_directory(&path)?;

    let size = dir_size(&path).unwrap_or_else(|e| {
        tracing::warn!("Failed to measure {:?}: {}", path, e);
        0
    });
    let detected = detect_disk_format(&path);
    tracing::debug!("Import source {:?}: {} bytes, detected {:?}", path, size, detected);

    let source = SourceDirectory {
        name: name.to_string(),
        path,
        size,
    };
    Ok(ImportSession::new(source, detected))
}

fn require(session: &ImportSession, step: ImportStep) -> Result<()> {
    if session.step < step {
        return Err(Error::IncompleteSession(step.field()));
    }
    Ok(())
}

fn advance(session: &mut ImportSession, step: ImportStep) {
    session.step = session.step.max(step);
}

fn require_kind(session: &ImportSession) -> Result<MediaKind> {
    require(session, ImportStep::KindChosen)?;
    session.kind.ok_or(Error::IncompleteSession("kind"))
}

/// Step 2: film or series. Cannot change once later steps depend on it.
pub fn choose_kind(session: &mut ImportSession, selector: &str) -> Result<()> {
    require(session, ImportStep::SourceChosen)?;
    let kind = MediaKind::from_selector(selector).ok_or_else(|| {
        Error::validation("kind", format!("unrecognized kind '{}'", selector))
    })?;
    if session.step > ImportStep::KindChosen && session.kind != Some(kind) {
        return Err(Error::validation(
            "kind",
            "kind cannot change after the title has been chosen; start a new import",
        ));
    }

    session.kind = Some(kind);
    advance(session, ImportStep::KindChosen);
    Ok(())
}

fn parse_positive<T>(field: &'static str, value: Option<&str>) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let value = value.map(str::trim).unwrap_or_default();
    match value.parse::<T>() {
        Ok(n) if n > T::default() => Ok(n),
        _ => Err(Error::validation(
            field,
            format!("'{}' is not a positive number", value),
        )),
    }
}

fn parse_year(value: Option<&str>) -> Result<u16> {
    let year: u16 = parse_positive("year", value)?;
    if year > 9999 {
        return Err(Error::validation("year", format!("{} is not a 4-digit year", year)));
    }
    Ok(year)
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if naming::sanitize(title).is_empty() {
        return Err(Error::validation("title", "title is required"));
    }
    Ok(title.to_string())
}

/// Step 3 (manual): title text, plus a year for films.
///
/// Replaces any previously fetched provider identity.
pub fn enter_identity(session: &mut ImportSession, title: &str, year: Option<&str>) -> Result<()> {
    let kind = require_kind(session)?;
    let title = validate_title(title)?;
    let year = match kind {
        MediaKind::Film => parse_year(year)?,
        MediaKind::Series => 0,
    };

    session.title = title;
    session.year = year;
    session.provider = None;
    session.tmdb_id = None;
    advance(session, ImportStep::IdentityChosen);
    Ok(())
}

/// Step 3 (provider): identity confirmed through the metadata provider.
pub fn apply_provider_identity(session: &mut ImportSession, identity: ProviderIdentity) -> Result<()> {
    let kind = require_kind(session)?;
    if identity.id.trim().is_empty() {
        return Err(Error::validation("tmdb_id", "TMDB ID is required"));
    }
    validate_title(&identity.title)?;
    if kind == MediaKind::Film && identity.year == 0 && session.year == 0 {
        return Err(Error::validation(
            "year",
            "TMDB has no release year for this film; enter it manually",
        ));
    }

    session.tmdb_id = Some(identity.id.trim().to_string());
    session.provider = Some(identity);
    advance(session, ImportStep::IdentityChosen);
    Ok(())
}

/// Step 4: series/disk numbers (series only) and the disk format.
pub fn choose_disk(
    session: &mut ImportSession,
    series: Option<&str>,
    disk: Option<&str>,
    format_selector: &str,
    custom_format: Option<&str>,
) -> Result<()> {
    require(session, ImportStep::IdentityChosen)?;
    let kind = require_kind(session)?;
    let (series, disk) = match kind {
        MediaKind::Series => (
            parse_positive::<u32>("series", series)?,
            parse_positive::<u32>("disk", disk)?,
        ),
        MediaKind::Film => (0, 1),
    };
    let format = DiskFormat::from_selector(format_selector.trim(), custom_format)?;
    if naming::sanitize(format.label()).is_empty() {
        return Err(Error::validation("custom_format", "custom disk format text is required"));
    }

    session.series = series;
    session.disk = disk;
    session.format = Some(format);
    advance(session, ImportStep::DiskChosen);
    Ok(())
}

/// Step 5: create a new title, or append to an existing one of the same kind.
pub fn choose_placement(
    session: &mut ImportSession,
    selector: &str,
    existing_slug: Option<&str>,
    catalog: &Catalog,
) -> Result<()> {
    require(session, ImportStep::DiskChosen)?;
    let kind = require_kind(session)?;

    let placement = match selector.trim() {
        "new" => Placement::New,
        "existing" => {
            let slug = existing_slug.map(str::trim).unwrap_or_default();
            if slug.is_empty() {
                return Err(Error::validation("existing_title", "an existing title must be selected"));
            }
            let title = catalog
                .find_by_slug(slug)
                .ok_or_else(|| Error::ExistingTitleNotFound(slug.to_string()))?;
            if title.kind != kind {
                return Err(Error::KindMismatch {
                    slug: slug.to_string(),
                    expected: kind.to_string(),
                    found: title.kind.to_string(),
                });
            }
            Placement::Existing {
                slug: slug.to_string(),
                path: title.path.clone(),
            }
        }
        other => {
            return Err(Error::validation(
                "placement",
                format!("unrecognized placement '{}'", other),
            ))
        }
    };

    session.placement = Some(placement);
    advance(session, ImportStep::PlacementChosen);
    Ok(())
}

/// Step 6: compute the destination. Read-only; the executor uses the same
/// computation, so the preview matches the eventual move exactly.
pub fn destination(session: &ImportSession, media_root: &Path) -> Result<Destination> {
    require(session, ImportStep::PlacementChosen)?;
    let kind = require_kind(session)?;
    let format = session.format_text().ok_or(Error::IncompleteSession("disk"))?;
    let placement = session
        .placement
        .as_ref()
        .ok_or(Error::IncompleteSession("placement"))?;

    let title_dir = match placement {
        Placement::Existing { path, .. } => path.clone(),
        Placement::New => media_root.join(naming::build_title_dir(
            session.final_title(),
            session.final_year(),
            kind,
        )),
    };
    let disk_dir = title_dir.join(naming::build_disk_dir(
        format,
        session.series,
        session.disk,
        kind,
    ));

    Ok(Destination { title_dir, disk_dir })
}
