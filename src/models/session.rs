//! Import session data model.

use super::media::{DiskFormat, MediaKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A raw backup directory waiting in the inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDirectory {
    /// Directory name.
    pub name: String,
    /// Absolute path.
    pub path: PathBuf,
    /// Total size in bytes.
    pub size: u64,
}

impl SourceDirectory {
    /// Size in gigabytes (1024³ bytes).
    pub fn size_gb(&self) -> f64 {
        self.size as f64 / (1024.0 * 1024.0 * 1024.0)
    }
}

/// Identity confirmed through the metadata provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderIdentity {
    /// Provider identifier (TMDB ID).
    pub id: String,
    /// Official title.
    pub title: String,
    /// Release/first-air year, 0 if unknown.
    pub year: u16,
    /// Overview/synopsis.
    pub overview: String,
    /// Genre names.
    pub genres: Vec<String>,
    /// Poster path on the provider's image host.
    pub poster_path: Option<String>,
}

/// Where the imported disk ends up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Placement {
    /// Create a fresh title directory.
    New,
    /// Append under an already scanned title.
    Existing {
        /// Slug of the chosen title.
        slug: String,
        /// Path of the chosen title directory.
        path: PathBuf,
    },
}

/// Workflow steps, in the order they must be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStep {
    SourceChosen,
    KindChosen,
    IdentityChosen,
    DiskChosen,
    PlacementChosen,
}

impl ImportStep {
    /// Field name reported when this step is missing.
    pub fn field(self) -> &'static str {
        match self {
            ImportStep::SourceChosen => "source",
            ImportStep::KindChosen => "kind",
            ImportStep::IdentityChosen => "title",
            ImportStep::DiskChosen => "disk",
            ImportStep::PlacementChosen => "placement",
        }
    }
}

/// A draft move of one raw backup into the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSession {
    /// Source directory being imported.
    pub source: SourceDirectory,
    /// Best-effort format guess from the directory structure.
    pub detected_format: Option<DiskFormat>,
    /// Film or series.
    pub kind: Option<MediaKind>,
    /// Manually entered title.
    pub title: String,
    /// Manually entered year (films only).
    pub year: u16,
    /// External identifier.
    pub tmdb_id: Option<String>,
    /// Series number (series only).
    pub series: u32,
    /// Disk ordinal.
    pub disk: u32,
    /// Confirmed disk format.
    pub format: Option<DiskFormat>,
    /// Placement of the disk.
    pub placement: Option<Placement>,
    /// Identity fetched from the metadata provider.
    pub provider: Option<ProviderIdentity>,
    /// Furthest step completed.
    pub step: ImportStep,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl ImportSession {
    /// Start a session for a chosen source directory.
    pub fn new(source: SourceDirectory, detected_format: Option<DiskFormat>) -> Self {
        Self {
            source,
            detected_format,
            kind: None,
            title: String::new(),
            year: 0,
            tmdb_id: None,
            series: 0,
            disk: 0,
            format: None,
            placement: None,
            provider: None,
            step: ImportStep::SourceChosen,
            created_at: Utc::now(),
        }
    }

    /// Title to use: the provider's title wins over manual entry.
    pub fn final_title(&self) -> &str {
        match &self.provider {
            Some(identity) if !identity.title.is_empty() => &identity.title,
            _ => &self.title,
        }
    }

    /// Year to use: the provider's year wins over manual entry.
    pub fn final_year(&self) -> u16 {
        match &self.provider {
            Some(identity) if identity.year > 0 => identity.year,
            _ => self.year,
        }
    }

    /// Format text for the disk directory name.
    pub fn format_text(&self) -> Option<&str> {
        self.format.as_ref().map(DiskFormat::label)
    }

    /// Whether the disk is appended to an existing title.
    pub fn adds_to_existing(&self) -> bool {
        matches!(self.placement, Some(Placement::Existing { .. }))
    }
}
