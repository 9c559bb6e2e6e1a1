//! Configuration model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Archive root holding the title directories.
    pub media_dir: PathBuf,
    /// Inbox holding raw disk backups; import is disabled when unset.
    pub import_dir: Option<PathBuf>,
    /// Prefix prepended to disk paths in player commands.
    pub play_url_prefix: String,
    /// TMDB configuration.
    pub tmdb: TmdbConfig,
}

/// TMDB configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    /// API key or bearer token.
    pub api_key: Option<String>,
    /// Language for responses.
    pub language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            media_dir: PathBuf::from("."),
            import_dir: None,
            play_url_prefix: String::new(),
            tmdb: TmdbConfig::default(),
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: "en-US".to_string(),
        }
    }
}

impl Config {
    /// Override file values with `MEDIA_DIR`, `IMPORT_DIR`, `PLAY_URL_PREFIX`
    /// and `TMDB_API_KEY` when they are set and non-empty.
    pub fn apply_env(mut self) -> Self {
        if let Some(dir) = env_var("MEDIA_DIR") {
            self.media_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env_var("IMPORT_DIR") {
            self.import_dir = Some(PathBuf::from(dir));
        }
        if let Some(prefix) = env_var("PLAY_URL_PREFIX") {
            self.play_url_prefix = prefix;
        }
        if let Some(key) = env_var("TMDB_API_KEY") {
            self.tmdb.api_key = Some(key);
        }
        self
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shelf")
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> crate::Result<Config> {
    Ok(toml::from_str(content)?)
}

/// Load configuration from file, then apply environment overrides.
pub fn load_config() -> Config {
    let config_path = dirs_config_path().join("config.toml");

    let config = match std::fs::read_to_string(&config_path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid config {:?}: {}", config_path, e);
            Config::default()
        }),
        Err(_) => Config::default(),
    };

    config.apply_env()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config(
            r#"
            media_dir = "/srv/backup"

            [tmdb]
            language = "de-DE"
            "#,
        )
        .unwrap();

        assert_eq!(config.media_dir, PathBuf::from("/srv/backup"));
        assert!(config.import_dir.is_none());
        assert_eq!(config.tmdb.language, "de-DE");
        assert!(config.tmdb.api_key.is_none());
    }

    #[test]
    fn test_parse_invalid_config() {
        assert!(matches!(
            parse_config("media_dir = ["),
            Err(crate::Error::Config(_))
        ));
    }
}
