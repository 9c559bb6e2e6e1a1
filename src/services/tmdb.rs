//! TMDB API client.

use crate::models::config::TmdbConfig;
use crate::models::media::{find_poster, MediaKind, DESCRIPTION_FILE, GENRE_FILE, TITLE_FILE};
use crate::models::session::ProviderIdentity;
use crate::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

/// TMDB API client.
pub struct TmdbClient {
    api_key: String,
    language: String,
    /// Whether to use Bearer token authentication (API v4 style).
    use_bearer: bool,
    client: reqwest::Client,
}

/// Genre.
#[derive(Debug, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Movie details.
#[derive(Debug, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// TV show details.
#[derive(Debug, Deserialize)]
pub struct TvDetails {
    pub id: u64,
    pub name: String,
    pub first_air_date: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Search result item, shared by movie and TV searches.
#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub id: u64,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(alias = "first_air_date")]
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    results: Vec<SearchItem>,
}

/// Year from a `YYYY-MM-DD` date, 0 if missing or malformed.
fn year_of(date: Option<&str>) -> u16 {
    date.and_then(|d| d.get(..4))
        .and_then(|y| y.parse().ok())
        .unwrap_or(0)
}

fn genre_names(genres: Vec<Genre>) -> Vec<String> {
    genres.into_iter().map(|g| g.name).collect()
}

impl From<MovieDetails> for ProviderIdentity {
    fn from(movie: MovieDetails) -> Self {
        Self {
            id: movie.id.to_string(),
            year: year_of(movie.release_date.as_deref()),
            title: movie.title,
            overview: movie.overview.unwrap_or_default(),
            genres: genre_names(movie.genres),
            poster_path: movie.poster_path,
        }
    }
}

impl From<TvDetails> for ProviderIdentity {
    fn from(tv: TvDetails) -> Self {
        Self {
            id: tv.id.to_string(),
            year: year_of(tv.first_air_date.as_deref()),
            title: tv.name,
            overview: tv.overview.unwrap_or_default(),
            genres: genre_names(tv.genres),
            poster_path: tv.poster_path,
        }
    }
}

impl TmdbClient {
    /// Create a client from configuration; fails if no API key is set.
    pub fn from_config(config: &TmdbConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(Error::TmdbApiKeyMissing)?;

        // Bearer tokens start with "eyJ" (base64 encoded JWT header)
        let use_bearer = api_key.starts_with("eyJ");

        Ok(Self {
            api_key,
            language: config.language.clone(),
            use_bearer,
            client: reqwest::Client::new(),
        })
    }

    /// Build a request with proper authentication.
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        if self.use_bearer {
            request.header("Authorization", format!("Bearer {}", self.api_key))
        } else {
            request
        }
    }

    /// Build URL with optional api_key parameter (only for v3 style).
    fn build_url(&self, path: &str, extra_params: &str) -> String {
        if self.use_bearer {
            format!(
                "{}/{}?language={}{}",
                TMDB_BASE_URL, path, self.language, extra_params
            )
        } else {
            format!(
                "{}/{}?api_key={}&language={}{}",
                TMDB_BASE_URL, path, self.api_key, self.language, extra_params
            )
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let resp = self.build_request(url).send().await?;
        if !resp.status().is_success() {
            return Err(Error::Provider(format!(
                "status {} for {}",
                resp.status(),
                what
            )));
        }
        Ok(resp.json().await?)
    }

    /// Verify API key is valid.
    pub async fn verify_api_key(&self) -> Result<bool> {
        let url = self.build_url("authentication", "");
        match self.build_request(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Get movie details.
    pub async fn movie_details(&self, movie_id: &str) -> Result<MovieDetails> {
        let url = self.build_url(&format!("movie/{}", urlencoding::encode(movie_id)), "");
        self.get_json(&url, &format!("movie {}", movie_id)).await
    }

    /// Get TV show details.
    pub async fn tv_details(&self, tv_id: &str) -> Result<TvDetails> {
        let url = self.build_url(&format!("tv/{}", urlencoding::encode(tv_id)), "");
        self.get_json(&url, &format!("TV show {}", tv_id)).await
    }

    /// Search for movies.
    pub async fn search_movies(&self, query: &str, year: Option<u16>) -> Result<Vec<SearchItem>> {
        if query.trim().is_empty() {
            return Err(Error::validation("query", "search query cannot be empty"));
        }
        let year_param = year.map(|y| format!("&year={}", y)).unwrap_or_default();
        let url = self.build_url(
            "search/movie",
            &format!("&query={}{}", urlencoding::encode(query), year_param),
        );
        let resp: SearchResult = self.get_json(&url, "movie search").await?;
        Ok(resp.results)
    }

    /// Search for TV shows.
    pub async fn search_tv(&self, query: &str) -> Result<Vec<SearchItem>> {
        if query.trim().is_empty() {
            return Err(Error::validation("query", "search query cannot be empty"));
        }
        let url = self.build_url("search/tv", &format!("&query={}", urlencoding::encode(query)));
        let resp: SearchResult = self.get_json(&url, "TV search").await?;
        Ok(resp.results)
    }

    /// Fetch the identity for a TMDB ID of the given kind.
    pub async fn lookup(&self, kind: MediaKind, tmdb_id: &str) -> Result<ProviderIdentity> {
        let tmdb_id = tmdb_id.trim();
        if tmdb_id.is_empty() {
            return Err(Error::validation("tmdb_id", "TMDB ID is required"));
        }
        let identity: ProviderIdentity = match kind {
            MediaKind::Film => self.movie_details(tmdb_id).await?.into(),
            MediaKind::Series => self.tv_details(tmdb_id).await?.into(),
        };
        Ok(identity)
    }

    /// Download the poster into `dest_dir` unless a poster already exists.
    pub async fn download_poster(&self, poster_path: &str, dest_dir: &Path) -> Result<Option<PathBuf>> {
        if find_poster(dest_dir).is_some() {
            return Ok(None);
        }
        let poster_path = poster_path.trim_start_matches('/');
        let url = format!("{}/{}", TMDB_IMAGE_BASE_URL, poster_path);
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(Error::Provider(format!(
                "status {} downloading poster",
                resp.status()
            )));
        }

        let ext = Path::new(poster_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg");
        let dest = dest_dir.join(format!("poster.{}", ext));
        fs::write(&dest, resp.bytes().await?)?;
        tracing::info!("Downloaded poster to {:?}", dest);
        Ok(Some(dest))
    }
}

/// Write `description.txt`, `genre.txt` and `title.txt` from an identity.
///
/// Existing files and empty values are left alone. Returns the files written.
pub fn save_metadata(title_dir: &Path, identity: &ProviderIdentity) -> Result<Vec<PathBuf>> {
    let entries = [
        (DESCRIPTION_FILE, identity.overview.trim().to_string()),
        (GENRE_FILE, identity.genres.join(", ")),
        (TITLE_FILE, identity.title.trim().to_string()),
    ];

    let mut written = Vec::new();
    for (file, content) in entries {
        let path = title_dir.join(file);
        if content.is_empty() || path.exists() {
            continue;
        }
        fs::write(&path, content)?;
        tracing::debug!("Saved {:?}", path);
        written.push(path);
    }
    Ok(written)
}
