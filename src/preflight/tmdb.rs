//! TMDB API preflight check.

use super::CheckResult;
use crate::models::config::TmdbConfig;
use crate::services::tmdb::TmdbClient;

/// Check if TMDB API is accessible. A missing key only disables lookups.
pub async fn check(config: &TmdbConfig) -> CheckResult {
    match TmdbClient::from_config(config) {
        Ok(client) => match client.verify_api_key().await {
            Ok(true) => CheckResult::ok("TMDB API", "connected"),
            Ok(false) => CheckResult::fail(
                "TMDB API",
                "invalid API key or connection failed",
                "Check TMDB_API_KEY and your network connection",
            ),
            Err(_) => CheckResult::fail(
                "TMDB API",
                "connection failed",
                "Check your network connection",
            ),
        },
        Err(_) => CheckResult::ok("TMDB API", "not configured, metadata lookup disabled"),
    }
}
