//! Startup checks for the archive root, the inbox and TMDB.

mod archive;
mod tmdb;

use crate::models::config::Config;
use colored::Colorize;

/// Outcome of one preflight check. A check fails exactly when it carries a hint.
#[derive(Debug)]
pub struct CheckResult {
    pub name: &'static str,
    pub message: String,
    pub hint: Option<&'static str>,
}

impl CheckResult {
    pub fn ok(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            message: message.into(),
            hint: None,
        }
    }

    pub fn fail(name: &'static str, message: impl Into<String>, hint: &'static str) -> Self {
        Self {
            name,
            message: message.into(),
            hint: Some(hint),
        }
    }

    pub fn passed(&self) -> bool {
        self.hint.is_none()
    }
}

/// Run all preflight checks.
pub async fn run_preflight_checks(config: &Config) -> Vec<CheckResult> {
    vec![
        archive::check_media_dir(&config.media_dir),
        archive::check_import_dir(config.import_dir.as_deref()),
        tmdb::check(&config.tmdb).await,
    ]
}

/// Print one line per check, plus the hint for failures.
pub fn print_results(results: &[CheckResult]) {
    for result in results {
        let tag = if result.passed() { "[OK]".green() } else { "[FAIL]".red() };
        println!("{} {}: {}", tag, result.name.bold(), result.message);
        if let Some(hint) = result.hint {
            println!("  {} {}", "->".yellow(), hint);
        }
    }
}

/// Check if all preflight checks passed.
pub fn all_passed(results: &[CheckResult]) -> bool {
    results.iter().all(CheckResult::passed)
}
