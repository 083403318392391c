//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default location of the BMKG TEWS feed.
pub const DEFAULT_BMKG_BASE_URL: &str = "https://data.bmkg.go.id/DataMKG/TEWS/";

/// Top-level service configuration.
///
/// Loaded once at startup via [`GempaConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GempaConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Base URL of the earthquake feed, with a trailing slash.
    pub bmkg_base_url: String,

    /// Directory holding the static page assets.
    pub asset_dir: PathBuf,

    /// Origin the cache worker treats as same-origin (e.g.
    /// `http://127.0.0.1:3000`).
    pub origin_url: String,

    /// Master switch for the local mirror store. When `false` the mirror
    /// behaves as if the platform had no local database.
    pub mirror_enabled: bool,

    /// SQLite connection string for the mirror store.
    pub mirror_database_url: String,

    /// Capacity of the cache worker's event channel.
    pub worker_channel_capacity: usize,
}

impl GempaConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let bmkg_base_url = with_trailing_slash(
            std::env::var("BMKG_BASE_URL").unwrap_or_else(|_| DEFAULT_BMKG_BASE_URL.to_string()),
        );

        let asset_dir = PathBuf::from(
            std::env::var("ASSET_DIR").unwrap_or_else(|_| "public".to_string()),
        );

        let origin_url = std::env::var("ORIGIN_URL")
            .unwrap_or_else(|_| format!("http://127.0.0.1:{}", listen_addr.port()));

        let mirror_enabled = parse_env_bool("MIRROR_ENABLED", true);
        let mirror_database_url = std::env::var("MIRROR_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://gempaDB.sqlite".to_string());

        let worker_channel_capacity = parse_env("WORKER_CHANNEL_CAPACITY", 256);

        Ok(Self {
            listen_addr,
            bmkg_base_url,
            asset_dir,
            origin_url: origin_url.trim_end_matches('/').to_string(),
            mirror_enabled,
            mirror_database_url,
            worker_channel_capacity,
        })
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_added_once() {
        assert_eq!(
            with_trailing_slash("https://example.test/feed".to_string()),
            "https://example.test/feed/"
        );
        assert_eq!(
            with_trailing_slash(DEFAULT_BMKG_BASE_URL.to_string()),
            DEFAULT_BMKG_BASE_URL
        );
    }

    #[test]
    fn missing_variable_uses_default() {
        assert_eq!(parse_env("GEMPA_TEST_UNSET_VARIABLE", 7usize), 7);
        assert!(parse_env_bool("GEMPA_TEST_UNSET_VARIABLE", true));
    }
}
