use std::path::PathBuf;
use std::time::Duration;

use hoopdex_client::RendererKind;
use hoopdex_core::AppError;
use hoopdex_core::site::DEFAULT_BASE_URL;
use hoopdex_core::snapshot::DEFAULT_SNAPSHOT_FILE;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub index_file: PathBuf,
    pub base_url: String,
    pub crawl_delay: Duration,
    pub render_timeout: Duration,
    pub renderer: RendererKind,
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Read configuration from environment variables.
    ///
    /// - `HOOPDEX_SERVER_PORT` (optional, defaults to 3000)
    /// - `HOOPDEX_INDEX_FILE` (optional, defaults to `./player_index.json`)
    /// - `HOOPDEX_BASE_URL` (optional, defaults to basketball-reference.com)
    /// - `HOOPDEX_CRAWL_DELAY_MS` (optional, defaults to 1200)
    /// - `HOOPDEX_RENDER_TIMEOUT_SECS` (optional, defaults to 30)
    /// - `HOOPDEX_RENDERER` (optional, `http` or `browser`)
    /// - `HOOPDEX_STATIC_DIR` (optional, serves static files when set)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let port = parse_var(&lookup, "HOOPDEX_SERVER_PORT", 3000u16)?;
        let crawl_delay_ms = parse_var(&lookup, "HOOPDEX_CRAWL_DELAY_MS", 1200u64)?;
        let timeout_secs = parse_var(&lookup, "HOOPDEX_RENDER_TIMEOUT_SECS", 30u64)?;
        if timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "HOOPDEX_RENDER_TIMEOUT_SECS must be at least 1".into(),
            ));
        }

        let renderer = match lookup("HOOPDEX_RENDERER") {
            Some(raw) => raw.parse()?,
            None => RendererKind::default_for_build(),
        };

        Ok(Self {
            port,
            index_file: lookup("HOOPDEX_INDEX_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_FILE)),
            base_url: lookup("HOOPDEX_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            crawl_delay: Duration::from_millis(crawl_delay_ms),
            render_timeout: Duration::from_secs(timeout_secs),
            renderer,
            static_dir: lookup("HOOPDEX_STATIC_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            AppError::ConfigError(format!("Invalid {key} '{raw}': must be a non-negative integer"))
        }),
    }
}
