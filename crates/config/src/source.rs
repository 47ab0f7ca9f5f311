//! Configuration sources: local files and remote URLs.
//!
//! Responsibilities:
//! - Classify locator strings as local paths or remote URLs.
//! - Read local files and fetch remote ones with a single blocking GET.
//! - Materialize remote append locators into a cache directory.
//!
//! Does NOT handle:
//! - Parsing (see `format`).
//! - Retries; every source is read exactly once.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use url::Url;

use crate::constants::{CACHE_APP_NAME, CACHE_CONFIG_SUBDIR};
use crate::error::{ConfigError, Result};

/// Where configuration text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Path(PathBuf),
    Url(Url),
}

impl ConfigSource {
    /// Classifies a locator string.
    ///
    /// `http`, `https` and `ftp` URLs are remote; `file://` URLs and everything
    /// else are local paths. Only `http` and `https` can be fetched; reading an
    /// `ftp` source is a `Fetch` error.
    pub fn parse(locator: &str) -> Self {
        match Url::parse(locator) {
            Ok(url) if matches!(url.scheme(), "http" | "https" | "ftp") => Self::Url(url),
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => Self::Path(path),
                Err(()) => Self::Path(PathBuf::from(locator)),
            },
            _ => Self::Path(PathBuf::from(locator)),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Url(_))
    }

    /// Locator text used for format detection and messages.
    pub fn locator(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Url(url) => url.to_string(),
        }
    }

    /// Last path segment, used as the cache file name.
    pub fn file_name(&self) -> Option<String> {
        match self {
            Self::Path(path) => path.file_name().map(|n| n.to_string_lossy().into_owned()),
            Self::Url(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }

    /// Reads the full text of the source.
    pub fn read_to_string(&self) -> Result<String> {
        match self {
            Self::Path(path) => read_local(path),
            Self::Url(url) => fetch_remote(url),
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.locator())
    }
}

impl FromStr for ConfigSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<PathBuf> for ConfigSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ConfigSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for ConfigSource {
    fn from(locator: &str) -> Self {
        Self::parse(locator)
    }
}

impl From<Url> for ConfigSource {
    fn from(url: Url) -> Self {
        Self::parse(url.as_str())
    }
}

fn read_local(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.display().to_string())
        } else {
            ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

fn fetch_remote(url: &Url) -> Result<String> {
    tracing::debug!(url = %url, "Fetching remote configuration");
    let fetch_err = |message: String| ConfigError::Fetch {
        url: url.to_string(),
        message,
    };
    if !matches!(url.scheme(), "http" | "https") {
        return Err(fetch_err(format!("unsupported URL scheme '{}'", url.scheme())));
    }

    let response = reqwest::blocking::get(url.clone()).map_err(|e| fetch_err(e.to_string()))?;
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ConfigError::FileNotFound(url.to_string()));
    }
    if !status.is_success() {
        return Err(fetch_err(format!("HTTP status {status}")));
    }
    response.text().map_err(|e| fetch_err(e.to_string()))
}

/// Default directory for cached remote configuration assets.
///
/// Uses the platform cache directory, falling back to the system temp dir.
pub fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", CACHE_APP_NAME)
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join(format!("{CACHE_APP_NAME}-cache")))
}

/// Copies `source` into `<cache_dir>/config/<file name>` and returns the local path.
///
/// With `use_cache`, an existing cached copy is returned without fetching.
pub fn fetch_to_cache(source: &ConfigSource, cache_dir: &Path, use_cache: bool) -> Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| ConfigError::Fetch {
        url: source.locator(),
        message: "locator has no file name".to_string(),
    })?;
    let dir = cache_dir.join(CACHE_CONFIG_SUBDIR);
    let target = dir.join(file_name);

    if use_cache && target.is_file() {
        tracing::debug!(path = %target.display(), "Using cached configuration asset");
        return Ok(target);
    }

    let text = source.read_to_string()?;
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::Write {
        path: dir.clone(),
        source: e,
    })?;
    std::fs::write(&target, text).map_err(|e| ConfigError::Write {
        path: target.clone(),
        source: e,
    })?;
    tracing::debug!(locator = %source, path = %target.display(), "Fetched configuration asset");
    Ok(target)
}
