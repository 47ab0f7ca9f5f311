//! Configuration resolver builder implementation.
//!
//! Responsibilities:
//! - Collect load options (source, format, mock top path, section and option names).
//! - Read and parse the primary configuration file.
//! - Fetch and append the sections listed in the reserved append option.
//!
//! Does NOT handle:
//! - Option lookup semantics (see `resolver/mod.rs`).
//! - Format parsing details (see `format`).
//!
//! Invariants / Assumptions:
//! - An explicit config path wins over the fallback environment variable.
//! - A named fallback variable that is unset resolves to `setup.cfg`.
//! - Without any source the resolver starts empty (useful for `import_config`).
//! - An explicit format wins over extension detection; detection defaults to ini.

use std::path::PathBuf;

use super::ConfigResolver;
use crate::constants::{
    DEFAULT_APPEND_OPTION, DEFAULT_SECTION_NAME, DEFAULT_TOKEN_OPTION, FALLBACK_CONFIG_FILE,
};
use crate::env::env_var_or_none;
use crate::error::Result;
use crate::format::{self, ConfigFormat, ParseOptions};
use crate::source::{ConfigSource, default_cache_dir, fetch_to_cache};
use crate::store::ConfigStore;

/// Builder for [`ConfigResolver`].
#[derive(Debug, Clone)]
pub struct ConfigResolverBuilder {
    config_source: Option<ConfigSource>,
    fallback_env: Option<String>,
    format: Option<ConfigFormat>,
    mock_top_path: Option<PathBuf>,
    default_section: String,
    import_environment: bool,
    cache_dir: Option<PathBuf>,
    use_cache: bool,
    append_option: Option<String>,
    token_option: String,
    substitute_env: bool,
}

impl Default for ConfigResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigResolverBuilder {
    /// Create a new builder with default option names.
    pub fn new() -> Self {
        Self {
            config_source: None,
            fallback_env: None,
            format: None,
            mock_top_path: None,
            default_section: DEFAULT_SECTION_NAME.to_string(),
            import_environment: false,
            cache_dir: None,
            use_cache: false,
            append_option: Some(DEFAULT_APPEND_OPTION.to_string()),
            token_option: DEFAULT_TOKEN_OPTION.to_string(),
            substitute_env: true,
        }
    }

    /// Set the configuration file path or URL.
    pub fn with_config_path(mut self, source: impl Into<ConfigSource>) -> Self {
        self.config_source = Some(source.into());
        self
    }

    /// Name an environment variable holding the config path, used when no path is set.
    pub fn with_fallback_env(mut self, var: impl Into<String>) -> Self {
        self.fallback_env = Some(var.into());
        self
    }

    /// Force the file format instead of detecting it from the extension.
    pub fn with_format(mut self, format: ConfigFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Directory prepended to relative path options.
    pub fn with_mock_top_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mock_top_path = Some(path.into());
        self
    }

    /// Name of the section used when no section is requested.
    pub fn with_default_section(mut self, name: impl Into<String>) -> Self {
        self.default_section = name.into();
        self
    }

    /// Seed ini default sections with the (lower-cased) process environment.
    pub fn with_import_environment(mut self, enabled: bool) -> Self {
        self.import_environment = enabled;
        self
    }

    /// Directory for cached copies of appended remote configuration files.
    pub fn with_cache_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(path.into());
        self
    }

    /// Re-use cached copies of appended files instead of fetching them again.
    pub fn with_use_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    /// Option in the default section listing locators to append; `None` disables appending.
    pub fn with_append_option(mut self, option: Option<String>) -> Self {
        self.append_option = option;
        self
    }

    /// Option naming the environment variable that holds the secret key.
    pub fn with_token_option(mut self, option: impl Into<String>) -> Self {
        self.token_option = option.into();
        self
    }

    /// Toggle `${VAR}` expansion in returned values.
    pub fn with_env_substitution(mut self, enabled: bool) -> Self {
        self.substitute_env = enabled;
        self
    }

    /// The source `load()` will read, after applying the fallback variable.
    pub fn resolved_source(&self) -> Option<ConfigSource> {
        if let Some(source) = &self.config_source {
            return Some(source.clone());
        }
        let var = self.fallback_env.as_deref()?;
        let locator = env_var_or_none(var).unwrap_or_else(|| FALLBACK_CONFIG_FILE.to_string());
        Some(ConfigSource::parse(&locator))
    }

    /// Read the configuration and build the resolver.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source does not exist (`ConfigError::FileNotFound`)
    /// - The source cannot be read or fetched (`ConfigError::Read` / `ConfigError::Fetch`)
    /// - The text is malformed for its format (`ConfigError::Parse`)
    /// - An appended locator fails in any of the ways above
    pub fn load(self) -> Result<ConfigResolver> {
        let source = self.resolved_source();
        let format = self.format.unwrap_or_else(|| {
            source
                .as_ref()
                .map(|s| ConfigFormat::detect(&s.locator(), ConfigFormat::Ini))
                .unwrap_or_default()
        });
        let parse_options = ParseOptions {
            default_section: self.default_section.clone(),
            import_environment: self.import_environment,
        };

        let store = match &source {
            Some(source) => {
                tracing::debug!(source = %source, format = %format, "Loading configuration");
                let text = source.read_to_string()?;
                let sections = format::parse(&text, format, &source.locator(), &parse_options)?;
                ConfigStore::from_sections(format, sections)
            }
            None => ConfigStore::new(format),
        };

        let mut resolver = ConfigResolver::new(
            store,
            source,
            self.mock_top_path,
            parse_options,
            self.token_option,
            self.substitute_env,
        );

        if let Some(option) = self.append_option.as_deref() {
            let cache_dir = self.cache_dir.unwrap_or_else(default_cache_dir);
            resolver.append_listed_sections(option, &cache_dir, self.use_cache)?;
        }

        if resolver.store().is_empty() && resolver.config_path().is_some() {
            tracing::warn!(
                source = %resolver.config_path().map(|s| s.locator()).unwrap_or_default(),
                format = %format,
                "No configuration information imported"
            );
        }
        Ok(resolver)
    }
}

impl ConfigResolver {
    /// Fetch and append every locator listed in `option` of the default section.
    pub(crate) fn append_listed_sections(
        &mut self,
        option: &str,
        cache_dir: &std::path::Path,
        use_cache: bool,
    ) -> Result<()> {
        let default_section = self.default_section_name().to_string();
        let mut locators = self.get_list_or(option, Some(&default_section), Vec::new())?;
        locators.retain(|locator| !locator.is_empty());
        if locators.is_empty() {
            return Ok(());
        }
        tracing::debug!(count = locators.len(), option = %option, "Appending listed configuration");

        for locator in locators {
            let source = ConfigSource::parse(&locator);
            let format = ConfigFormat::from_extension(&locator);
            let local = if source.is_remote() {
                ConfigSource::Path(fetch_to_cache(&source, cache_dir, use_cache)?)
            } else {
                source
            };
            self.append_config(local, format)?;
        }
        Ok(())
    }
}
