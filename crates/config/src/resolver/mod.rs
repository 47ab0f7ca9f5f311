//! Option lookup over a loaded configuration.
//!
//! Responsibilities:
//! - Resolve `(section, name)` requests against the store, including dotted names.
//! - Fall back between plain and `_`-prefixed (secret) option names.
//! - Decrypt secret options and expand `${VAR}` references in returned values.
//! - Resolve path options against the mock top path, and env-valued options.
//! - Merge further files in and export the store as ini or YAML.
//!
//! Does NOT handle:
//! - Reading and parsing the primary file (see `builder.rs`).
//! - Cipher details (see `secret.rs`).
//!
//! Invariants / Assumptions:
//! - Section names are routed through the replacement table before lookup.
//! - A plain name that is absent is retried as `_name`; an absent `_name` is retried as `name`.
//! - Ini sections see the default section's options unless they set the key themselves.
//! - Secret values are decrypted only when the token option is configured, and are
//!   never passed through `${VAR}` expansion.
//! - Only `MissingOption`/`MissingSection` are turned into defaults by the `*_or` accessors.

mod builder;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};

pub use builder::ConfigResolverBuilder;

use crate::constants::{
    DEFAULT_LIST_DELIMITER, DEFAULT_SECTION_NAME, DEFAULT_TOKEN_OPTION, QUALIFIED_PATH_SCHEMES,
    REDACTED, SECRET_PREFIX,
};
use crate::env::{env_var_or_none, substitute_env_refs};
use crate::error::{ConfigError, Result};
use crate::format::{self, ConfigFormat, ParseOptions};
use crate::secret::{SecretKey, decrypt_secret};
use crate::source::ConfigSource;
use crate::store::{ConfigStore, Section, Sections};
use crate::value::ConfigValue;

/// Read access to a loaded configuration.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    store: ConfigStore,
    config_path: Option<ConfigSource>,
    mock_top_path: Option<PathBuf>,
    parse_options: ParseOptions,
    section_names: HashMap<String, String>,
    token_option: String,
    substitute_env: bool,
}

impl ConfigResolver {
    pub(crate) fn new(
        store: ConfigStore,
        config_path: Option<ConfigSource>,
        mock_top_path: Option<PathBuf>,
        parse_options: ParseOptions,
        token_option: String,
        substitute_env: bool,
    ) -> Self {
        let mut section_names = HashMap::new();
        section_names.insert(
            DEFAULT_SECTION_NAME.to_string(),
            parse_options.default_section.clone(),
        );
        Self {
            store,
            config_path,
            mock_top_path,
            parse_options,
            section_names,
            token_option,
            substitute_env,
        }
    }

    /// Start building a resolver.
    pub fn builder() -> ConfigResolverBuilder {
        ConfigResolverBuilder::new()
    }

    /// Load `source` in `format` (detected from the extension when `None`).
    pub fn load(
        source: impl Into<ConfigSource>,
        format: Option<ConfigFormat>,
        mock_top_path: Option<PathBuf>,
    ) -> Result<Self> {
        let mut builder = Self::builder().with_config_path(source);
        if let Some(format) = format {
            builder = builder.with_format(format);
        }
        if let Some(path) = mock_top_path {
            builder = builder.with_mock_top_path(path);
        }
        builder.load()
    }

    /// Wrap an existing store with default lookup settings.
    pub fn from_store(store: ConfigStore) -> Self {
        let parse_options = ParseOptions {
            default_section: DEFAULT_SECTION_NAME.to_string(),
            import_environment: false,
        };
        Self::new(
            store,
            None,
            None,
            parse_options,
            DEFAULT_TOKEN_OPTION.to_string(),
            true,
        )
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn format(&self) -> ConfigFormat {
        self.store.format()
    }

    pub fn config_path(&self) -> Option<&ConfigSource> {
        self.config_path.as_ref()
    }

    pub fn mock_top_path(&self) -> Option<&Path> {
        self.mock_top_path.as_deref()
    }

    pub fn default_section_name(&self) -> &str {
        &self.parse_options.default_section
    }

    /// Route requests for section `from` to section `to`.
    pub fn replace_section_name(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.section_names.insert(from.into(), to.into());
    }

    /// The section actually read when `name` is requested.
    pub fn section_name_replacement<'a>(&'a self, name: &'a str) -> &'a str {
        self.section_names.get(name).map(String::as_str).unwrap_or(name)
    }

    fn effective_section<'a>(&'a self, section: Option<&'a str>) -> &'a str {
        self.section_name_replacement(section.unwrap_or(self.default_section_name()))
    }

    // -------------------------------------------------------------------------
    // Raw lookup
    // -------------------------------------------------------------------------

    /// Exact key first, then a dotted walk into nested mappings.
    fn lookup_in<'a>(section: &'a Section, name: &str) -> Option<&'a ConfigValue> {
        if let Some(value) = section.get(name) {
            return Some(value);
        }
        let (head, tail) = name.split_once('.')?;
        section.get(head)?.get_path(tail.split('.'))
    }

    /// `lookup_in` over the section's own options, then the inherited defaults.
    fn lookup_inherited<'a>(
        &'a self,
        section_name: &str,
        options: &'a Section,
        name: &str,
    ) -> Option<&'a ConfigValue> {
        Self::lookup_in(options, name).or_else(|| {
            let default_section = self.default_section_name();
            if !self.store.inherits_defaults() || section_name == default_section {
                return None;
            }
            Self::lookup_in(self.store.section(default_section)?, name)
        })
    }

    /// Finds the stored key for `name`, applying the underscore fallback.
    fn find_option(
        &self,
        name: &str,
        section: Option<&str>,
    ) -> Result<(String, &ConfigValue, String)> {
        let section_name = self.effective_section(section).to_string();
        let Some(options) = self.store.section(&section_name) else {
            return Err(ConfigError::MissingSection(section_name));
        };

        let fallback = match name.strip_prefix(SECRET_PREFIX) {
            Some(plain) if !plain.is_empty() => plain.to_string(),
            Some(_) => String::new(),
            None => format!("{SECRET_PREFIX}{name}"),
        };

        if let Some(value) = self.lookup_inherited(&section_name, options, name) {
            return Ok((name.to_string(), value, section_name));
        }
        if !fallback.is_empty() {
            if let Some(value) = self.lookup_inherited(&section_name, options, &fallback) {
                tracing::debug!(section = %section_name, option = %name, fallback = %fallback, "Using fallback option");
                return Ok((fallback, value, section_name));
            }
        }
        Err(ConfigError::MissingOption {
            section: section_name,
            name: name.to_string(),
        })
    }

    /// Decrypts `raw` if the section configures a token option.
    ///
    /// Returns `None` when no token is configured, meaning the value is plain.
    fn dereference_secret(
        &self,
        key: &str,
        raw: &str,
        section: &str,
    ) -> Result<Option<SecretString>> {
        let token_var = self
            .store
            .section(section)
            .and_then(|s| s.get(&self.token_option))
            .or_else(|| self.store.option(self.default_section_name(), &self.token_option))
            .and_then(ConfigValue::as_str);

        let Some(var) = token_var else {
            tracing::debug!(section = %section, option = %key, "No secret token configured; returning stored value");
            return Ok(None);
        };
        let secret_key = SecretKey::from_env(var, &self.token_option)?;
        decrypt_secret(raw, &secret_key, key).map(Some)
    }

    // -------------------------------------------------------------------------
    // Typed lookups
    // -------------------------------------------------------------------------

    /// Returns the value of `name` in `section` (the default section when `None`).
    ///
    /// # Errors
    ///
    /// - `MissingSection` / `MissingOption` when neither `name` nor its fallback exists.
    /// - `MissingEnvVar`, `InvalidSecretKey`, `SecretDecryption` for secret options
    ///   whose token is configured but unusable.
    pub fn get_option(&self, name: &str, section: Option<&str>) -> Result<ConfigValue> {
        let (key, value, section_name) = self.find_option(name, section)?;

        if key.starts_with(SECRET_PREFIX) {
            if let Some(raw) = value.as_str() {
                if let Some(secret) = self.dereference_secret(&key, raw, &section_name)? {
                    return Ok(ConfigValue::String(secret.expose_secret().to_string()));
                }
            }
        }

        let value = value.clone();
        if self.substitute_env {
            Ok(value.map_strings(&|s: String| substitute_env_refs(&s)))
        } else {
            Ok(value)
        }
    }

    /// Like [`get_option`](Self::get_option), returning `default` when the option is absent.
    pub fn get_option_or(
        &self,
        name: &str,
        section: Option<&str>,
        default: impl Into<ConfigValue>,
    ) -> Result<ConfigValue> {
        match self.get_option(name, section) {
            Err(e) if e.is_missing() => Ok(default.into()),
            other => other,
        }
    }

    /// Returns a scalar option rendered as a string.
    pub fn get_string(&self, name: &str, section: Option<&str>) -> Result<String> {
        let value = self.get_option(name, section)?;
        match value {
            ConfigValue::List(_) | ConfigValue::Map(_) => Err(ConfigError::NotAString {
                section: self.effective_section(section).to_string(),
                name: name.to_string(),
            }),
            scalar => Ok(scalar.render_scalar(DEFAULT_LIST_DELIMITER).unwrap_or_default()),
        }
    }

    /// Like [`get_string`](Self::get_string), returning `default` when the option is absent.
    pub fn get_string_or(&self, name: &str, section: Option<&str>, default: &str) -> Result<String> {
        match self.get_string(name, section) {
            Err(e) if e.is_missing() => Ok(default.to_string()),
            other => other,
        }
    }

    /// Returns a list option; strings are split on `,`.
    pub fn get_list(&self, name: &str, section: Option<&str>) -> Result<Vec<String>> {
        self.get_list_with_delimiter(name, section, DEFAULT_LIST_DELIMITER)
    }

    /// Returns a list option; strings are split on `delimiter` and trimmed.
    ///
    /// Empty items between delimiters are kept (`"a,,b"` gives `a`, `""`, `b`);
    /// a blank string is an empty list.
    pub fn get_list_with_delimiter(
        &self,
        name: &str,
        section: Option<&str>,
        delimiter: &str,
    ) -> Result<Vec<String>> {
        let items = match self.get_option(name, section)? {
            ConfigValue::List(items) => items
                .iter()
                .map(|item| item.render_scalar(delimiter).unwrap_or_else(|| item.to_string()))
                .collect(),
            ConfigValue::String(s) if s.trim().is_empty() => Vec::new(),
            ConfigValue::String(s) => s
                .split(delimiter)
                .map(|part| part.trim().to_string())
                .collect(),
            ConfigValue::Null => Vec::new(),
            other => vec![other.to_string()],
        };
        Ok(items)
    }

    /// Like [`get_list`](Self::get_list), returning `default` when the option is absent.
    pub fn get_list_or(
        &self,
        name: &str,
        section: Option<&str>,
        default: Vec<String>,
    ) -> Result<Vec<String>> {
        match self.get_list(name, section) {
            Err(e) if e.is_missing() => Ok(default),
            other => other,
        }
    }

    /// Returns a path option joined onto the mock top path.
    ///
    /// Absolute paths and values with a URI scheme are returned unchanged.
    pub fn get_path(&self, name: &str, section: Option<&str>) -> Result<PathBuf> {
        self.get_path_with_prefix(name, section, None, None)
    }

    /// Returns `mock_top/prefix/value`, where `prefix` is the value of `prefix_name`
    /// in `prefix_section` (default section when `None`).
    ///
    /// A missing prefix option is ignored.
    pub fn get_path_with_prefix(
        &self,
        name: &str,
        section: Option<&str>,
        prefix_name: Option<&str>,
        prefix_section: Option<&str>,
    ) -> Result<PathBuf> {
        let value = self.get_string(name, section)?;
        if is_qualified_path(&value) {
            return Ok(PathBuf::from(value));
        }

        let prefix = match prefix_name {
            Some(prefix_name) => {
                let prefix_section = prefix_section.unwrap_or(self.default_section_name());
                match self.get_string(prefix_name, Some(prefix_section)) {
                    Ok(prefix) if !prefix.is_empty() => Some(prefix),
                    Ok(_) => None,
                    Err(e) if e.is_missing() => None,
                    Err(e) => return Err(e),
                }
            }
            None => None,
        };

        let mut path = self.mock_top_path.clone().unwrap_or_default();
        if let Some(prefix) = prefix {
            path.push(prefix);
        }
        path.push(value);
        Ok(path)
    }

    /// Returns the value of the environment variable named by option `name`.
    ///
    /// # Errors
    ///
    /// - `MissingOption` / `MissingSection` when the option is absent.
    /// - `MissingEnvVar` when the variable is unset or blank.
    pub fn get_env_value(&self, name: &str, section: Option<&str>) -> Result<String> {
        let var = self.get_string(name, section)?;
        env_var_or_none(&var).ok_or_else(|| ConfigError::MissingEnvVar {
            option: name.to_string(),
            var,
        })
    }

    /// Like [`get_env_value`](Self::get_env_value), returning `default` when either
    /// the option or the variable is absent.
    pub fn get_env_value_or(&self, name: &str, section: Option<&str>, default: &str) -> Result<String> {
        match self.get_env_value(name, section) {
            Err(e) if e.is_missing() || matches!(e, ConfigError::MissingEnvVar { .. }) => {
                Ok(default.to_string())
            }
            other => other,
        }
    }

    /// Returns a decrypted secret, decrypting even options without the `_` prefix.
    ///
    /// Without a configured token the stored value is returned as-is.
    pub fn get_secret(&self, name: &str, section: Option<&str>) -> Result<SecretString> {
        let (key, value, section_name) = self.find_option(name, section)?;
        let raw = value.as_str().ok_or_else(|| ConfigError::NotAString {
            section: section_name.clone(),
            name: name.to_string(),
        })?;
        match self.dereference_secret(&key, raw, &section_name)? {
            Some(secret) => Ok(secret),
            None => Ok(SecretString::from(raw.to_string())),
        }
    }

    // -------------------------------------------------------------------------
    // Mutation & export
    // -------------------------------------------------------------------------

    /// Merge the sections of another file into the store.
    ///
    /// Colliding options are overwritten; everything else is untouched. The
    /// format is detected from the locator, defaulting to the store's format.
    /// An appended ini file's default options reach a YAML store only in the
    /// sections that file names, and only where neither side sets the key.
    pub fn append_config(
        &mut self,
        source: impl Into<ConfigSource>,
        format: Option<ConfigFormat>,
    ) -> Result<()> {
        let source = source.into();
        let format =
            format.unwrap_or_else(|| ConfigFormat::detect(&source.locator(), self.store.format()));
        let text = source.read_to_string()?;
        let sections = format::parse(&text, format, &source.locator(), &self.parse_options)?;
        let written = if format == ConfigFormat::Ini && !self.store.inherits_defaults() {
            let default_section = self.parse_options.default_section.clone();
            self.store.merge_with_defaults(sections, &default_section)
        } else {
            self.store.merge(sections)
        };
        tracing::info!(source = %source, format = %format, options = written, "Appended configuration");
        Ok(())
    }

    /// Merge in-memory sections into the store.
    pub fn import_config(&mut self, sections: Sections) {
        let written = self.store.merge(sections);
        tracing::debug!(options = written, "Imported configuration");
    }

    /// Serialize the whole store as `format`.
    ///
    /// Ini output is lossy for nested YAML mappings.
    pub fn export_config(&self, format: ConfigFormat) -> Result<String> {
        self.store.render(format, self.default_section_name())
    }

    /// A copy of one section, including inherited default options.
    pub fn export_section(&self, name: &str) -> Option<Section> {
        self.store
            .resolved_section(self.section_name_replacement(name), self.default_section_name())
    }

    /// Every section, including inherited default options.
    pub fn resolved_sections(&self) -> Sections {
        self.store.resolved_sections(self.default_section_name())
    }

    /// Write the store to `path` as `format` (the store's own format when `None`).
    pub fn write_config(&self, path: &Path, format: Option<ConfigFormat>) -> Result<()> {
        let format = format.unwrap_or_else(|| self.store.format());
        let text = self.export_config(format)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(path, text).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), format = %format, "Configuration written");
        Ok(())
    }

    /// Log every option at info level, masking secret options.
    pub fn dump(&self) {
        for (name, options) in self.store.sections() {
            tracing::info!(section = %name, "Configuration section");
            for (key, value) in options {
                if key.starts_with(SECRET_PREFIX) {
                    tracing::info!(option = %key, value = REDACTED, "  option");
                } else {
                    tracing::info!(option = %key, value = %value, "  option");
                }
            }
        }
    }
}

/// True for absolute paths and URI-qualified locators.
pub fn is_qualified_path(value: &str) -> bool {
    value.starts_with('/')
        || Path::new(value).is_absolute()
        || QUALIFIED_PATH_SCHEMES
            .iter()
            .any(|scheme| value.starts_with(scheme))
}
