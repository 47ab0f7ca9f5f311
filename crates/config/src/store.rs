//! In-memory configuration store.
//!
//! Responsibilities:
//! - Hold the ordered section → option → value mapping of a loaded file.
//! - Merge further sections in (append/import) key by key.
//! - Fill in default-section options for ini stores on request.
//! - Serialize the mapping back out as ini or YAML.
//!
//! Does NOT handle:
//! - Reading files (see `source.rs`) or parsing text (see `format`).
//! - Fallback, secret or environment semantics (see `resolver`).
//!
//! Invariants:
//! - Section and option order follow first insertion; merges keep existing positions.
//! - A merge only replaces the options present in the incoming sections.
//! - Ini stores hold each section's own options; inherited defaults are never stored.

use indexmap::IndexMap;

use crate::error::Result;
use crate::format::{self, ConfigFormat};
use crate::value::ConfigValue;

/// Options of one section, in file order.
pub type Section = IndexMap<String, ConfigValue>;

/// Sections of a configuration, in file order.
pub type Sections = IndexMap<String, Section>;

/// Parsed configuration data plus the format it was read in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigStore {
    format: ConfigFormat,
    sections: Sections,
}

impl ConfigStore {
    /// Creates an empty store that will export in `format` by default.
    pub fn new(format: ConfigFormat) -> Self {
        Self {
            format,
            sections: Sections::new(),
        }
    }

    /// Creates a store from already-parsed sections.
    pub fn from_sections(format: ConfigFormat, sections: Sections) -> Self {
        Self { format, sections }
    }

    /// Format the primary file was read in.
    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Looks up a single option without any fallback.
    pub fn option(&self, section: &str, name: &str) -> Option<&ConfigValue> {
        self.sections.get(section)?.get(name)
    }

    /// Sets a single option, creating the section when needed.
    pub fn set_option(&mut self, section: &str, name: &str, value: impl Into<ConfigValue>) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(name.to_string(), value.into());
    }

    /// True when sections inherit the default section's options on lookup.
    ///
    /// Only ini stores do; YAML sections stand alone.
    pub fn inherits_defaults(&self) -> bool {
        self.format == ConfigFormat::Ini
    }

    /// A copy of section `name` with inherited default options filled in.
    pub fn resolved_section(&self, name: &str, default_section: &str) -> Option<Section> {
        let mut resolved = self.sections.get(name)?.clone();
        if self.inherits_defaults() && name != default_section {
            if let Some(defaults) = self.sections.get(default_section) {
                for (key, value) in defaults {
                    if !resolved.contains_key(key) {
                        resolved.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        Some(resolved)
    }

    /// Every section with inherited default options filled in.
    pub fn resolved_sections(&self, default_section: &str) -> Sections {
        self.sections
            .keys()
            .filter_map(|name| Some((name.clone(), self.resolved_section(name, default_section)?)))
            .collect()
    }

    /// Merges `incoming` into the store.
    ///
    /// Colliding sections are merged option by option; colliding options are
    /// overwritten. Returns the number of options written.
    pub fn merge(&mut self, incoming: Sections) -> usize {
        let mut written = 0;
        for (name, options) in incoming {
            let section = self.sections.entry(name).or_default();
            written += options.len();
            section.extend(options);
        }
        written
    }

    /// Merges parsed ini sections into a store that does not inherit defaults.
    ///
    /// The incoming default section's options are copied into the incoming
    /// sections, but only for keys neither the stored nor the incoming section sets.
    pub fn merge_with_defaults(&mut self, mut incoming: Sections, default_section: &str) -> usize {
        let defaults = incoming.get(default_section).cloned().unwrap_or_default();
        for (name, options) in incoming.iter_mut().filter(|(name, _)| *name != default_section) {
            let stored = self.sections.get(name);
            for (key, value) in &defaults {
                let set = options.contains_key(key) || stored.is_some_and(|s| s.contains_key(key));
                if !set {
                    options.insert(key.clone(), value.clone());
                }
            }
        }
        self.merge(incoming)
    }

    /// Serializes the store as `format`.
    ///
    /// Ini output drops nested mappings and joins lists with `,`. YAML output
    /// carries inherited default options into every section.
    pub fn render(&self, format: ConfigFormat, default_section: &str) -> Result<String> {
        match format {
            ConfigFormat::Ini => format::render(&self.sections, format, default_section),
            ConfigFormat::Yaml => {
                format::render(&self.resolved_sections(default_section), format, default_section)
            }
        }
    }

    pub fn into_sections(self) -> Sections {
        self.sections
    }
}
