//! ini (configparser dialect) codec.
//!
//! Responsibilities:
//! - Parse `[section]` / `key = value` text into ordered sections.
//! - Apply `%(name)s` interpolation at load time.
//! - Render sections back to ini text.
//!
//! Does NOT handle:
//! - Comments on export (they are not retained on parse).
//! - Default-section inheritance on lookup (see `ConfigStore::resolved_section`).
//!
//! Invariants:
//! - Each parsed section holds only the options written under its header;
//!   interpolation still sees the default section's options.
//! - Option names keep their case; environment imports are lower-cased.
//! - Duplicate sections or options within one file are parse errors.
//! - Blank lines inside a continued value are kept; trailing ones are dropped.
//! - Rendering escapes `%` so a rendered store parses back to the same values.

use indexmap::IndexMap;

use super::{ConfigFormat, ParseOptions};
use crate::constants::{DEFAULT_LIST_DELIMITER, MAX_INTERPOLATION_DEPTH};
use crate::error::{ConfigError, Result};
use crate::store::{Section, Sections};
use crate::value::ConfigValue;

type RawSection = IndexMap<String, String>;

/// Raw file content before interpolation.
struct RawIni {
    defaults: RawSection,
    sections: IndexMap<String, RawSection>,
    saw_default_header: bool,
}

pub(crate) fn parse(text: &str, origin: &str, options: &ParseOptions) -> Result<Sections> {
    let mut raw = parse_raw(text, origin, &options.default_section)?;

    if options.import_environment {
        // Imported values are literal; escape them before interpolation.
        let mut defaults: RawSection = std::env::vars()
            .map(|(k, v)| (k.to_lowercase(), v.replace('%', "%%")))
            .collect();
        tracing::debug!(count = defaults.len(), "Importing environment into default section");
        defaults.extend(raw.defaults);
        raw.defaults = defaults;
    }

    let mut sections = Sections::new();
    if raw.saw_default_header || !raw.defaults.is_empty() {
        let mut resolved = Section::new();
        for (key, value) in &raw.defaults {
            let value = interpolate(value, &raw.defaults, None, origin, 1)?;
            resolved.insert(key.clone(), ConfigValue::String(value));
        }
        sections.insert(options.default_section.clone(), resolved);
    }

    for (name, own) in &raw.sections {
        let mut resolved = Section::new();
        for (key, value) in own {
            let value = interpolate(value, own, Some(&raw.defaults), origin, 1)?;
            resolved.insert(key.clone(), ConfigValue::String(value));
        }
        sections.insert(name.clone(), resolved);
    }

    Ok(sections)
}

fn parse_raw(text: &str, origin: &str, default_section: &str) -> Result<RawIni> {
    let mut raw = RawIni {
        defaults: RawSection::new(),
        sections: IndexMap::new(),
        saw_default_header: false,
    };
    // None = before any header; Some("") is never used.
    let mut current: Option<String> = None;
    let mut last_key: Option<String> = None;
    // Blank lines seen since the last value line; kept only if the value continues.
    let mut pending_blanks = 0usize;

    let err = |line_no: usize, message: String| {
        ConfigError::parse(origin, ConfigFormat::Ini, format!("line {line_no}: {message}"))
    };

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if last_key.is_some() {
                pending_blanks += 1;
            }
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }
        let blanks = std::mem::take(&mut pending_blanks);

        let indented = line.starts_with(|c: char| c.is_whitespace());
        if indented {
            if let (Some(section), Some(key)) = (current.as_deref(), last_key.as_deref()) {
                let target = section_mut(&mut raw, section, default_section);
                if let Some(value) = target.get_mut(key) {
                    if !value.is_empty() {
                        value.push_str(&"\n".repeat(blanks + 1));
                    }
                    value.push_str(trimmed);
                }
                continue;
            }
        }

        if let Some(header) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            if header.is_empty() {
                return Err(err(line_no, "empty section header".to_string()));
            }
            if header == default_section {
                raw.saw_default_header = true;
            } else if raw.sections.contains_key(header) {
                return Err(err(line_no, format!("section '{header}' already exists")));
            } else {
                raw.sections.insert(header.to_string(), RawSection::new());
            }
            current = Some(header.to_string());
            last_key = None;
            continue;
        }

        let Some(section) = current.as_deref() else {
            return Err(err(line_no, "option found before any section header".to_string()));
        };

        let Some(pos) = trimmed.find(['=', ':']) else {
            return Err(err(line_no, "expected 'key = value' or 'key: value'".to_string()));
        };
        let key = trimmed[..pos].trim();
        let value = trimmed[pos + 1..].trim();
        if key.is_empty() {
            return Err(err(line_no, "option name is empty".to_string()));
        }

        let target = section_mut(&mut raw, section, default_section);
        if target.contains_key(key) {
            return Err(err(
                line_no,
                format!("option '{key}' in section '{section}' already exists"),
            ));
        }
        target.insert(key.to_string(), value.to_string());
        last_key = Some(key.to_string());
    }

    Ok(raw)
}

fn section_mut<'a>(raw: &'a mut RawIni, name: &str, default_section: &str) -> &'a mut RawSection {
    if name == default_section {
        &mut raw.defaults
    } else {
        raw.sections.entry(name.to_string()).or_default()
    }
}

/// Expands `%(name)s` references against `own` then `defaults`.
fn interpolate(
    value: &str,
    own: &RawSection,
    defaults: Option<&RawSection>,
    origin: &str,
    depth: usize,
) -> Result<String> {
    if !value.contains('%') {
        return Ok(value.to_string());
    }
    if depth > MAX_INTERPOLATION_DEPTH {
        return Err(ConfigError::parse(
            origin,
            ConfigFormat::Ini,
            format!("interpolation depth exceeded while expanding '{value}'"),
        ));
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 1..];
        if let Some(after) = rest.strip_prefix('%') {
            out.push('%');
            rest = after;
        } else if let Some(after) = rest.strip_prefix('(') {
            let close = after.find(")s").ok_or_else(|| {
                ConfigError::parse(
                    origin,
                    ConfigFormat::Ini,
                    format!("bad interpolation syntax in '{value}'"),
                )
            })?;
            let name = &after[..close];
            let referenced = own
                .get(name)
                .or_else(|| defaults.and_then(|d| d.get(name)))
                .ok_or_else(|| {
                    ConfigError::parse(
                        origin,
                        ConfigFormat::Ini,
                        format!("bad interpolation reference '%({name})s': option not found"),
                    )
                })?;
            out.push_str(&interpolate(referenced, own, defaults, origin, depth + 1)?);
            rest = &after[close + 2..];
        } else {
            return Err(ConfigError::parse(
                origin,
                ConfigFormat::Ini,
                format!("'%' must be followed by '%' or '(' in '{value}'"),
            ));
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Renders sections as ini text.
///
/// Options of non-default sections that merely repeat the default section's
/// value are omitted; they are inherited again on lookup.
pub(crate) fn render(sections: &Sections, default_section: &str) -> String {
    let defaults = sections.get(default_section);
    let mut out = String::new();

    if let Some(defaults) = defaults.filter(|d| !d.is_empty()) {
        render_section(&mut out, default_section, defaults, None);
    }
    for (name, options) in sections {
        if name == default_section {
            continue;
        }
        render_section(&mut out, name, options, defaults);
    }
    out
}

fn render_section(out: &mut String, name: &str, options: &Section, defaults: Option<&Section>) {
    out.push_str(&format!("[{name}]\n"));
    for (key, value) in options {
        if defaults.and_then(|d| d.get(key)) == Some(value) {
            continue;
        }
        let Some(rendered) = value.render_scalar(DEFAULT_LIST_DELIMITER) else {
            tracing::debug!(section = %name, option = %key, "Skipping nested value on ini export");
            continue;
        };
        let escaped = rendered.replace('%', "%%").replace('\n', "\n\t");
        out.push_str(&format!("{key}={escaped}\n"));
    }
    out.push('\n');
}
