//! Raw configuration values.
//!
//! ini files only ever produce strings; YAML files may produce any scalar,
//! lists, and nested mappings. `ConfigValue` covers both.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single option value as stored in a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ConfigValue>),
    Map(IndexMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Returns the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested mapping, if this is a mapping.
    pub fn as_map(&self) -> Option<&IndexMap<String, ConfigValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the list elements, if this is a list.
    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// True for strings, numbers, booleans and null.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Walks nested mappings following `keys`.
    pub fn get_path<'a, I>(&self, keys: I) -> Option<&ConfigValue>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut current = self;
        for key in keys {
            current = current.as_map()?.get(key)?;
        }
        Some(current)
    }

    /// Applies `f` to every string in this value, recursing into lists and mappings.
    pub(crate) fn map_strings<F>(self, f: &F) -> Self
    where
        F: Fn(String) -> String,
    {
        match self {
            Self::String(s) => Self::String(f(s)),
            Self::List(items) => Self::List(items.into_iter().map(|v| v.map_strings(f)).collect()),
            Self::Map(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (k, v.map_strings(f)))
                    .collect(),
            ),
            other => other,
        }
    }

    /// Renders a scalar the way it reads in an ini file.
    ///
    /// Lists are joined with `delimiter`; mappings have no ini rendering.
    pub fn render_scalar(&self, delimiter: &str) -> Option<String> {
        match self {
            Self::Null => Some(String::new()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(x) => Some(x.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::List(items) => {
                let rendered: Option<Vec<String>> =
                    items.iter().map(|v| v.render_scalar(delimiter)).collect();
                rendered.map(|parts| parts.join(delimiter))
            }
            Self::Map(_) => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Map(map) => {
                let parts: Vec<String> = map.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            scalar => f.write_str(&scalar.render_scalar(",").unwrap_or_default()),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for ConfigValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_yaml::Value> for ConfigValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s),
            Value::Sequence(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Mapping(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (yaml_key_to_string(k), Self::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

/// Mapping keys become strings; scalar keys keep their textual form.
pub(crate) fn yaml_key_to_string(key: serde_yaml::Value) -> String {
    use serde_yaml::Value;
    match key {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => ConfigValue::from(other).to_string(),
    }
}
