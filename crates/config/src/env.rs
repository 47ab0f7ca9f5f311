//! Environment variable helpers.
//!
//! Responsibilities:
//! - Read environment variables with empty/whitespace filtering.
//! - Expand `${VAR}` references inside option values.
//!
//! Does NOT handle:
//! - Deciding which options are dereferenced (see `resolver`).
//! - Importing the whole environment into ini defaults (see `format::ini`).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Unset `${VAR}` references are left in place verbatim.

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            // No trimming needed, return original to avoid allocation
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Replace every `${VAR}` in `value` with the variable's value.
///
/// A bare `$` or an unterminated `${` is copied through unchanged.
pub fn substitute_env_refs(value: &str) -> String {
    if !value.contains("${") {
        return value.to_string();
    }

    let mut result = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            result.push_str(&rest[start..]);
            return result;
        };
        let var_name = &after[..end];
        match std::env::var(var_name) {
            Ok(v) if !var_name.is_empty() => result.push_str(&v),
            _ => {
                tracing::debug!(var = %var_name, "Leaving unresolved environment reference");
                result.push_str(&rest[start..start + 2 + end + 1]);
            }
        }
        rest = &after[end + 1..];
    }
    result.push_str(rest);
    result
}
