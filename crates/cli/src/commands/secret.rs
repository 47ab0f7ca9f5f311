//! Secret commands: read a decrypted option, encrypt a value, generate a key.

use anyhow::{Context, Result};
use config_resolver::{ConfigResolver, SecretKey, encrypt_secret};
use secrecy::ExposeSecret;
use std::io::Read;

use super::{OptionOutput, emit};
use crate::args::OutputFormat;

pub fn run_secret(
    resolver: &ConfigResolver,
    name: &str,
    section: Option<&str>,
    output: OutputFormat,
) -> Result<()> {
    let secret = resolver
        .get_secret(name, section)
        .with_context(|| format!("Failed to read secret option '{name}'"))?;
    let value = secret.expose_secret();
    emit(
        output,
        value,
        &OptionOutput {
            section: section.unwrap_or(resolver.default_section_name()),
            name,
            value,
        },
    )
}

/// Encrypts the text read from `input`. One trailing newline is dropped.
pub fn run_encrypt(key_env: &str, mut input: impl Read, output: OutputFormat) -> Result<()> {
    let key = SecretKey::from_env(key_env, "--key-env")
        .with_context(|| format!("Failed to read secret key from {key_env}"))?;

    let mut plaintext = String::new();
    input
        .read_to_string(&mut plaintext)
        .context("Failed to read plaintext from stdin")?;
    let plaintext = plaintext
        .strip_suffix('\n')
        .map(|s| s.strip_suffix('\r').unwrap_or(s))
        .unwrap_or(&plaintext);

    let encoded = encrypt_secret(plaintext, &key).context("Failed to encrypt value")?;
    emit(output, &encoded, &serde_json::json!({ "value": encoded }))
}

pub fn run_keygen(output: OutputFormat) -> Result<()> {
    let key = SecretKey::generate_hex();
    let key = key.expose_secret();
    emit(output, key, &serde_json::json!({ "key": key }))
}
