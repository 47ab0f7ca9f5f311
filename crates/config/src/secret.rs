//! Secret option encryption.
//!
//! Responsibilities:
//! - Provide AES-256-GCM encryption and decryption of option values.
//! - Resolve the secret key from the environment variable named by the token option.
//!
//! Does NOT handle:
//! - Deciding which options are secret (see `resolver`).
//! - Key storage or rotation.
//!
//! Invariants:
//! - Ciphertext text is base64 of `nonce (12 bytes) || ciphertext + tag`.
//! - Keys are 32 bytes, written as 64 hex characters.
//! - Plaintext and key material are held in `SecretString` / zeroized buffers only.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretBox, SecretString};

use crate::constants::{SECRET_KEY_LEN, SECRET_NONCE_LEN};
use crate::env::env_var_or_none;
use crate::error::{ConfigError, Result};

/// A 32-byte AES-256 key.
pub struct SecretKey(SecretBox<[u8; SECRET_KEY_LEN]>);

impl SecretKey {
    /// Parses a key from 64 hex characters.
    ///
    /// `var` names the key's origin in errors.
    pub fn from_hex(hex_key: &str, var: &str) -> Result<Self> {
        let invalid = || ConfigError::InvalidSecretKey {
            var: var.to_string(),
        };
        let bytes = hex::decode(hex_key.trim()).map_err(|_| invalid())?;
        if bytes.len() != SECRET_KEY_LEN {
            return Err(invalid());
        }
        let mut key = Box::new([0u8; SECRET_KEY_LEN]);
        key.copy_from_slice(&bytes);
        Ok(Self(SecretBox::new(key)))
    }

    /// Reads a hex key from an environment variable.
    ///
    /// `option` is the configuration option that named the variable.
    pub fn from_env(var: &str, option: &str) -> Result<Self> {
        let value = env_var_or_none(var).ok_or_else(|| ConfigError::MissingEnvVar {
            option: option.to_string(),
            var: var.to_string(),
        })?;
        Self::from_hex(&value, var)
    }

    /// Generates a random key, returned as hex for storage in the environment.
    pub fn generate_hex() -> SecretString {
        let key = Aes256Gcm::generate_key(OsRng);
        SecretString::from(hex::encode(key.as_slice()))
    }

    fn cipher(&self) -> Aes256Gcm {
        let key = Key::<Aes256Gcm>::from_slice(self.0.expose_secret());
        Aes256Gcm::new(key)
    }
}

/// Encrypts `plaintext`, returning the text stored in a configuration file.
pub fn encrypt_secret(plaintext: &str, key: &SecretKey) -> Result<String> {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = key
        .cipher()
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|e| ConfigError::SecretEncryption(e.to_string()))?;

    let mut payload = Vec::with_capacity(SECRET_NONCE_LEN + ciphertext.len());
    payload.extend_from_slice(&nonce);
    payload.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(payload))
}

/// Decrypts a stored secret.
///
/// `name` is the option name, used for error context only.
pub fn decrypt_secret(encoded: &str, key: &SecretKey, name: &str) -> Result<SecretString> {
    let failed = |message: &str| ConfigError::SecretDecryption {
        name: name.to_string(),
        message: message.to_string(),
    };

    let payload = STANDARD
        .decode(encoded.trim())
        .map_err(|_| failed("value is not valid base64"))?;
    if payload.len() <= SECRET_NONCE_LEN {
        return Err(failed("value is too short"));
    }
    let (nonce, ciphertext) = payload.split_at(SECRET_NONCE_LEN);

    let plaintext = key
        .cipher()
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| failed("authentication failed (wrong key or corrupted value)"))?;
    let text = String::from_utf8(plaintext).map_err(|_| failed("plaintext is not UTF-8"))?;
    Ok(SecretString::from(text))
}
