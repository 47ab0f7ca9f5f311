//! Uniform access to ini and YAML configuration files.
//!
//! This crate loads a configuration file (local path or remote URL), keeps its
//! sections in memory, and answers option lookups with secret decryption,
//! `${VAR}` expansion, underscore fallbacks and mock-rooted path resolution.

pub mod constants;
mod env;
mod error;
mod format;
mod resolver;
pub mod secret;
mod source;
mod store;
mod value;

pub use env::{env_var_or_none, substitute_env_refs};
pub use error::{ConfigError, Result};
pub use format::ConfigFormat;
pub use resolver::{ConfigResolver, ConfigResolverBuilder, is_qualified_path};
pub use secret::{SecretKey, decrypt_secret, encrypt_secret};
pub use source::{ConfigSource, default_cache_dir, fetch_to_cache};
pub use store::{ConfigStore, Section, Sections};
pub use value::ConfigValue;

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
