//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `commands` module).
//! - Does not load configuration (see `config_context::open_resolver`).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_RESOLVER_PATH";

/// Environment variable naming the mock top path.
pub const MOCK_TOP_PATH_ENV: &str = "CONFIG_RESOLVER_MOCK_TOP_PATH";

#[derive(Parser)]
#[command(name = "config-resolver")]
#[command(about = "Read options from ini and YAML configuration files", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  config-resolver -c setup.cfg get BIRD_REPO_PATH\n  config-resolver -c setup.yml get -s Section1 SubA.Name\n  config-resolver -c setup.cfg --mock-top-path /tmp/mock path DATA_PATH -s Section1\n  config-resolver -c setup.cfg export --to yaml --output-file setup.yml\n  echo -n hunter2 | config-resolver encrypt --key-env CONFIG_SUPPORT_TOKEN_ENV\n"
)]
pub struct Cli {
    /// Path or URL of the configuration file.
    ///
    /// Falls back to `setup.cfg` when neither the flag nor the variable is set.
    #[arg(short, long, global = true, env = CONFIG_PATH_ENV, value_name = "LOCATOR")]
    pub config_path: Option<String>,

    /// Configuration format (ini or yaml); detected from the extension when omitted
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Base directory joined onto relative path options
    #[arg(long, global = true, env = MOCK_TOP_PATH_ENV, value_name = "DIR")]
    pub mock_top_path: Option<PathBuf>,

    /// Name of the ini section every other section inherits from
    #[arg(long, global = true, value_name = "NAME")]
    pub default_section: Option<String>,

    /// Seed the ini default section with the process environment
    #[arg(long, global = true)]
    pub import_environment: bool,

    /// Directory for downloaded configuration files
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Reuse previously downloaded files instead of fetching again
    #[arg(long, global = true)]
    pub use_cache: bool,

    /// Return `${VAR}` references verbatim instead of expanding them
    #[arg(long, global = true)]
    pub no_env_substitution: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the value of an option
    Get {
        /// Option name; dotted names walk nested YAML mappings
        name: String,

        /// Section to read (default section when omitted)
        #[arg(short, long)]
        section: Option<String>,

        /// Value printed when the option or section is absent
        #[arg(long, value_name = "VALUE")]
        default: Option<String>,
    },

    /// Print a path option resolved against the mock top path
    Path {
        /// Option name
        name: String,

        /// Section to read (default section when omitted)
        #[arg(short, long)]
        section: Option<String>,

        /// Option whose value is inserted between the mock top path and the value
        #[arg(long, value_name = "NAME")]
        prefix: Option<String>,

        /// Section holding the prefix option (default section when omitted)
        #[arg(long, value_name = "SECTION", requires = "prefix")]
        prefix_section: Option<String>,
    },

    /// Print the environment variable named by an option
    Env {
        /// Option name
        name: String,

        /// Section to read (default section when omitted)
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Print a list option, one item per line
    List {
        /// Option name
        name: String,

        /// Section to read (default section when omitted)
        #[arg(short, long)]
        section: Option<String>,

        /// Delimiter used to split string values
        #[arg(long, default_value = ",")]
        delimiter: String,
    },

    /// Print a decrypted secret option
    Secret {
        /// Option name
        name: String,

        /// Section to read (default section when omitted)
        #[arg(short, long)]
        section: Option<String>,
    },

    /// List section names
    Sections,

    /// Convert the configuration to another format
    Export {
        /// Target format (defaults to the other supported format)
        #[arg(long, value_name = "FORMAT")]
        to: Option<String>,

        /// Write to a file instead of stdout
        #[arg(long, value_name = "FILE")]
        output_file: Option<PathBuf>,
    },

    /// Encrypt a value read from stdin for use in a `_` option
    Encrypt {
        /// Environment variable holding the hex key
        #[arg(long, value_name = "VAR")]
        key_env: String,
    },

    /// Generate a new hex secret key
    Keygen,
}

impl Commands {
    /// Commands that never touch a configuration file.
    pub fn needs_config(&self) -> bool {
        !matches!(self, Commands::Encrypt { .. } | Commands::Keygen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "config-resolver",
            "get",
            "BIRD_REPO_PATH",
            "-s",
            "Section1",
            "-c",
            "setup.yml",
            "--output",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.config_path.as_deref(), Some("setup.yml"));
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Get { name, section, default } => {
                assert_eq!(name, "BIRD_REPO_PATH");
                assert_eq!(section.as_deref(), Some("Section1"));
                assert!(default.is_none());
            }
            _ => panic!("expected get"),
        }
    }

    #[test]
    fn test_prefix_section_requires_prefix() {
        let result = Cli::try_parse_from([
            "config-resolver",
            "path",
            "DATA_PATH",
            "--prefix-section",
            "DEFAULT",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_keygen_needs_no_config() {
        let cli = Cli::try_parse_from(["config-resolver", "keygen"]).unwrap();
        assert!(!cli.command.needs_config());
        let cli = Cli::try_parse_from(["config-resolver", "sections"]).unwrap();
        assert!(cli.command.needs_config());
    }
}
