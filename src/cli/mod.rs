//! Command-line interface for cgmlst-export
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - The `config` and `completion` subcommands

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;

use crate::config::{Config, LogLevel, Overrides};
use crate::error::Result;

/// Export cgMLST allele-call profiles from MongoDB as a BSON stream
#[derive(Parser, Debug)]
#[command(
    name = "cgmlst-export",
    version,
    about = "Export cgMLST profiles from MongoDB as a BSON stream",
    long_about = "Reads every genome with a cgMLST analysis from MongoDB and writes one
minified BSON document per genome to stdout (or --output). Progress and
parse failures are reported on stderr."
)]
pub struct CliArgs {
    /// MongoDB connection URI
    ///
    /// Format: mongodb://[username:password@]host[,host...][:port][/?options]
    #[arg(long, value_name = "URI", env = "CGMLST_EXPORT_URI")]
    pub uri: Option<String>,

    /// Source database name
    #[arg(long, value_name = "NAME", env = "CGMLST_EXPORT_DATABASE")]
    pub database: Option<String>,

    /// Source collection name
    #[arg(long, value_name = "NAME", env = "CGMLST_EXPORT_COLLECTION")]
    pub collection: Option<String>,

    /// Write records to FILE instead of stdout ("-" for stdout)
    #[arg(short = 'o', long, value_name = "FILE", env = "CGMLST_EXPORT_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Documents fetched from the cursor per batch
    #[arg(long, value_name = "N")]
    pub batch_size: Option<u32>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for cgmlst-export
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the effective configuration as TOML
    Config,

    /// Generate shell completion script
    Completion {
        /// Shell type
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Parse the process arguments and load configuration
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Build the interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Validated configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        config.apply_overrides(Overrides {
            uri: args.uri.clone(),
            database: args.database.clone(),
            collection: args.collection.clone(),
            output: args.output.clone(),
            batch_size: args.batch_size,
        });
        Self::apply_logging_args(&mut config, args);

        config.validate()?;
        Ok(config)
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else {
            config.logging.level
        };
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if subcommand was handled, false to run the export
    pub fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Config) => {
                print!("{}", self.config.to_toml_string()?);
                Ok(true)
            }
            Some(Commands::Completion { shell }) => {
                Self::generate_completion(*shell, &mut io::stdout());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Write a shell completion script
    fn generate_completion(shell: Shell, out: &mut dyn io::Write) {
        let mut command = CliArgs::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, out);
    }
}
