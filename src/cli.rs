//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for the enrollment portal.

use clap::{Parser, Subcommand};

/// Enroll Portal - Student enrollment with AI-assisted bios
///
/// Runs an interactive enrollment session: collects student details,
/// optionally drafts a short bio via the Gemini API, and prints the
/// roster of enrolled students.
#[derive(Parser, Debug)]
#[command(name = "enroll")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an interactive enrollment session
    Run {
        /// Path to configuration file
        #[arg(short, long, env = "ENROLL_CONFIG")]
        config: Option<String>,
    },

    /// Display version and build information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Initialize a default configuration file
    Init {
        /// Target path (defaults to the user config directory)
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration as TOML
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Check a configuration file for problems
    Validate {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_config() {
        let cli = Cli::parse_from(["enroll", "run", "--config", "custom.toml"]);
        match cli.command {
            Commands::Run { config } => assert_eq!(config.as_deref(), Some("custom.toml")),
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_parse_verbose_flags() {
        let cli = Cli::parse_from(["enroll", "-vv", "version"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_parse_config_init_force() {
        let cli = Cli::parse_from(["enroll", "config", "init", "--force"]);
        match cli.command {
            Commands::Config {
                subcommand: ConfigSubcommand::Init { force, path },
            } => {
                assert!(force);
                assert!(path.is_none());
            }
            _ => panic!("expected config init"),
        }
    }
}
