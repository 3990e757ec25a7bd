//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Portfolio - content and integration backend for a personal portfolio site
#[derive(Parser, Debug)]
#[command(name = "portfolio")]
#[command(version)]
#[command(about = "Content and integration backend for a personal portfolio site", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration with secrets masked
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_defaults_to_none() {
        let cli = Cli::parse_from(["portfolio"]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["portfolio", "migrate", "-c", "/etc/portfolio.toml"]);
        assert_eq!(cli.command, Some(Commands::Migrate));
        assert_eq!(cli.config.as_deref(), Some("/etc/portfolio.toml"));
    }

    #[test]
    fn test_config_generate_args() {
        let cli = Cli::parse_from(["portfolio", "config", "generate", "out.toml", "--force"]);
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Generate {
                    output_path: Some("out.toml".to_string()),
                    force: true,
                }
            })
        );
    }
}
