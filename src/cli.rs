use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::startup;

#[derive(Parser)]
#[command(name = "face-gateway")]
#[command(about = "Face Gateway - face comparison with image and transaction storage", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Validate configuration and print a report
    Config,
}

/// Returns `false` when the configuration has errors.
pub fn handle_config_validate(config: &Config) -> bool {
    let report = startup::validate_config(config);
    report.print();
    report.is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["face-gateway"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["face-gateway", "serve"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Serve));

        let cli = Cli::try_parse_from(["face-gateway", "config"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Config));

        assert!(Cli::try_parse_from(["face-gateway", "migrate"]).is_err());
    }
}
