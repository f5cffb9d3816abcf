pub mod completions;
pub mod element;
pub mod have;
pub mod list;
pub mod setup;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pdpatch - Inspect Pure Data patch files
#[derive(Parser, Debug)]
#[command(name = "pdpatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: $PDPATCH_CONFIG or the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show information about patch files
    List(list::ListArgs),

    /// Check where objects are available
    Have(have::HaveArgs),

    /// Print the attribute names of a built-in element or object
    Element(element::ElementArgs),

    /// Edit include directories and name matching in the config file
    Setup(setup::SetupArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pdpatch", "list", "a.pd", "--verbose", "--config", "c.yaml"]).unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("c.yaml")));
        assert!(matches!(cli.command, Commands::List(_)));
    }
}
