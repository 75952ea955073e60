//! Command-line arguments.

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "archiscan",
    version,
    about = "Download archival scans and their concordance",
    long_about = "archiscan downloads the scans of archive inventories.\n\n\
                  Give a collection, inventory and path to fetch one inventory, \
                  or a finding aid (EAD) to fetch every file-level inventory it \
                  describes."
)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "ARCHISCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output root folder (overrides output.root)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Write concordance.json per inventory (true/false)
    #[arg(long, global = true, value_parser = BoolishValueParser::new())]
    pub concordance: Option<bool>,

    /// Summary format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download the scans of one inventory
    Inventory {
        /// Collection number, e.g. 5075
        collection: String,

        /// Inventory number; names the output folder
        inventory: String,

        /// Path of the inventory in the finding aid, e.g. 1.6
        path: String,

        /// Known number of scans (skips the count request)
        #[arg(short = 'n', long)]
        nscans: Option<u64>,

        /// Place the inventory folder under a collection folder
        #[arg(long)]
        nest_by_collection: bool,
    },

    /// Download every file-level inventory of a finding aid
    FindingAid {
        /// URL or local path of the EAD document
        url: String,
    },

    /// List the file-level inventories of a finding aid without downloading
    List {
        /// URL or local path of the EAD document
        url: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_command() {
        let cli = Cli::try_parse_from([
            "archiscan", "inventory", "5075", "169", "1.6", "--nscans", "250",
        ])
        .unwrap();
        match cli.command {
            Command::Inventory {
                collection,
                inventory,
                path,
                nscans,
                nest_by_collection,
            } => {
                assert_eq!(collection, "5075");
                assert_eq!(inventory, "169");
                assert_eq!(path, "1.6");
                assert_eq!(nscans, Some(250));
                assert!(!nest_by_collection);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.concordance, None);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "archiscan",
            "finding-aid",
            "https://example.org/5075.xml",
            "--output",
            "/srv/scans",
            "--concordance",
            "False",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("/srv/scans")));
        assert_eq!(cli.concordance, Some(false));
        assert!(matches!(cli.command, Command::FindingAid { ref url } if url.ends_with(".xml")));
    }

    #[test]
    fn test_inventory_requires_path() {
        assert!(Cli::try_parse_from(["archiscan", "inventory", "5075", "169"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
