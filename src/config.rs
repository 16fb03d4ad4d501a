//! Command line and environment configuration.

use crate::analytics::Economics;
use crate::error::{DataError, Result};
use crate::loader::DataSource;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8050";

/// Olist growth briefing: marketplace economics served as JSON
#[derive(Debug, Parser)]
#[command(name = "olist-briefing", version)]
#[command(about = "Seller economics and growth levers for the Olist marketplace")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the Olist CSV exports
    #[arg(long, env = "OLIST_CSV_DIR", global = true)]
    pub csv_dir: Option<PathBuf>,

    /// SQLite database holding the Olist tables
    #[arg(long, env = "OLIST_SQLITE", global = true, conflicts_with = "csv_dir")]
    pub sqlite: Option<PathBuf>,

    /// Bind address for `serve`
    #[arg(long, env = "OLIST_ADDR", default_value = DEFAULT_ADDR, global = true)]
    pub addr: String,

    /// Platform commission on item prices
    #[arg(long, global = true)]
    pub commission_rate: Option<f64>,

    /// Monthly subscription fee per seller, in BRL
    #[arg(long, global = true)]
    pub subscription_fee: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Serve the briefing over HTTP (default)
    Serve,
    /// Print the computed dashboard payload as JSON
    Report {
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}

impl Cli {
    /// The subcommand to run, `serve` when none is given.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }

    pub fn data_source(&self) -> Result<DataSource> {
        match (&self.csv_dir, &self.sqlite) {
            (Some(dir), _) => Ok(DataSource::CsvDirectory(dir.clone())),
            #[cfg(feature = "ssr")]
            (None, Some(path)) => Ok(DataSource::Sqlite(path.clone())),
            _ => Err(DataError::MissingSource),
        }
    }

    /// Default economics with the command line overrides applied.
    pub fn economics(&self) -> Economics {
        let defaults = Economics::default();
        Economics {
            commission_rate: self.commission_rate.unwrap_or(defaults.commission_rate),
            subscription_fee: self.subscription_fee.unwrap_or(defaults.subscription_fee),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("olist-briefing").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn csv_directory_is_the_data_source() {
        let cli = parse(&["--csv-dir", "data/raw", "report"]);
        assert_eq!(
            cli.data_source().unwrap(),
            DataSource::CsvDirectory(PathBuf::from("data/raw"))
        );
        assert_eq!(cli.command(), Commands::Report { pretty: false });
    }

    #[cfg(feature = "ssr")]
    #[test]
    fn sqlite_is_the_data_source() {
        let cli = parse(&["serve", "--sqlite", "olist.db", "--addr", "0.0.0.0:9000"]);
        assert_eq!(cli.data_source().unwrap(), DataSource::Sqlite(PathBuf::from("olist.db")));
        assert_eq!(cli.command(), Commands::Serve);
        assert_eq!(cli.addr, "0.0.0.0:9000");
    }

    #[test]
    fn address_applies_without_a_subcommand() {
        let cli = parse(&["--csv-dir", "data/raw", "--addr", "0.0.0.0:9100"]);
        assert_eq!(cli.command(), Commands::Serve);
        assert_eq!(cli.addr, "0.0.0.0:9100");

        let cli = parse(&["--csv-dir", "data/raw"]);
        let expected = std::env::var("OLIST_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        assert_eq!(cli.addr, expected);
    }

    #[test]
    fn both_sources_conflict() {
        let args = ["olist-briefing", "--csv-dir", "a", "--sqlite", "b"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn economics_overrides_keep_the_it_model() {
        let cli = parse(&["--commission-rate", "0.12", "--subscription-fee", "99", "report", "--pretty"]);
        let eco = cli.economics();
        assert_eq!(eco.commission_rate, 0.12);
        assert_eq!(eco.subscription_fee, 99.0);
        assert_eq!(eco.alpha_it, Economics::default().alpha_it);
        assert_eq!(cli.command(), Commands::Report { pretty: true });
    }

    #[test]
    fn no_source_is_an_error() {
        let cli = Cli {
            command: None,
            csv_dir: None,
            sqlite: None,
            addr: DEFAULT_ADDR.to_string(),
            commission_rate: None,
            subscription_fee: None,
        };
        assert!(matches!(cli.data_source(), Err(DataError::MissingSource)));
        assert_eq!(cli.economics(), Economics::default());
    }
}
