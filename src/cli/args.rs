use crate::config::DEFAULT_CONFIG_FILE;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "techradar")]
#[command(about = "Patent-family scoring, eligibility and drift radar", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, env = "TECHRADAR_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the monthly pipeline on one batch
    Run {
        /// Input batch (JSON array of rows)
        input: PathBuf,

        /// Period label for the snapshot, e.g. 2025-06 (defaults to the as-of month)
        #[arg(long)]
        period: Option<String>,

        /// Previous period to diff against (defaults to the month before)
        #[arg(long)]
        previous: Option<String>,

        /// Reference date for freshness, YYYY-MM-DD (defaults to today)
        #[arg(long, value_parser = parse_date)]
        as_of: Option<NaiveDate>,

        /// Output directory (overrides paths.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the sensitivity surface
        #[arg(long)]
        no_sensitivity: bool,

        /// Families shown in the summary table
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Diff two stored snapshots
    Delta {
        /// Current snapshot file
        current: PathBuf,

        /// Previous snapshot file; a missing file counts as an empty period
        previous: PathBuf,

        /// Write the delta report here instead of only printing a summary
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Tier-count sensitivity to weight perturbation for a stored snapshot
    Sensitivity {
        /// Snapshot file
        snapshot: PathBuf,

        /// Write the surface as JSON here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got `{value}`: {e}"))
}

pub fn parse_args() -> Cli {
    Cli::parse()
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
    fn test_parse_run_arguments() {
        let cli = Cli::try_parse_from([
            "techradar", "-vv", "--config", "radar.toml", "run", "batch.json", "--as-of", "2025-06-30",
        ])
        .unwrap();
        assert_eq!(cli.verbosity, 2);
        assert_eq!(cli.config, PathBuf::from("radar.toml"));
        match cli.command {
            Commands::Run { input, as_of, top, .. } => {
                assert_eq!(input, PathBuf::from("batch.json"));
                assert_eq!(as_of, NaiveDate::from_ymd_opt(2025, 6, 30));
                assert_eq!(top, 10);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(Cli::try_parse_from(["techradar", "run", "b.json", "--as-of", "30/06/2025"]).is_err());
    }
}
