//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Verbosity of log output
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Export the attribute table of a geospatial dataset to CSV or a spreadsheet
#[derive(Parser, Debug)]
#[command(name = "table-export", version, about)]
pub struct Cli {
    /// Dataset to export (path of a GeoJSON FeatureCollection)
    pub dataset: String,

    /// Output file; an existing file is overwritten
    pub output: PathBuf,

    /// Output format: CSV or XLS
    pub format: String,

    /// Provider version deciding which cursor API is used (e.g. 10.0)
    #[arg(long)]
    pub provider_version: Option<String>,

    /// Config file (default: <config dir>/table-export/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level; RUST_LOG directives refine it
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positionals() {
        let cli = Cli::try_parse_from(["table-export", "parcels.geojson", "out.csv", "CSV"]).unwrap();
        assert_eq!(cli.dataset, "parcels.geojson");
        assert_eq!(cli.output, PathBuf::from("out.csv"));
        assert_eq!(cli.format, "CSV");
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert!(cli.provider_version.is_none());
    }

    #[test]
    fn test_parse_options() {
        let cli = Cli::try_parse_from([
            "table-export",
            "parcels.geojson",
            "out.xlsx",
            "XLS",
            "--provider-version",
            "10.0",
            "--log-level",
            "debug",
            "--no-color",
        ])
        .unwrap();
        assert_eq!(cli.provider_version.as_deref(), Some("10.0"));
        assert_eq!(LevelFilter::from(cli.log_level), LevelFilter::Debug);
        assert!(cli.no_color);
    }

    #[test]
    fn test_all_positionals_required() {
        assert!(Cli::try_parse_from(["table-export", "parcels.geojson", "out.csv"]).is_err());
    }
}
