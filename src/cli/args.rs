//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::Config;
use crate::consts::{DEFAULT_QUOTA_CEILING, DEFAULT_REFRESH_DAYS, DEFAULT_REGIONS_FILE};
use crate::store::StoreKind;

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "region-demand")]
#[command(about = "Per-region video demand collector with incremental fetch and quota budgeting", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Config file (default: ~/.config/region-demand/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Run as if today were this date (YYYYMMDD or YYYY-MM-DD)
    #[arg(long, global = true, value_name = "DATE")]
    pub(crate) as_of: Option<String>,

    /// Days that must pass before a concept is fetched again
    #[arg(long = "refresh-days", global = true, value_name = "N")]
    pub(crate) refresh_days: Option<u32>,

    /// Quota units this run may spend
    #[arg(long, global = true, value_name = "N")]
    pub(crate) quota_ceiling: Option<u64>,

    /// Only this concept, ignoring rotation
    #[arg(long, global = true, value_name = "LABEL")]
    pub(crate) concept: Option<String>,

    /// Region code list, one code per line
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) regions_file: Option<PathBuf>,

    /// Use only the first N regions
    #[arg(long, global = true, value_name = "N")]
    pub(crate) limit_regions: Option<usize>,

    /// Fetch every selected concept even if it is not due
    #[arg(long, global = true)]
    pub(crate) force: bool,

    /// Fetch record back end
    #[arg(long, global = true, value_enum)]
    pub(crate) store: Option<StoreKind>,

    /// Directory holding the fetch record and quota ledger
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) state_dir: Option<PathBuf>,

    /// Directory for per-concept CSV files
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) output_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        if self.refresh_days.is_none() {
            self.refresh_days = config.refresh_interval_days;
        }
        if self.quota_ceiling.is_none() {
            self.quota_ceiling = config.quota_ceiling;
        }
        if self.store.is_none() {
            self.store = config.store;
        }
        if self.regions_file.is_none() {
            self.regions_file = config.regions_file.clone();
        }
        if self.state_dir.is_none() {
            self.state_dir = config.state_dir.clone();
        }
        if self.output_dir.is_none() {
            self.output_dir = config.output_dir.clone();
        }

        self
    }

    pub(crate) fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Run)
    }

    pub(crate) fn refresh_days(&self) -> u32 {
        self.refresh_days.unwrap_or(DEFAULT_REFRESH_DAYS)
    }

    pub(crate) fn quota_ceiling(&self) -> u64 {
        self.quota_ceiling.unwrap_or(DEFAULT_QUOTA_CEILING)
    }

    pub(crate) fn store(&self) -> StoreKind {
        self.store.unwrap_or_default()
    }

    pub(crate) fn regions_file(&self) -> PathBuf {
        self.regions_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REGIONS_FILE))
    }

    pub(crate) fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub(crate) fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}
