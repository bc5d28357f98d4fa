//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode, ConfigSortOrder, ConfigUnit};
use crate::output::MoneyUnit;

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub(crate) enum SortOrder {
    /// Oldest first
    Asc,
    /// Newest first (default)
    #[default]
    Desc,
}

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

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum UnitArg {
    /// Whole won (default)
    #[default]
    Won,
    /// 만원 (10,000 won) with two decimals
    Manwon,
}

#[derive(Parser)]
#[command(name = "haulbook")]
#[command(about = "Trip and expense ledger for freight drivers", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Sort order for period tables
    #[arg(short, long, global = true, value_enum)]
    pub(crate) order: Option<SortOrder>,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub(crate) color: Option<ColorMode>,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub(crate) debug: bool,

    /// Compact output (fewer columns, shorter numbers)
    #[arg(short = 'c', long, global = true)]
    pub(crate) compact: bool,

    /// Timezone for "now" (e.g., "Asia/Seoul", "UTC", "local")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Locale for number formatting (e.g., "ko", "en", "de")
    #[arg(long, global = true, value_name = "LOCALE")]
    pub(crate) locale: Option<String>,

    /// Money unit for tables
    #[arg(long, global = true, value_enum)]
    pub(crate) unit: Option<UnitArg>,

    /// Hour (0-23) at which a business day starts
    #[arg(long, global = true, value_name = "HOUR")]
    pub(crate) day_start_hour: Option<u32>,

    /// Data file (overrides config and HAULBOOK_DATA)
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) data_file: Option<PathBuf>,

    #[arg(skip)]
    fuel_subsidy_limit: Option<f64>,

    #[arg(skip)]
    mileage_correction: Option<f64>,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // For boolean flags, config only applies if CLI is false (default)
        if !self.compact && config.compact {
            self.compact = true;
        }
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        if self.order.is_none() {
            self.order = config.order.map(|order| match order {
                ConfigSortOrder::Asc => SortOrder::Asc,
                ConfigSortOrder::Desc => SortOrder::Desc,
            });
        }
        if self.color.is_none() {
            self.color = config.color.map(|color| match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            });
        }
        if self.unit.is_none() {
            self.unit = config.unit.map(|unit| match unit {
                ConfigUnit::Won => UnitArg::Won,
                ConfigUnit::Manwon => UnitArg::Manwon,
            });
        }

        // String options: only apply if CLI didn't set them
        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }
        if self.locale.is_none() {
            self.locale = config.locale.clone();
        }
        if self.day_start_hour.is_none() {
            self.day_start_hour = config.day_start_hour;
        }
        if self.data_file.is_none() {
            self.data_file = std::env::var_os("HAULBOOK_DATA")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .or_else(|| config.data_file.clone());
        }
        self.fuel_subsidy_limit = config.fuel_subsidy_limit;
        self.mileage_correction = config.mileage_correction;

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color.unwrap_or_default() {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    pub(crate) fn sort_order(&self) -> SortOrder {
        self.order.unwrap_or_default()
    }

    pub(crate) fn money_unit(&self) -> MoneyUnit {
        match self.unit.unwrap_or_default() {
            UnitArg::Won => MoneyUnit::Won,
            UnitArg::Manwon => MoneyUnit::Manwon,
        }
    }

    /// Config override for the subsidy limit stored in the data file
    pub(crate) fn fuel_subsidy_limit(&self) -> Option<f64> {
        self.fuel_subsidy_limit
    }

    /// Config override for the mileage correction stored in the data file
    pub(crate) fn mileage_correction(&self) -> Option<f64> {
        self.mileage_correction
    }
}
