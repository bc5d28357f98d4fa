//! CLI subcommand definitions

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::core::RecordType;

/// Record kinds as typed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum RecordKind {
    /// 화물운송: a paid cargo leg
    Transport,
    /// 대기: waiting at a site
    Waiting,
    /// 운행취소: a cancelled trip
    Cancelled,
    /// 운행종료: end of the working run
    Ended,
    /// 주유소: fuel purchase
    Fuel,
    /// 지출: any other expense
    Expense,
    /// 수입: income outside trips
    Income,
    /// 소모품: consumables
    Supply,
    /// 기타
    Other,
}

impl From<RecordKind> for RecordType {
    fn from(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Transport => RecordType::Transport,
            RecordKind::Waiting => RecordType::Waiting,
            RecordKind::Cancelled => RecordType::TripCancelled,
            RecordKind::Ended => RecordType::TripEnded,
            RecordKind::Fuel => RecordType::FuelStop,
            RecordKind::Expense => RecordType::GeneralExpense,
            RecordKind::Income => RecordType::GeneralIncome,
            RecordKind::Supply => RecordType::Supply,
            RecordKind::Other => RecordType::Other,
        }
    }
}

/// Kinds a trip can start as
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum TripKind {
    #[default]
    Transport,
    Waiting,
}

/// Record fields shared by add, start, cancel and edit.
/// Amounts accept "150000", "150,000", "15만" or "15만원".
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct RecordFields {
    /// Pickup place
    #[arg(long)]
    pub(crate) from: Option<String>,
    /// Drop-off place
    #[arg(long)]
    pub(crate) to: Option<String>,
    /// Distance in km
    #[arg(long, value_name = "KM")]
    pub(crate) distance: Option<String>,
    /// Income in won
    #[arg(long, value_name = "AMOUNT")]
    pub(crate) income: Option<String>,
    /// Cost in won
    #[arg(long, value_name = "AMOUNT")]
    pub(crate) cost: Option<String>,
    /// Litres of fuel
    #[arg(long)]
    pub(crate) liters: Option<String>,
    /// Fuel price per litre
    #[arg(long, value_name = "WON")]
    pub(crate) unit_price: Option<String>,
    /// Fuel station brand
    #[arg(long)]
    pub(crate) brand: Option<String>,
    /// Expense item (remembered for later)
    #[arg(long)]
    pub(crate) item: Option<String>,
    /// Supply item
    #[arg(long)]
    pub(crate) supply: Option<String>,
    /// Odometer reading in km
    #[arg(long, value_name = "KM")]
    pub(crate) mileage: Option<String>,
}

/// Text source for the dispatch parser
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct TextInput {
    /// Read dispatch text from FILE instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub(crate) input: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct PeriodArgs {
    /// Year (default: current business year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Month 1-12 (default: current business month)
    #[arg(long)]
    pub(crate) month: Option<u32>,
}

/// Main CLI commands
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show one business day's records with trip timing (default)
    Today {
        /// Business date (YYYYMMDD or YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show daily totals for a month
    Daily(PeriodArgs),
    /// Show weekly totals for a month
    Weekly(PeriodArgs),
    /// Show monthly totals for a year
    Monthly {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Show yearly totals
    Yearly,
    /// Show cumulative figures and this month's fuel subsidy usage
    Summary,
    /// List fuel purchases, newest first
    Fuel {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Register a record
    Add {
        #[arg(value_enum)]
        kind: RecordKind,
        /// Calendar date (default: today)
        #[arg(short, long)]
        date: Option<String>,
        /// Time HH:MM (default: now)
        #[arg(short, long)]
        time: Option<String>,
        #[command(flatten)]
        fields: RecordFields,
    },
    /// Start a trip now
    Start {
        #[arg(long, value_enum, default_value = "transport")]
        kind: TripKind,
        #[command(flatten)]
        fields: RecordFields,
    },
    /// End the working run now
    End,
    /// Record a cancelled trip now
    Cancel {
        #[command(flatten)]
        fields: RecordFields,
    },
    /// Change fields of a record (date and time stay)
    Edit {
        id: i64,
        #[arg(long, value_enum)]
        kind: Option<RecordKind>,
        #[command(flatten)]
        fields: RecordFields,
    },
    /// Move a record's date and time to now
    Restamp { id: i64 },
    /// Delete a record
    Delete { id: i64 },
    /// Propose pickup/drop-off pairs from dispatch text
    Parse {
        #[command(flatten)]
        input: TextInput,
    },
    /// Record a parsed proposal as a transport trip
    Confirm {
        /// Line number shown by `parse`
        #[arg(short, long)]
        line: usize,
        #[command(flatten)]
        input: TextInput,
        /// Replace the proposed pickup name
        #[arg(long)]
        from: Option<String>,
        /// Replace the proposed drop-off name
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        from_address: Option<String>,
        #[arg(long)]
        from_memo: Option<String>,
        #[arg(long)]
        to_address: Option<String>,
        #[arg(long)]
        to_memo: Option<String>,
    },
    /// Manage the center names used by the parser
    Center {
        #[command(subcommand)]
        command: CenterCommands,
    },
    /// Saved addresses and memos
    Location {
        #[command(subcommand)]
        command: LocationCommands,
    },
    /// Show saved income, distance and cost for a route
    Route { from: String, to: String },
    /// Most used pickup and drop-off places over the last two weeks
    Frequent,
    /// Report data-quality issues
    Check,
    /// Show or change the fuel subsidy limit and mileage correction
    Settings {
        /// Monthly fuel subsidy limit in litres
        #[arg(long, value_name = "LITERS")]
        fuel_subsidy_limit: Option<String>,
        /// Kilometres driven before tracking began
        #[arg(long, value_name = "KM")]
        mileage_correction: Option<String>,
    },
    /// Write every table to a backup file
    Export { path: PathBuf },
    /// Replace all data with a backup file
    Import { path: PathBuf },
}

#[derive(Subcommand)]
pub(crate) enum CenterCommands {
    /// Register center names
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Remove a center name
    Remove { name: String },
    /// List centers, optionally filtered
    List { filter: Option<String> },
}

#[derive(Subcommand)]
pub(crate) enum LocationCommands {
    /// Save an address and/or memo for a place
    Set {
        name: String,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        memo: Option<String>,
    },
    /// Show the saved address and memo
    Show { name: String },
}
