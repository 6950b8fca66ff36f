//! These structs provide the CLI interface for the ledger CLI.

use crate::commands::Filter;
use crate::model::{Amount, Period};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// ledger: A command-line tool for keeping track of deposits and payments.
///
/// Transactions are kept in a plain text file, one per line, in the form
/// `yyyy-MM-dd HH:mm:ss|description|vendor|amount`. Deposits have a positive amount and payments a
/// negative amount.
///
/// Run `ledger init` once to create the data directory, then record transactions with
/// `ledger deposit` and `ledger payment`, and look at them with `ledger ledger`, `ledger report`,
/// `ledger vendor` and `ledger search`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, the configuration file and an empty ledger file.
    ///
    /// By default the data directory is $HOME/ledger. Pass --ledger-home or set LEDGER_HOME to put
    /// it somewhere else. An existing ledger file in that directory is left untouched.
    Init,
    /// Record money coming in. The amount is stored as a positive number.
    Deposit(RecordArgs),
    /// Record money going out. The amount is stored as a negative number.
    Payment(RecordArgs),
    /// Show the ledger, most recent first: everything, only deposits, or only payments.
    Ledger(LedgerArgs),
    /// Show the transactions and their total for a calendar period relative to today.
    Report(ReportArgs),
    /// Show the transactions of one vendor. The name must match exactly, ignoring case.
    Vendor(VendorArgs),
    /// Search by any combination of date range, description and vendor. Text matches ignore case
    /// and may be any part of the field.
    Search(SearchArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the ledger and its configuration are held. Defaults to ~/ledger
    #[arg(long, env = "LEDGER_HOME", default_value_t = default_ledger_home())]
    ledger_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, ledger_home: PathBuf) -> Self {
        Self {
            log_level,
            ledger_home: ledger_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn ledger_home(&self) -> &DisplayPath {
        &self.ledger_home
    }
}

/// Args for the `ledger deposit` and `ledger payment` commands.
#[derive(Debug, Parser, Clone)]
pub struct RecordArgs {
    /// What the transaction was for.
    #[arg(long, default_value = "")]
    description: String,

    /// Who the money came from or went to.
    #[arg(long, default_value = "")]
    vendor: String,

    /// The amount, e.g. 12.50 or $1,200. The sign is ignored; deposits are stored positive and
    /// payments negative.
    #[arg(long, allow_hyphen_values = true)]
    amount: Amount,
}

impl RecordArgs {
    pub fn new(description: impl Into<String>, vendor: impl Into<String>, amount: Amount) -> Self {
        Self {
            description: description.into(),
            vendor: vendor.into(),
            amount,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// Args for the `ledger ledger` command.
#[derive(Debug, Parser, Clone)]
pub struct LedgerArgs {
    /// Which transactions to show.
    #[arg(value_enum, default_value_t = Filter::All)]
    filter: Filter,
}

impl LedgerArgs {
    pub fn new(filter: Filter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }
}

/// Args for the `ledger report` command.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// The calendar period to report on.
    #[arg(value_enum)]
    period: Period,
}

impl ReportArgs {
    pub fn new(period: Period) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Period {
        self.period
    }
}

/// Args for the `ledger vendor` command.
#[derive(Debug, Parser, Clone)]
pub struct VendorArgs {
    /// The vendor name.
    name: String,
}

impl VendorArgs {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Args for the `ledger search` command. Leave out any criterion to ignore it.
#[derive(Debug, Parser, Clone, Default)]
pub struct SearchArgs {
    /// The first day to include, as yyyy-MM-dd.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// The last day to include, as yyyy-MM-dd.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Text the description must contain.
    #[arg(long)]
    description: Option<String>,

    /// Text the vendor must contain.
    #[arg(long)]
    vendor: Option<String>,
}

impl SearchArgs {
    pub fn new(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        description: Option<String>,
        vendor: Option<String>,
    ) -> Self {
        Self {
            start,
            end,
            description,
            vendor,
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn vendor(&self) -> Option<&str> {
        self.vendor.as_deref()
    }
}

fn default_ledger_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("ledger"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --ledger-home or LEDGER_HOME instead of relying on the default \
                ledger home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("ledger")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
