//! Command handlers for the ledger CLI.
//!
//! This module contains implementations for all CLI subcommands. Each command loads the ledger
//! fresh from the ledger file, and commands that add a transaction write the whole ledger back
//! before returning.

mod init;
mod list;
mod record;
mod report;
mod search;

use crate::display;
use crate::model::{Amount, Transaction};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use init::init;
pub use list::ledger;
pub use record::{deposit, payment};
pub use report::report;
pub use search::{search, vendor};

/// The output type for a command. This allows the command to return a consistent message,
/// optionally structured data, and optionally text meant for the terminal.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,

    /// Rendered output, such as a table of transactions, to be written to stdout.
    #[serde(skip)]
    display: Option<String>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

/// Which transactions `ledger ledger` shows. Deposits have a positive amount and payments a
/// negative one, so a zero amount transaction only shows up under `all`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every transaction.
    #[default]
    All,
    /// Only transactions with a positive amount.
    Deposits,
    /// Only transactions with a negative amount.
    Payments,
}

serde_plain::derive_display_from_serialize!(Filter);
serde_plain::derive_fromstr_from_deserialize!(Filter);

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
            display: None,
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
            display: None,
        }
    }

    /// Attach text to be written to stdout when printed.
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Get the rendered output, if any.
    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// Print the rendered output (if it exists) to stdout, the message to `info!` and the
    /// structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        if let Some(display) = self.display() {
            print!("{display}");
        }
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// A titled list of transactions, as returned by the commands that show transactions.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Listing {
    title: String,
    /// In ledger order, oldest first.
    transactions: Vec<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<Amount>,
}

impl Listing {
    pub(crate) fn new<'a>(
        title: impl Into<String>,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Self {
        Self {
            title: title.into(),
            transactions: transactions.into_iter().cloned().collect(),
            total: None,
        }
    }

    pub(crate) fn with_total(mut self, total: Amount) -> Self {
        self.total = Some(total);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn total(&self) -> Option<Amount> {
        self.total
    }

    /// Wraps the listing in an `Out` that renders it as a table.
    pub(crate) fn into_out(self) -> Out<Listing> {
        let count = self.transactions.len();
        let message = format!(
            "Found {} transaction{}",
            count,
            if count == 1 { "" } else { "s" }
        );
        let table = display::render(&self.title, &self.transactions, self.total);
        Out::new(message, self).with_display(table)
    }
}
