use crate::error::FormatError;
use crate::model::Amount;
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The `chrono` pattern for the timestamp field of a ledger line, i.e. `2024-01-05 10:00:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The character separating the fields of a ledger line.
pub const DELIMITER: char = '|';

const FIELD_COUNT: usize = 4;

/// One entry in the ledger. A positive `amount` is a deposit and a negative `amount` is a
/// payment; there is no other type tag.
///
/// A `Transaction` is immutable once constructed. Its canonical text form, produced by `Display`
/// and read back by `FromStr`, is one line of the ledger file:
///
/// ```text
/// 2024-01-05 10:00:00|coffee|CafeCo|-4.50
/// ```
///
/// No escaping is applied to `description` or `vendor`. A value containing `|` (or a newline)
/// produces a line that will not parse again.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    timestamp: NaiveDateTime,
    description: String,
    vendor: String,
    amount: Amount,
}

impl Transaction {
    /// Creates a transaction at `timestamp`. Sub-second precision is discarded since the ledger
    /// file cannot hold it.
    pub fn new(
        timestamp: NaiveDateTime,
        description: impl Into<String>,
        vendor: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            description: description.into(),
            vendor: vendor.into(),
            amount,
        }
    }

    /// Creates a transaction stamped with the current local time.
    pub fn now(description: impl Into<String>, vendor: impl Into<String>, amount: Amount) -> Self {
        Self::new(Local::now().naive_local(), description, vendor, amount)
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// The calendar day of the transaction, ignoring the time of day.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
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

    /// Money in. A zero amount is neither a deposit nor a payment.
    pub fn is_deposit(&self) -> bool {
        self.amount.is_positive()
    }

    /// Money out. A zero amount is neither a deposit nor a payment.
    pub fn is_payment(&self) -> bool {
        self.amount.is_negative()
    }

    /// Encodes the transaction as a ledger line, without a line terminator.
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.description,
            self.vendor,
            self.amount
        )
    }
}

impl FromStr for Transaction {
    type Err = FormatError;

    /// Decodes a ledger line. The description and vendor fields are taken verbatim.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Err(FormatError::FieldCount {
                found: fields.len(),
            });
        }

        let timestamp = parse_timestamp(fields[0]).ok_or_else(|| FormatError::Timestamp {
            value: fields[0].to_string(),
        })?;

        let amount = Amount::parse_plain(fields[3]).map_err(|_| FormatError::Amount {
            value: fields[3].to_string(),
        })?;

        Ok(Transaction::new(timestamp, fields[1], fields[2], amount))
    }
}

/// Parses a timestamp field, requiring the zero-padded form the encoder writes. `chrono` alone
/// would also take `2024-1-5 9:00:00`.
fn parse_timestamp(field: &str) -> Option<NaiveDateTime> {
    let timestamp = NaiveDateTime::parse_from_str(field, TIMESTAMP_FORMAT).ok()?;
    (timestamp.format(TIMESTAMP_FORMAT).to_string() == field).then_some(timestamp)
}
