//! Types that represent the core data model, such as `Transaction` and `Amount`.
mod amount;
mod period;
mod transaction;

pub use amount::{Amount, AmountError};
pub use period::{DateRange, Period};
pub use transaction::{Transaction, DELIMITER, TIMESTAMP_FORMAT};
