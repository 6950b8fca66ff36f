//! Handlers for the commands that add a transaction to the ledger.

use crate::args::RecordArgs;
use crate::commands::Out;
use crate::model::{Amount, Transaction};
use crate::store::Ledger;
use crate::{Config, Result};
use anyhow::{ensure, Context};
use tracing::debug;

/// Adds a deposit stamped with the current time and saves the ledger.
///
/// The sign of the given amount is ignored; deposits are stored as positive amounts.
///
/// # Errors
/// - Returns an error if the amount is zero.
/// - Returns an error if the ledger file cannot be read or written.
pub fn deposit(config: Config, args: RecordArgs) -> Result<Out<Transaction>> {
    let amount = args.amount().abs();
    record(config, args, amount, "Deposit")
}

/// Adds a payment stamped with the current time and saves the ledger.
///
/// The sign of the given amount is ignored; payments are stored as negative amounts.
///
/// # Errors
/// - Returns an error if the amount is zero.
/// - Returns an error if the ledger file cannot be read or written.
pub fn payment(config: Config, args: RecordArgs) -> Result<Out<Transaction>> {
    let amount = -args.amount().abs();
    record(config, args, amount, "Payment")
}

fn record(config: Config, args: RecordArgs, amount: Amount, kind: &str) -> Result<Out<Transaction>> {
    // A zero amount would be neither a deposit nor a payment.
    ensure!(!amount.is_zero(), "{kind} amount must not be zero");

    let path = config.ledger_path();
    let mut ledger = Ledger::open(&path)?;
    let transaction = Transaction::now(args.description(), args.vendor(), amount);
    debug!("Recording {transaction}");
    ledger.append(transaction.clone());
    ledger
        .save(&path)
        .with_context(|| format!("The {} was not recorded", kind.to_lowercase()))?;

    Ok(Out::new(format!("{kind} added successfully"), transaction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn args(amount: &str) -> RecordArgs {
        RecordArgs::new("coffee", "CafeCo", Amount::from_str(amount).unwrap())
    }

    #[test]
    fn test_deposit_is_positive() {
        let env = TestEnv::new();
        let out = deposit(env.config(), args("-25")).unwrap();
        let recorded = out.structure().unwrap();
        assert_eq!(recorded.amount().value(), Decimal::new(2500, 2));
        assert!(recorded.is_deposit());
        assert_eq!(out.message(), "Deposit added successfully");
    }

    #[test]
    fn test_payment_is_negative() {
        let env = TestEnv::new();
        let out = payment(env.config(), args("4.50")).unwrap();
        assert_eq!(
            out.structure().unwrap().amount().value(),
            Decimal::new(-450, 2)
        );
    }

    #[test]
    fn test_record_appends_and_saves() {
        let env = TestEnv::new();
        env.write_lines(&["2024-01-05 10:00:00|old|Somewhere|1.00"]);

        deposit(env.config(), args("10")).unwrap();
        payment(env.config(), args("3")).unwrap();

        let ledger = env.ledger();
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.transactions()[0].description(), "old");
        assert!(ledger.transactions()[1].is_deposit());
        assert!(ledger.transactions()[2].is_payment());
        assert_eq!(ledger.transactions()[2].vendor(), "CafeCo");
    }

    #[test]
    fn test_zero_amount_is_rejected() {
        let env = TestEnv::new();
        let err = deposit(env.config(), args("0")).unwrap_err();
        assert!(err.to_string().contains("must not be zero"));
        assert!(env.ledger().is_empty());
    }

    #[test]
    fn test_missing_ledger_file_is_an_error() {
        let env = TestEnv::new();
        std::fs::remove_file(env.config().ledger_path()).unwrap();
        let err = payment(env.config(), args("1")).unwrap_err();
        assert!(err.to_string().contains("transactions.csv"));
    }
}
