use crate::args::LedgerArgs;
use crate::commands::{Filter, Listing, Out};
use crate::store::Ledger;
use crate::{Config, Result};

/// Shows all transactions, only deposits, or only payments, most recent first.
///
/// # Errors
/// - Returns an error if the ledger file cannot be read.
pub fn ledger(config: Config, args: LedgerArgs) -> Result<Out<Listing>> {
    let ledger = Ledger::open(config.ledger_path())?;
    let listing = match args.filter() {
        Filter::All => Listing::new("All Transactions", ledger.transactions()),
        Filter::Deposits => Listing::new("Deposits", ledger.deposits()),
        Filter::Payments => Listing::new("Payments", ledger.payments()),
    };
    Ok(listing.into_out())
}
