use crate::args::{SearchArgs, VendorArgs};
use crate::commands::{Listing, Out};
use crate::store::{Ledger, Search};
use crate::{Config, Result};

/// Shows the transactions whose vendor matches `args.name()` exactly, ignoring case.
///
/// # Errors
/// - Returns an error if the ledger file cannot be read.
pub fn vendor(config: Config, args: VendorArgs) -> Result<Out<Listing>> {
    let ledger = Ledger::open(config.ledger_path())?;
    let title = format!("Transactions for Vendor '{}'", args.name());
    Ok(Listing::new(title, ledger.by_vendor(args.name())).into_out())
}

/// Shows the transactions matching every criterion given in `args`. Criteria that are left out
/// or blank are ignored.
///
/// # Errors
/// - Returns an error if the ledger file cannot be read.
pub fn search(config: Config, args: SearchArgs) -> Result<Out<Listing>> {
    let ledger = Ledger::open(config.ledger_path())?;
    let mut criteria = Search::new().start(args.start()).end(args.end());
    if let Some(description) = args.description() {
        criteria = criteria.description(description);
    }
    if let Some(vendor) = args.vendor() {
        criteria = criteria.vendor(vendor);
    }
    Ok(Listing::new("Custom search results", ledger.search(&criteria)).into_out())
}
