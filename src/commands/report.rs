use crate::args::ReportArgs;
use crate::commands::{Listing, Out};
use crate::model::Period;
use crate::store::Ledger;
use crate::{Config, Result};
use chrono::{Local, NaiveDate};

/// Shows the transactions of a calendar period (relative to today) along with their total.
///
/// # Errors
/// - Returns an error if the ledger file cannot be read.
pub fn report(config: Config, args: ReportArgs) -> Result<Out<Listing>> {
    report_on(config, args.period(), Local::now().date_naive())
}

pub(crate) fn report_on(config: Config, period: Period, today: NaiveDate) -> Result<Out<Listing>> {
    let range = period.range(today)?;
    let ledger = Ledger::open(config.ledger_path())?;
    let transactions = ledger.between(range.start(), range.end());
    let total = ledger.total(range.start(), range.end());
    let title = format!("{} ({range})", period.title());
    Ok(Listing::new(title, transactions).with_total(total).into_out())
}
