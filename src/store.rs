//! The in-memory ledger, its queries, and its persistence to the ledger file.
//!
//! The ledger is an append-only, ordered list of `Transaction`s. Transactions are kept in the
//! order they were appended (oldest first) and no query ever reorders them; showing the most
//! recent first is left to presentation code.
//!
//! Persistence is a whole-file rewrite: `save` serializes every transaction each time it is
//! called. `load` tolerates malformed lines, which are logged and skipped.

use crate::error::{IoAction, IoError};
use crate::model::{Amount, DateRange, Transaction};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// The ledger of transactions held in memory.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger populated from the ledger file at `path`. See `load`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let mut ledger = Self::new();
        let _ = ledger.load(path)?;
        Ok(ledger)
    }

    /// Adds `transaction` to the end of the ledger. Nothing is written to disk; call `save` for
    /// that.
    pub fn append(&mut self, transaction: Transaction) {
        trace!("Appending {transaction}");
        self.transactions.push(transaction);
    }

    /// All transactions in the order they were appended, oldest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Transactions whose calendar day is within `start..=end`. The time of day plays no part.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Transaction> {
        self.in_range(DateRange::new(start, end)).collect()
    }

    /// Transactions whose vendor equals `vendor`, ignoring case. This is not a substring match.
    pub fn by_vendor(&self, vendor: &str) -> Vec<&Transaction> {
        let vendor = vendor.to_lowercase();
        self.transactions
            .iter()
            .filter(|t| t.vendor().to_lowercase() == vendor)
            .collect()
    }

    /// Transactions satisfying every criterion set on `search`.
    pub fn search(&self, search: &Search) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| search.matches(t))
            .collect()
    }

    /// The sum of the amounts of exactly those transactions that `between(start, end)` returns.
    /// Zero when there are none.
    pub fn total(&self, start: NaiveDate, end: NaiveDate) -> Amount {
        self.in_range(DateRange::new(start, end))
            .map(Transaction::amount)
            .sum()
    }

    /// Transactions with a positive amount.
    pub fn deposits(&self) -> Vec<&Transaction> {
        self.transactions.iter().filter(|t| t.is_deposit()).collect()
    }

    /// Transactions with a negative amount. Zero amount transactions are neither deposits nor
    /// payments and appear in neither list.
    pub fn payments(&self) -> Vec<&Transaction> {
        self.transactions.iter().filter(|t| t.is_payment()).collect()
    }

    fn in_range(&self, range: DateRange) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions
            .iter()
            .filter(move |t| range.contains(t.date()))
    }

    /// Replaces the contents of the ledger with the transactions in the file at `path`.
    ///
    /// Lines that cannot be decoded are logged with `warn!` and skipped; the rest of the file is
    /// still loaded. Returns the number of lines that were skipped.
    ///
    /// # Errors
    /// - Returns an `IoError` if the file does not exist or cannot be read.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize, IoError> {
        let path = path.as_ref();
        self.transactions.clear();
        let file = File::open(path).map_err(|e| IoError::new(IoAction::Read, path, e))?;
        let skipped = self
            .read_records(BufReader::new(file), &path.display().to_string())
            .map_err(|e| IoError::new(IoAction::Read, path, e))?;
        debug!(
            "Loaded {} transactions from {}, skipped {skipped} lines",
            self.len(),
            path.display()
        );
        Ok(skipped)
    }

    /// Like `load`, but reads ledger lines from any buffered reader.
    pub fn read_from(&mut self, reader: impl BufRead) -> io::Result<usize> {
        self.transactions.clear();
        self.read_records(reader, "input")
    }

    fn read_records(&mut self, reader: impl BufRead, source: &str) -> io::Result<usize> {
        let mut skipped = 0;
        for (ix, bytes) in reader.split(b'\n').enumerate() {
            let line_number = ix + 1;
            let mut bytes = bytes?;
            if bytes.last() == Some(&b'\r') {
                let _ = bytes.pop();
            }
            let line = match String::from_utf8(bytes) {
                Ok(line) => line,
                Err(_) => {
                    warn!("Skipping line {line_number} of {source}: not valid UTF-8");
                    skipped += 1;
                    continue;
                }
            };
            match line.parse::<Transaction>() {
                Ok(transaction) => self.transactions.push(transaction),
                Err(e) => {
                    warn!("Skipping line {line_number} of {source}: {e}");
                    skipped += 1;
                }
            }
        }
        Ok(skipped)
    }

    /// Writes every transaction, in order, to the file at `path`, replacing its contents.
    ///
    /// The ledger is first written to a temporary file beside `path` which is then renamed over
    /// `path`, so a failed write leaves the previous file in place.
    ///
    /// # Errors
    /// - Returns an `IoError` if the temporary file cannot be written or renamed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let path = path.as_ref();
        let temp = temp_path(path);
        if let Err(e) = self.write_file(&temp) {
            let _ = std::fs::remove_file(&temp);
            return Err(IoError::new(IoAction::Write, path, e));
        }
        std::fs::rename(&temp, path).map_err(|e| IoError::new(IoAction::Write, path, e))?;
        debug!("Saved {} transactions to {}", self.len(), path.display());
        Ok(())
    }

    /// Writes one ledger line per transaction to `writer`.
    pub fn write_to(&self, mut writer: impl Write) -> io::Result<()> {
        for transaction in &self.transactions {
            writeln!(writer, "{}", transaction.to_line())?;
        }
        Ok(())
    }

    fn write_file(&self, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()
    }
}

impl Extend<Transaction> for Ledger {
    fn extend<T: IntoIterator<Item = Transaction>>(&mut self, iter: T) {
        for transaction in iter {
            self.append(transaction);
        }
    }
}

impl FromIterator<Transaction> for Ledger {
    fn from_iter<T: IntoIterator<Item = Transaction>>(iter: T) -> Self {
        let mut ledger = Ledger::new();
        ledger.extend(iter);
        ledger
    }
}

/// `ledger.csv` -> `ledger.csv.tmp`, in the same directory so that the rename stays on one
/// filesystem.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Criteria for `Ledger::search`. Every criterion is optional and unset criteria are ignored, so
/// an empty `Search` matches everything. Set criteria are combined with AND.
///
/// Text criteria are case-insensitive substring matches. Blank text is treated as unset.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Search {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    description: Option<String>,
    vendor: Option<String>,
}

impl Search {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only transactions on or after this day.
    pub fn start(mut self, start: impl Into<Option<NaiveDate>>) -> Self {
        self.start = start.into();
        self
    }

    /// Only transactions on or before this day.
    pub fn end(mut self, end: impl Into<Option<NaiveDate>>) -> Self {
        self.end = end.into();
        self
    }

    /// Only transactions whose description contains `query`.
    pub fn description(mut self, query: impl AsRef<str>) -> Self {
        self.description = lowercase_query(query.as_ref());
        self
    }

    /// Only transactions whose vendor contains `query`.
    pub fn vendor(mut self, query: impl AsRef<str>) -> Self {
        self.vendor = lowercase_query(query.as_ref());
        self
    }

    fn matches(&self, transaction: &Transaction) -> bool {
        let range = DateRange::new(
            self.start.unwrap_or(NaiveDate::MIN),
            self.end.unwrap_or(NaiveDate::MAX),
        );
        range.contains(transaction.date())
            && contains(transaction.description(), self.description.as_deref())
            && contains(transaction.vendor(), self.vendor.as_deref())
    }
}

fn lowercase_query(query: &str) -> Option<String> {
    if query.trim().is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

fn contains(field: &str, query: Option<&str>) -> bool {
    match query {
        None => true,
        Some(query) => field.to_lowercase().contains(query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn txn(at: &str, description: &str, vendor: &str, amount: &str) -> Transaction {
        Transaction::new(
            NaiveDateTime::parse_from_str(at, TIMESTAMP_FORMAT).unwrap(),
            description,
            vendor,
            Amount::new(Decimal::from_str(amount).unwrap()),
        )
    }

    fn three_months() -> Ledger {
        [
            txn("2024-01-10 09:00:00", "paycheck", "Employer", "100.00"),
            txn("2024-02-01 00:00:00", "groceries", "Market", "-30.00"),
            txn("2024-02-15 23:59:59", "refund", "Market", "50.00"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_append_keeps_order() {
        let mut ledger = Ledger::new();
        assert!(ledger.is_empty());
        ledger.append(txn("2024-03-01 00:00:00", "b", "", "1"));
        ledger.append(txn("2024-01-01 00:00:00", "a", "", "2"));
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.transactions()[0].description(), "b");
        assert_eq!(ledger.transactions()[1].description(), "a");
    }

    #[test]
    fn test_between_and_total() {
        let ledger = three_months();
        let found = ledger.between(d("2024-02-01"), d("2024-02-28"));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].description(), "groceries");
        assert_eq!(found[1].description(), "refund");
        assert_eq!(
            ledger.total(d("2024-02-01"), d("2024-02-28")).value(),
            Decimal::from_str("20.00").unwrap()
        );
    }

    #[test]
    fn test_between_single_day_ignores_time_of_day() {
        let ledger = three_months();
        let found = ledger.between(d("2024-02-15"), d("2024-02-15"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].vendor(), "Market");
    }

    #[test]
    fn test_empty_range_totals_zero() {
        let ledger = three_months();
        assert!(ledger.between(d("2023-01-01"), d("2023-12-31")).is_empty());
        assert_eq!(ledger.total(d("2023-01-01"), d("2023-12-31")), Amount::ZERO);
        assert_eq!(ledger.total(d("2024-12-31"), d("2024-01-01")), Amount::ZERO);
        assert_eq!(Ledger::new().total(d("2024-01-01"), d("2024-12-31")), Amount::ZERO);
    }

    #[test]
    fn test_by_vendor_is_case_insensitive_exact() {
        let ledger: Ledger = [
            txn("2024-01-05 10:00:00", "coffee", "CafeCo", "-4.50"),
            txn("2024-01-06 10:00:00", "latte", "CafeCo Express", "-5.25"),
            txn("2024-01-07 10:00:00", "beans", "CAFECO", "-12.00"),
        ]
        .into_iter()
        .collect();
        let found = ledger.by_vendor("cafeco");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].description(), "coffee");
        assert_eq!(found[1].description(), "beans");
        assert!(ledger.by_vendor("cafe").is_empty());
    }

    #[test]
    fn test_search_with_nothing_set_returns_everything() {
        let ledger = three_months();
        assert_eq!(ledger.search(&Search::new()).len(), 3);
        let blank = Search::new().description("  ").vendor("");
        assert_eq!(ledger.search(&blank).len(), 3);
    }

    #[test]
    fn test_search_criteria() {
        let ledger = three_months();

        let found = ledger.search(&Search::new().vendor("mark"));
        assert_eq!(found.len(), 2);

        let found = ledger.search(&Search::new().vendor("MARK").description("REF"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description(), "refund");

        let found = ledger.search(&Search::new().start(d("2024-02-01")));
        assert_eq!(found.len(), 2);

        let found = ledger.search(&Search::new().end(d("2024-02-01")));
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].description(), "groceries");

        let found = ledger.search(
            &Search::new()
                .start(d("2024-01-01"))
                .end(d("2024-01-31"))
                .description("pay"),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].vendor(), "Employer");
    }

    #[test]
    fn test_search_text_never_matches_empty_field() {
        let ledger: Ledger = [txn("2024-01-05 10:00:00", "", "", "-1")].into_iter().collect();
        assert!(ledger.search(&Search::new().description("x")).is_empty());
        assert!(ledger.search(&Search::new().vendor("x")).is_empty());
    }

    #[test]
    fn test_deposits_and_payments_exclude_zero() {
        let mut ledger = three_months();
        ledger.append(txn("2024-03-01 00:00:00", "adjustment", "", "0"));
        assert_eq!(ledger.deposits().len(), 2);
        assert_eq!(ledger.payments().len(), 1);
        assert_eq!(ledger.payments()[0].description(), "groceries");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("transactions.csv");

        let mut ledger = Ledger::new();
        let coffee = txn("2024-01-05 10:00:00", "coffee", "CafeCo", "-4.50");
        ledger.append(coffee.clone());
        ledger.save(&path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "2024-01-05 10:00:00|coffee|CafeCo|-4.50\n"
        );

        let reloaded = Ledger::open(&path).unwrap();
        assert_eq!(reloaded.transactions(), &[coffee]);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("transactions.csv");
        std::fs::write(&path, "old contents\nmore old contents\n").unwrap();

        let ledger: Ledger = [txn("2024-01-05 10:00:00", "a", "b", "1")].into_iter().collect();
        ledger.save(&path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "2024-01-05 10:00:00|a|b|1.00\n"
        );

        Ledger::new().save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_save_to_missing_directory_fails_with_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join("transactions.csv");
        let err = three_months().save(&path).unwrap_err();
        assert_eq!(err.action(), IoAction::Write);
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.csv");
        let mut ledger = three_months();
        let err = ledger.load(&path).unwrap_err();
        assert_eq!(err.action(), IoAction::Read);
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("missing.csv"));
    }

    #[test]
    fn test_load_skips_malformed_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("transactions.csv");
        std::fs::write(
            &path,
            "2024-01-05 10:00:00|coffee|CafeCo|-4.50\r\n\
             this is not a transaction\n\
             \n\
             2024-01-06 10:00:00|lunch|Deli|twelve\n\
             2024-01-07 10:00:00|a|b|c|1.00\n\
             2024-01-08 10:00:00|paycheck|Employer|1500\n",
        )
        .unwrap();

        let mut ledger = three_months();
        let skipped = ledger.load(&path).unwrap();
        assert_eq!(skipped, 4);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.transactions()[0].vendor(), "CafeCo");
        assert_eq!(ledger.transactions()[1].vendor(), "Employer");
    }

    #[test]
    fn test_out_of_range_amounts_are_skipped_and_total_is_safe() {
        let input = "2024-01-05 10:00:00|huge|X|79228162514264337593543950335\n\
                     2024-01-05 11:00:00|big|X|999999999999999.99\n\
                     2024-01-05 12:00:00|small|X|1\n";
        let mut ledger = Ledger::new();
        let skipped = ledger.read_from(input.as_bytes()).unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(ledger.len(), 2);
        assert_eq!(
            ledger.total(d("2024-01-05"), d("2024-01-05")).value(),
            Decimal::from_str("1000000000000000.99").unwrap()
        );
    }

    #[test]
    fn test_read_from_skips_invalid_utf8() {
        let mut input = b"2024-01-05 10:00:00|coffee|CafeCo|-4.50\n".to_vec();
        input.extend_from_slice(&[0xff, 0xfe, b'\n']);
        input.extend_from_slice(b"2024-01-06 10:00:00|tea|CafeCo|-3.00");
        let mut ledger = Ledger::new();
        let skipped = ledger.read_from(input.as_slice()).unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_write_to() {
        let mut out = Vec::new();
        three_months().write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2024-01-10 09:00:00|paycheck|Employer|100.00\n\
             2024-02-01 00:00:00|groceries|Market|-30.00\n\
             2024-02-15 23:59:59|refund|Market|50.00\n"
        );
    }

    #[test]
    fn test_temp_path() {
        assert_eq!(
            temp_path(Path::new("/a/b/transactions.csv")),
            PathBuf::from("/a/b/transactions.csv.tmp")
        );
    }

    prop_compose! {
        fn arb_transaction()(
            day in 0i64..1_461,
            secs in 0i64..86_400,
            description in "[a-zA-Z ]{0,12}",
            vendor in "[a-cA-C]{0,3}",
            cents in -50_000i64..50_000,
        ) -> Transaction {
            let timestamp = d("2022-01-01").and_hms_opt(0, 0, 0).unwrap()
                + chrono::Duration::days(day)
                + chrono::Duration::seconds(secs);
            Transaction::new(timestamp, description, vendor, Amount::new(Decimal::new(cents, 2)))
        }
    }

    fn arb_ledger() -> impl Strategy<Value = Ledger> {
        proptest::collection::vec(arb_transaction(), 0..40).prop_map(Ledger::from_iter)
    }

    fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (0i64..1_461).prop_map(|day| d("2022-01-01") + chrono::Duration::days(day))
    }

    proptest! {
        #[test]
        fn prop_total_agrees_with_between(ledger in arb_ledger(), start in arb_date(), end in arb_date()) {
            let expected: Amount = ledger
                .between(start, end)
                .into_iter()
                .map(Transaction::amount)
                .sum();
            prop_assert_eq!(ledger.total(start, end), expected);
        }

        #[test]
        fn prop_sign_partition(ledger in arb_ledger()) {
            let deposits = ledger.deposits();
            let payments = ledger.payments();
            prop_assert!(deposits.iter().all(|t| !payments.iter().any(|p| std::ptr::eq(*t, *p))));
            let non_zero: Vec<&Transaction> = ledger
                .transactions()
                .iter()
                .filter(|t| !t.amount().is_zero())
                .collect();
            prop_assert_eq!(deposits.len() + payments.len(), non_zero.len());
            prop_assert!(deposits.iter().chain(payments.iter()).all(|t| !t.amount().is_zero()));
        }

        #[test]
        fn prop_search_is_conjunctive(
            ledger in arb_ledger(),
            description in "[a-z]{1,2}",
            vendor in "[a-c]{1,2}",
        ) {
            let both = ledger.search(&Search::new().description(description.as_str()).vendor(vendor.as_str()));
            let by_description = ledger.search(&Search::new().description(description.as_str()));
            let by_vendor = ledger.search(&Search::new().vendor(vendor.as_str()));
            let intersection: Vec<&Transaction> = by_description
                .into_iter()
                .filter(|t| by_vendor.iter().any(|v| std::ptr::eq(*t, *v)))
                .collect();
            prop_assert_eq!(both, intersection);
        }

        #[test]
        fn prop_load_keeps_valid_lines_in_order(
            lines in proptest::collection::vec(
                prop_oneof![
                    arb_transaction().prop_map(Ok::<Transaction, String>),
                    "[a-z|]{0,20}".prop_map(Err::<Transaction, String>),
                ],
                0..30,
            )
        ) {
            let mut text = String::new();
            let mut expected = Vec::new();
            for line in lines {
                match line {
                    Ok(t) => {
                        text.push_str(&t.to_line());
                        expected.push(t);
                    }
                    Err(junk) => text.push_str(&junk),
                }
                text.push('\n');
            }
            let mut ledger = Ledger::new();
            let _ = ledger.read_from(text.as_bytes()).unwrap();
            prop_assert_eq!(ledger.transactions(), expected.as_slice());
        }
    }
}
