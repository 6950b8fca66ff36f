//! Renders transactions as a box-drawn table for the terminal.

use crate::model::{Amount, Transaction, TIMESTAMP_FORMAT};
use std::fmt::Write;

const DATE_TIME_WIDTH: usize = 21;
const DESCRIPTION_WIDTH: usize = 40;
const VENDOR_WIDTH: usize = 30;
const AMOUNT_WIDTH: usize = 15;
const WIDTHS: [usize; 4] = [DATE_TIME_WIDTH, DESCRIPTION_WIDTH, VENDOR_WIDTH, AMOUNT_WIDTH];

const ELLIPSIS: &str = "...";
const EMPTY: &str = "No transactions to display.";

/// Renders `transactions` under a `title` banner, most recent first. When `total` is given it is
/// printed below the table.
///
/// `transactions` are expected in ledger order (oldest first); the reversal happens here.
pub fn render(title: &str, transactions: &[Transaction], total: Option<Amount>) -> String {
    let mut out = String::new();
    if !title.trim().is_empty() {
        let rule = "=".repeat(title.chars().count() + 4);
        let _ = writeln!(out, "{rule}\n= {title} =\n{rule}");
    }

    if transactions.is_empty() {
        let _ = writeln!(out, "{EMPTY}");
    } else {
        out.push_str(&border('┌', '┬', '┐'));
        out.push_str(&row([
            center("Date/Time", DATE_TIME_WIDTH),
            center("Description", DESCRIPTION_WIDTH),
            center("Vendor", VENDOR_WIDTH),
            center("Amount", AMOUNT_WIDTH),
        ]));
        out.push_str(&border('├', '┼', '┤'));
        for t in transactions.iter().rev() {
            out.push_str(&row([
                format!(
                    "{:<DATE_TIME_WIDTH$}",
                    t.timestamp().format(TIMESTAMP_FORMAT).to_string()
                ),
                left(t.description(), DESCRIPTION_WIDTH),
                left(t.vendor(), VENDOR_WIDTH),
                format!("{:>AMOUNT_WIDTH$}", t.amount().money()),
            ]));
        }
        out.push_str(&border('└', '┴', '┘'));
    }

    if let Some(total) = total {
        let _ = writeln!(out, "Total: {}", total.money());
    }
    out
}

fn border(left: char, cross: char, right: char) -> String {
    let segments: Vec<String> = WIDTHS.iter().map(|w| "─".repeat(*w)).collect();
    let cross = cross.to_string();
    format!("{left}{}{right}\n", segments.join(cross.as_str()))
}

fn row(cells: [String; 4]) -> String {
    format!("│{}│\n", cells.join("│"))
}

/// Left aligns `text` in `width` characters, cutting it short with `...` when it does not fit.
fn left(text: &str, width: usize) -> String {
    format!("{:<width$}", truncate(text, width))
}

fn center(text: &str, width: usize) -> String {
    format!("{:^width$}", truncate(text, width))
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text
        .chars()
        .take(width.saturating_sub(ELLIPSIS.len()))
        .collect();
    format!("{kept}{ELLIPSIS}")
}
