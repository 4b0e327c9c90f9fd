// Human report rendering: the stdout tables for `compare` and `run`.
//
// Carries the same records the JSON output does, shaped for a terminal.
// Long descriptions are truncated; widths are fixed, not content-sized.

use ledgerlens_recon::model::{MatchRecord, ReconcileResult, UniqueRecord};
use ledgerlens_recon::table::Cell;

const DESCRIPTION_WIDTH: usize = 40;
const AMOUNT_WIDTH: usize = 12;
const SEPARATOR_WIDTH: usize = 100;

pub fn print_report(result: &ReconcileResult, wallet1_name: &str, wallet2_name: &str) {
    print_matches(&result.matches, wallet1_name, wallet2_name);
    println!();
    print_bank_uniques(&result.unique);
    println!();
    print_wallet_uniques(&result.unique_in_wallets);
}

fn print_matches(matches: &[MatchRecord], wallet1_name: &str, wallet2_name: &str) {
    println!("Matches ({})", matches.len());
    if matches.is_empty() {
        return;
    }
    println!(
        "{:>5}  {:<dw$}  {:>aw$}  {:>aw$}  {:<21}  {}",
        "ROW",
        "DESCRIPTION",
        "DEBIT",
        "CREDIT",
        "MATCH TYPE",
        "FOUND IN",
        dw = DESCRIPTION_WIDTH,
        aw = AMOUNT_WIDTH,
    );
    println!("{}", "-".repeat(SEPARATOR_WIDTH));
    for record in matches {
        println!(
            "{:>5}  {:<dw$}  {:>aw$}  {:>aw$}  {:<21}  {}",
            record.row_number,
            truncate_display(&record.description, DESCRIPTION_WIDTH),
            truncate_display(&record.debit, AMOUNT_WIDTH),
            truncate_display(&record.credit, AMOUNT_WIDTH),
            record.kind().label(),
            found_in(record, wallet1_name, wallet2_name),
            dw = DESCRIPTION_WIDTH,
            aw = AMOUNT_WIDTH,
        );
    }
}

fn print_bank_uniques(unique: &[UniqueRecord]) {
    println!("Unique in bank sheet ({})", unique.len());
    if unique.is_empty() {
        return;
    }
    println!(
        "{:>5}  {:<dw$}  {:>aw$}  {:>aw$}  {:>aw$}",
        "ROW",
        "DESCRIPTION",
        "DEBIT",
        "CREDIT",
        "BALANCE",
        dw = DESCRIPTION_WIDTH,
        aw = AMOUNT_WIDTH,
    );
    println!("{}", "-".repeat(SEPARATOR_WIDTH));
    for record in unique {
        println!(
            "{:>5}  {:<dw$}  {:>aw$}  {:>aw$}  {:>aw$}",
            record.row_number,
            truncate_display(&record.description, DESCRIPTION_WIDTH),
            truncate_display(&record.debit, AMOUNT_WIDTH),
            truncate_display(&record.credit, AMOUNT_WIDTH),
            truncate_display(&balance_text(&record.cells), AMOUNT_WIDTH),
            dw = DESCRIPTION_WIDTH,
            aw = AMOUNT_WIDTH,
        );
    }
}

fn print_wallet_uniques(unique: &[UniqueRecord]) {
    println!("Unique in wallets ({})", unique.len());
    if unique.is_empty() {
        return;
    }
    println!(
        "{:<9}  {:>5}  {:<dw$}  {:>aw$}  {:>aw$}",
        "SHEET",
        "ROW",
        "DESCRIPTION",
        "DEBIT",
        "CREDIT",
        dw = DESCRIPTION_WIDTH,
        aw = AMOUNT_WIDTH,
    );
    println!("{}", "-".repeat(SEPARATOR_WIDTH));
    for record in unique {
        println!(
            "{:<9}  {:>5}  {:<dw$}  {:>aw$}  {:>aw$}",
            record.set.as_str(),
            record.row_number,
            truncate_display(&record.description, DESCRIPTION_WIDTH),
            truncate_display(&record.debit, AMOUNT_WIDTH),
            truncate_display(&record.credit, AMOUNT_WIDTH),
            dw = DESCRIPTION_WIDTH,
            aw = AMOUNT_WIDTH,
        );
    }
}

fn found_in(record: &MatchRecord, wallet1_name: &str, wallet2_name: &str) -> String {
    let mut names = Vec::new();
    if record.found_in_wallet1() {
        names.push(wallet1_name);
    }
    if record.found_in_wallet2() {
        names.push(wallet2_name);
    }
    names.join(", ")
}

fn balance_text(cells: &[Cell]) -> String {
    cells.last().map(Cell::display).unwrap_or_default()
}

/// Truncate a string to fit within width, adding ".." if truncated.
/// Handles UTF-8 safely by counting chars, not bytes.
fn truncate_display(s: &str, width: usize) -> String {
    if width < 3 {
        return s.chars().next().map(|c| c.to_string()).unwrap_or_default();
    }

    let char_count = s.chars().count();
    if char_count <= width {
        return s.to_string();
    }

    let truncated: String = s.chars().take(width - 2).collect();
    format!("{}..", truncated)
}
