//! Header discovery: locating the description, amount, and rate columns.

use serde::Serialize;

use crate::table::{Cell, Table};

/// Number of leading rows scanned for a header row.
pub const HEADER_SCAN_ROWS: usize = 10;

/// Where the interesting columns live in one sheet.
///
/// Located once per sheet and carried alongside its rows; every later lookup
/// indexes through this map instead of re-scanning headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    /// Zero-based index of the row the headers were found in.
    pub header_row: usize,
    pub description: usize,
    pub credit: Option<usize>,
    pub debit: Option<usize>,
    pub fx_rate: Option<usize>,
}

/// Scan the first [`HEADER_SCAN_ROWS`] rows for a cell whose normalized text
/// is exactly `description`. The first such cell, row-major, wins; the other
/// columns are then located within that same row.
///
/// Returns `None` when no description header exists in the scanned window.
pub fn locate(table: &Table) -> Option<ColumnMap> {
    let limit = HEADER_SCAN_ROWS.min(table.rows.len());
    for (row_index, row) in table.rows[..limit].iter().enumerate() {
        for (col_index, cell) in row.iter().enumerate() {
            if cell.normalized() == "description" {
                return Some(ColumnMap {
                    header_row: row_index,
                    description: col_index,
                    credit: find_amount_column(row, "credit", "cr"),
                    debit: find_amount_column(row, "debit", "dr"),
                    fx_rate: find_fx_rate_column(row),
                });
            }
        }
    }
    None
}

/// First column in `row` whose header names an amount of the given kind:
/// contains the name, equals the short alias, or contains `amount <name>`.
fn find_amount_column(row: &[Cell], name: &str, alias: &str) -> Option<usize> {
    let amount_name = format!("amount {}", name);
    row.iter().position(|cell| {
        let text = cell.normalized();
        text.contains(name) || text == alias || text.contains(&amount_name)
    })
}

fn find_fx_rate_column(row: &[Cell]) -> Option<usize> {
    row.iter().position(|cell| cell.normalized().contains("fxrate"))
}
