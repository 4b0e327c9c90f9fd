//! The reconciliation engine: forward and reverse passes over the sheets.

use crate::columns::{self, ColumnMap};
use crate::error::ReconError;
use crate::model::{
    MatchRecord, MatchedCandidate, ReconcileResult, SetLabel, UniqueRecord, WalletMatch,
};
use crate::rules::{self, Patterns, RowRef};
use crate::summary::{self, WalletStatus};
use crate::table::{Cell, Table};

/// One wallet sheet prepared for scanning: its post-header rows plus the
/// column map they were located with.
struct CompareSet<'a> {
    label: SetLabel,
    rows: &'a [Vec<Cell>],
    columns: ColumnMap,
}

impl<'a> CompareSet<'a> {
    /// Locate columns in an optional wallet table. A missing description
    /// column degrades the set to absent instead of failing the run.
    fn build(table: Option<&'a Table>, label: SetLabel) -> (Option<CompareSet<'a>>, WalletStatus) {
        let Some(table) = table else {
            return (None, WalletStatus::default());
        };
        match columns::locate(table) {
            Some(map) => {
                let rows = &table.rows[map.header_row + 1..];
                let status = WalletStatus {
                    supplied: true,
                    column_found: true,
                    data_rows: rows.len(),
                };
                let set = CompareSet {
                    label,
                    rows,
                    columns: map,
                };
                (Some(set), status)
            }
            None => {
                let status = WalletStatus {
                    supplied: true,
                    column_found: false,
                    data_rows: 0,
                };
                (None, status)
            }
        }
    }
}

/// Reconcile the bank sheet against up to two wallet sheets.
///
/// Fails only when the bank sheet has no locatable description column; a
/// wallet without one is compared as if it were empty. Matching is a full
/// nested scan per wallet: rules are data-dependent, so rows cannot be
/// pre-indexed by key.
pub fn reconcile(
    bank: &Table,
    wallet1: Option<&Table>,
    wallet2: Option<&Table>,
) -> Result<ReconcileResult, ReconError> {
    let bank_columns = columns::locate(bank).ok_or(ReconError::MissingDescriptionColumn)?;
    let bank_rows = &bank.rows[bank_columns.header_row + 1..];

    let (set1, status1) = CompareSet::build(wallet1, SetLabel::Wallet1);
    let (set2, status2) = CompareSet::build(wallet2, SetLabel::Wallet2);
    let patterns = Patterns::new();

    // Forward pass: every bank row with a description probes both wallets.
    let mut matches = Vec::new();
    let mut unique = Vec::new();
    for (position, row) in bank_rows.iter().enumerate() {
        let Some(description) = row.get(bank_columns.description) else {
            continue;
        };
        if description.is_blank() {
            continue;
        }
        let source = RowRef::new(row, &bank_columns);
        let row_number = position + bank_columns.header_row + 2;

        let wallet1_match = set1
            .as_ref()
            .and_then(|set| scan_wallet(source, set, &patterns));
        let wallet2_match = set2
            .as_ref()
            .and_then(|set| scan_wallet(source, set, &patterns));

        if wallet1_match.is_some() || wallet2_match.is_some() {
            matches.push(MatchRecord {
                row_number,
                description: description.display(),
                debit: cell_text(row, bank_columns.debit),
                credit: cell_text(row, bank_columns.credit),
                cells: row.clone(),
                wallet1: wallet1_match,
                wallet2: wallet2_match,
            });
        } else {
            unique.push(unique_record(SetLabel::Bank, row_number, row, &bank_columns));
        }
    }

    // Reverse pass: wallet rows with no bank counterpart.
    let mut unique_in_wallets = Vec::new();
    for set in [&set1, &set2].into_iter().flatten() {
        collect_wallet_uniques(set, bank_rows, &bank_columns, &patterns, &mut unique_in_wallets);
    }

    let statistics = summary::compute_statistics(
        bank_rows.len(),
        status1,
        status2,
        &matches,
        &unique,
        &unique_in_wallets,
    );

    Ok(ReconcileResult {
        statistics,
        matches,
        unique,
        unique_in_wallets,
    })
}

/// Scan one wallet for candidates matching the source row. Every matching
/// candidate is collected; the recorded kind is the last rule that fired in
/// scan order.
fn scan_wallet(
    source: RowRef<'_>,
    set: &CompareSet<'_>,
    patterns: &Patterns,
) -> Option<WalletMatch> {
    let mut kind = None;
    let mut rows = Vec::new();
    for (position, candidate_cells) in set.rows.iter().enumerate() {
        let Some(description) = candidate_cells.get(set.columns.description) else {
            continue;
        };
        if description.is_blank() {
            continue;
        }
        let candidate = RowRef::new(candidate_cells, &set.columns);
        let Some(matched) = rules::first_match(source, candidate, patterns) else {
            continue;
        };
        kind = Some(matched);
        rows.push(MatchedCandidate {
            row_number: position + set.columns.header_row + 2,
            description: description.display(),
            debit: cell_text(candidate_cells, set.columns.debit),
            credit: cell_text(candidate_cells, set.columns.credit),
            cells: candidate_cells.clone(),
        });
    }
    kind.map(|kind| WalletMatch { kind, rows })
}

/// Reverse probe for one wallet. The bank row stays on the source side of
/// every rule call, so the asymmetric rules keep their direction: only a
/// TP2P suffix on the bank side links the canceled-transfer shape.
fn collect_wallet_uniques(
    set: &CompareSet<'_>,
    bank_rows: &[Vec<Cell>],
    bank_columns: &ColumnMap,
    patterns: &Patterns,
    out: &mut Vec<UniqueRecord>,
) {
    for (position, cells) in set.rows.iter().enumerate() {
        let Some(description) = cells.get(set.columns.description) else {
            continue;
        };
        if description.is_blank() {
            continue;
        }
        let candidate = RowRef::new(cells, &set.columns);
        let matched = bank_rows.iter().any(|bank_row| {
            rules::first_match(RowRef::new(bank_row, bank_columns), candidate, patterns).is_some()
        });
        if !matched {
            out.push(unique_record(
                set.label,
                position + set.columns.header_row + 2,
                cells,
                &set.columns,
            ));
        }
    }
}

fn unique_record(
    set: SetLabel,
    row_number: usize,
    cells: &[Cell],
    columns: &ColumnMap,
) -> UniqueRecord {
    UniqueRecord {
        set,
        row_number,
        description: cells
            .get(columns.description)
            .map(Cell::display)
            .unwrap_or_default(),
        debit: cell_text(cells, columns.debit),
        credit: cell_text(cells, columns.credit),
        cells: cells.to_vec(),
    }
}

fn cell_text(cells: &[Cell], column: Option<usize>) -> String {
    column
        .and_then(|index| cells.get(index))
        .map(Cell::display)
        .unwrap_or_default()
}
