use serde::Serialize;

use crate::rules::MatchKind;
use crate::table::Cell;

// ---------------------------------------------------------------------------
// Set labels
// ---------------------------------------------------------------------------

/// Which sheet a record originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetLabel {
    Bank,
    Wallet1,
    Wallet2,
}

impl SetLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetLabel::Bank => "Bank Sheet",
            SetLabel::Wallet1 => "Wallet 1",
            SetLabel::Wallet2 => "Wallet 2",
        }
    }
}

impl std::fmt::Display for SetLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

/// One wallet row matched to a bank row, with its own debit/credit text and
/// display row number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedCandidate {
    pub row_number: usize,
    pub description: String,
    pub debit: String,
    pub credit: String,
    pub cells: Vec<Cell>,
}

/// Everything one wallet contributed to a single bank row: the rule label
/// recorded for the set plus every candidate row that matched.
///
/// When several candidates match under different rules, `kind` keeps the
/// last rule that fired in scan order; the full candidate list is retained
/// regardless.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletMatch {
    pub kind: MatchKind,
    pub rows: Vec<MatchedCandidate>,
}

/// A bank row with at least one match in some wallet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub row_number: usize,
    pub description: String,
    pub debit: String,
    pub credit: String,
    pub cells: Vec<Cell>,
    pub wallet1: Option<WalletMatch>,
    pub wallet2: Option<WalletMatch>,
}

impl MatchRecord {
    pub fn found_in_wallet1(&self) -> bool {
        self.wallet1.is_some()
    }

    pub fn found_in_wallet2(&self) -> bool {
        self.wallet2.is_some()
    }

    /// Row-level classification across both wallets, most specific rule
    /// first: a sell-rate hit anywhere labels the row, then TP2P, then exact.
    pub fn kind(&self) -> MatchKind {
        let kinds = [
            self.wallet1.as_ref().map(|m| m.kind),
            self.wallet2.as_ref().map(|m| m.kind),
        ];
        if kinds.contains(&Some(MatchKind::SellRate)) {
            MatchKind::SellRate
        } else if kinds.contains(&Some(MatchKind::Tp2p)) {
            MatchKind::Tp2p
        } else {
            MatchKind::Exact
        }
    }
}

// ---------------------------------------------------------------------------
// Uniques
// ---------------------------------------------------------------------------

/// A row with no match in the opposite direction, tagged with the sheet it
/// came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniqueRecord {
    pub set: SetLabel,
    pub row_number: usize,
    pub description: String,
    pub debit: String,
    pub credit: String,
    pub cells: Vec<Cell>,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Per-sheet flag block: was a description column located?
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnFlags {
    pub bank: bool,
    pub wallet1: bool,
    pub wallet2: bool,
}

/// Which wallets actually took part in the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WalletFlags {
    pub wallet1: bool,
    pub wallet2: bool,
}

/// Aggregate counters for one reconciliation run.
///
/// Row counts cover the full post-header slices, blank-description rows
/// included; the match rate is a whole-number percentage of bank rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub bank_rows: usize,
    pub wallet1_rows: usize,
    pub wallet2_rows: usize,
    pub matching_rows: usize,
    pub unique_rows: usize,
    pub exact_matches: usize,
    pub tp2p_matches: usize,
    pub sell_rate_matches: usize,
    pub wallet1_unique_rows: usize,
    pub wallet2_unique_rows: usize,
    pub match_rate: u32,
    pub description_column_found: ColumnFlags,
    pub wallets_compared: WalletFlags,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// The complete outcome of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileResult {
    pub statistics: Statistics,
    pub matches: Vec<MatchRecord>,
    pub unique: Vec<UniqueRecord>,
    pub unique_in_wallets: Vec<UniqueRecord>,
}
