//! The three match rules and the row-level helpers they share.

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::columns::ColumnMap;
use crate::table::Cell;

/// Maximum difference between credit amounts for a sell-rate match.
pub const AMOUNT_TOLERANCE: f64 = 0.01;

/// Maximum difference between the quoted sell rate and the candidate rate.
pub const RATE_TOLERANCE: f64 = 0.001;

// ---------------------------------------------------------------------------
// Match kinds
// ---------------------------------------------------------------------------

/// Which rule linked a source row to a candidate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Identical descriptions after trimming and lowercasing.
    Exact,
    /// A `TP2P`-suffixed bank entry canceled and refunded as a wallet credit.
    Tp2p,
    /// A currency exchange linked by amount and rate rather than text.
    SellRate,
}

impl MatchKind {
    /// Human-facing label used in exports and rendered tables.
    pub fn label(self) -> &'static str {
        match self {
            MatchKind::Exact => "Exact",
            MatchKind::Tp2p => "Canceled and Credited",
            MatchKind::SellRate => "Currency Exchange",
        }
    }
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

/// Regexes compiled once per reconciliation run and threaded through the
/// row scans.
pub struct Patterns {
    sell_rate_re: Regex,
    rate_re: Regex,
    date_re: Regex,
}

impl Patterns {
    pub fn new() -> Self {
        Patterns {
            // Tolerates the transliteration typos seen in real exports.
            sell_rate_re: Regex::new(
                r"(?i)(?:SELL|SALL|SAEL|SEL|SAL)\s*RATE\s*:?\s*([0-9]+(?:\.[0-9]+)?)",
            )
            .unwrap(),
            rate_re: Regex::new(r"(?i)RATE[^0-9]*([0-9]+(?:\.[0-9]+)?)").unwrap(),
            date_re: Regex::new(r"(\d{1,2})[-/](\d{1,2})[-/](\d{4})").unwrap(),
        }
    }

    /// The quoted rate from a sell-rate description, if the text carries one.
    pub fn sell_rate(&self, text: &str) -> Option<f64> {
        let caps = self.sell_rate_re.captures(text)?;
        caps[1].parse().ok()
    }

    /// First number following the literal `RATE` anywhere in the text.
    /// Fallback used when the candidate sheet has no fxrate column.
    pub fn rate_after_keyword(&self, text: &str) -> Option<f64> {
        let caps = self.rate_re.captures(text)?;
        caps[1].parse().ok()
    }

    /// Date carried by a row: the first of its first three cells matching a
    /// day-month-year pattern. Invalid calendar dates read as no date.
    pub fn row_date(&self, cells: &[Cell]) -> Option<NaiveDate> {
        cells.iter().take(3).find_map(|cell| {
            let text = cell.display();
            let caps = self.date_re.captures(&text)?;
            let day = caps[1].parse().ok()?;
            let month = caps[2].parse().ok()?;
            let year = caps[3].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        })
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Patterns::new()
    }
}

// ---------------------------------------------------------------------------
// Row references
// ---------------------------------------------------------------------------

/// A row paired with the column map of the sheet it came from.
#[derive(Clone, Copy)]
pub struct RowRef<'a> {
    pub cells: &'a [Cell],
    pub columns: &'a ColumnMap,
}

impl<'a> RowRef<'a> {
    pub fn new(cells: &'a [Cell], columns: &'a ColumnMap) -> Self {
        RowRef { cells, columns }
    }

    fn cell(&self, column: Option<usize>) -> Option<&'a Cell> {
        column.and_then(|index| self.cells.get(index))
    }

    pub fn description_cell(&self) -> Option<&'a Cell> {
        self.cells.get(self.columns.description)
    }

    pub fn description_text(&self) -> String {
        self.description_cell().map(Cell::display).unwrap_or_default()
    }

    pub fn description_normalized(&self) -> String {
        self.description_cell().map(Cell::normalized).unwrap_or_default()
    }

    pub fn credit_amount(&self) -> Option<f64> {
        self.cell(self.columns.credit).and_then(Cell::amount)
    }

    pub fn fx_rate(&self) -> Option<f64> {
        self.cell(self.columns.fx_rate).and_then(Cell::amount)
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Run the rules against one (source, candidate) pair in fixed order.
/// The first rule that fires wins; later rules are not evaluated.
pub fn first_match(
    source: RowRef<'_>,
    candidate: RowRef<'_>,
    patterns: &Patterns,
) -> Option<MatchKind> {
    if match_exact(source, candidate) {
        Some(MatchKind::Exact)
    } else if match_tp2p(source, candidate) {
        Some(MatchKind::Tp2p)
    } else if match_sell_rate(source, candidate, patterns) {
        Some(MatchKind::SellRate)
    } else {
        None
    }
}

/// Normalized description equality. Empty source descriptions never match.
pub fn match_exact(source: RowRef<'_>, candidate: RowRef<'_>) -> bool {
    let source_key = source.description_normalized();
    !source_key.is_empty() && source_key == candidate.description_normalized()
}

/// Source description ends with `TP2P` (any case); the candidate carries the
/// base code verbatim plus a positive credit.
pub fn match_tp2p(source: RowRef<'_>, candidate: RowRef<'_>) -> bool {
    let source_text = source.description_text();
    let trimmed = source_text.trim();
    if trimmed.len() < 4 || !trimmed.is_char_boundary(trimmed.len() - 4) {
        return false;
    }
    let (base, suffix) = trimmed.split_at(trimmed.len() - 4);
    if !suffix.eq_ignore_ascii_case("TP2P") {
        return false;
    }
    let candidate_text = candidate.description_text();
    if candidate_text.trim() != base.trim() {
        return false;
    }
    matches!(candidate.credit_amount(), Some(credit) if credit > 0.0)
}

/// Currency-exchange correlation: a quoted sell rate on the source side and
/// a `TRANSFER` line on the candidate side with matching amount and rate.
/// The date check only blocks when both rows carry a parseable date.
pub fn match_sell_rate(source: RowRef<'_>, candidate: RowRef<'_>, patterns: &Patterns) -> bool {
    let sell_rate = match patterns.sell_rate(&source.description_text()) {
        Some(rate) => rate,
        None => return false,
    };
    let candidate_text = candidate.description_text();
    if !candidate_text.to_lowercase().contains("transfer") {
        return false;
    }
    let (source_credit, candidate_credit) =
        match (source.credit_amount(), candidate.credit_amount()) {
            (Some(source_credit), Some(candidate_credit)) => (source_credit, candidate_credit),
            _ => return false,
        };
    if (source_credit - candidate_credit).abs() >= AMOUNT_TOLERANCE {
        return false;
    }
    // The fxrate column wins when the sheet has one; the in-description
    // fallback applies only when the column itself is absent.
    let compare_rate = match candidate.columns.fx_rate {
        Some(_) => candidate.fx_rate(),
        None => patterns.rate_after_keyword(&candidate_text),
    };
    let compare_rate = match compare_rate {
        Some(rate) => rate,
        None => return false,
    };
    if (sell_rate - compare_rate).abs() >= RATE_TOLERANCE {
        return false;
    }
    dates_match(
        patterns.row_date(source.cells),
        patterns.row_date(candidate.cells),
    )
}

fn dates_match(source: Option<NaiveDate>, candidate: Option<NaiveDate>) -> bool {
    match (source, candidate) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}
