//! Cell and table types shared by every comparison set.

use serde::ser::Serializer;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A single cell of an imported sheet.
///
/// Decoders keep numbers as numbers so amount comparisons never re-parse
/// formatted text, but everything else stays textual. `Empty` covers both
/// missing cells and cells the decoder dropped as blank.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Text form of the cell, as a spreadsheet would display it.
    ///
    /// Whole numbers print without a trailing `.0` so `1234.0` round-trips
    /// as `1234`, matching how the decoders render numeric cells.
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }

    /// Trimmed, lowercased text form; the key used for description equality.
    pub fn normalized(&self) -> String {
        self.display().trim().to_lowercase()
    }

    /// True when the cell carries no usable description text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Numeric value of the cell, if it has one.
    ///
    /// Textual cells go through [`parse_amount`], so `"1,234.50"` and
    /// `"(45.00)"` both yield values.
    pub fn amount(&self) -> Option<f64> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => parse_amount(s),
            Cell::Number(n) => Some(*n),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_none(),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Number(n) => serializer.serialize_f64(*n),
        }
    }
}

/// Parse a financial-format number: thousands separators, currency symbols,
/// and accounting-style parentheses for negatives.
///
/// Returns `None` for anything that is not unambiguously a number; callers
/// treat that as "no value", never as an error.
pub fn parse_amount(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Accounting format: (45.00) means -45.00
    let (negative, inner) = if trimmed.starts_with('(') && trimmed.ends_with(')') {
        (true, &trimmed[1..trimmed.len() - 1])
    } else {
        (false, trimmed)
    };

    let cleaned: String = inner
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    // Only digits, one optional leading sign, and a decimal point survive.
    let mut chars = cleaned.chars();
    let first = chars.next()?;
    if !(first.is_ascii_digit() || first == '.' || (!negative && (first == '-' || first == '+'))) {
        return None;
    }
    if !chars.all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    cleaned.parse::<f64>().ok().map(|v| if negative { -v } else { v })
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// An imported sheet: a ragged grid of cells, exactly as decoded.
///
/// Rows may have differing lengths; the engine indexes defensively rather
/// than padding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Table { rows }
    }
}
