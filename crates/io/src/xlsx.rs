// Excel file import (xlsx, xls, xlsb, ods)
//
// One-way conversion: the first worksheet becomes a table of typed cells.
// Formulas arrive as their cached values, which is all reconciliation needs.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::Datelike;
use ledgerlens_recon::table::{Cell, Table};

/// Import the first worksheet of an Excel file as a table.
pub fn import(path: &Path) -> Result<Table, String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = sheet_names
        .first()
        .ok_or_else(|| "Excel file contains no sheets".to_string())?;

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

    // Range start offset (data may not begin at A1). Pad with empty rows and
    // cells so row numbers line up with what the spreadsheet shows.
    let (start_row, start_col) = match range.start() {
        Some((row, col)) => (row as usize, col as usize),
        None => return Ok(Table::new(Vec::new())),
    };

    let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(start_row + range.height());
    for _ in 0..start_row {
        rows.push(Vec::new());
    }
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col];
        cells.extend(row.iter().map(decode_cell));
        rows.push(cells);
    }

    Ok(Table::new(rows))
}

/// List the worksheet names in an Excel file.
pub fn sheet_names(path: &Path) -> Result<Vec<String>, String> {
    let workbook = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;
    Ok(workbook.sheet_names().to_vec())
}

fn decode_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => {
            if s.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => match dt.as_datetime() {
            // Render as day-month-year so date cells stay comparable as text
            Some(datetime) => {
                let date = datetime.date();
                Cell::Text(format!("{}-{}-{}", date.day(), date.month(), date.year()))
            }
            None => Cell::Text(format!("{}", dt.as_f64())),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}
