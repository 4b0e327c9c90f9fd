// Reconciliation report export: CSV summary and XLSX workbook

use std::path::Path;

use ledgerlens_recon::model::{MatchRecord, ReconcileResult};
use ledgerlens_recon::table::Cell;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet, XlsxError};

/// Write the match/unique report as CSV.
///
/// One row per matched bank row ("Match") and one per bank-only row
/// ("Unique"), in the column layout downstream spreadsheets expect.
pub fn export_csv(
    result: &ReconcileResult,
    wallet1_name: &str,
    wallet2_name: &str,
    path: &Path,
) -> Result<(), String> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| e.to_string())?;

    let found1 = format!("Found in {}", wallet1_name);
    let found2 = format!("Found in {}", wallet2_name);
    writer
        .write_record([
            "Type",
            "Row Number",
            "Description",
            "Debit",
            "Credit",
            "Balance",
            found1.as_str(),
            found2.as_str(),
            "Match Details",
        ])
        .map_err(|e| e.to_string())?;

    for record in &result.matches {
        let row_number = record.row_number.to_string();
        let balance = balance_text(&record.cells);
        writer
            .write_record([
                "Match",
                row_number.as_str(),
                record.description.as_str(),
                record.debit.as_str(),
                record.credit.as_str(),
                balance.as_str(),
                bool_text(record.found_in_wallet1()),
                bool_text(record.found_in_wallet2()),
                "",
            ])
            .map_err(|e| e.to_string())?;
    }

    for record in &result.unique {
        let row_number = record.row_number.to_string();
        let balance = balance_text(&record.cells);
        writer
            .write_record([
                "Unique",
                row_number.as_str(),
                record.description.as_str(),
                record.debit.as_str(),
                record.credit.as_str(),
                balance.as_str(),
                "",
                "",
                "No matches found",
            ])
            .map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}

/// Write the full reconciliation workbook: matches, uniques on both sides,
/// and a summary sheet.
pub fn export_workbook(
    result: &ReconcileResult,
    wallet1_name: &str,
    wallet2_name: &str,
    path: &Path,
) -> Result<(), String> {
    let mut workbook = XlsxWorkbook::new();
    let bold = Format::new().set_bold();

    write_matches_sheet(&mut workbook, result, wallet1_name, wallet2_name, &bold)?;
    write_bank_uniques_sheet(&mut workbook, result, &bold)?;
    write_wallet_uniques_sheet(&mut workbook, result, &bold)?;
    write_summary_sheet(&mut workbook, result, &bold)?;

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;
    Ok(())
}

fn add_sheet<'a>(workbook: &'a mut XlsxWorkbook, name: &str) -> Result<&'a mut Worksheet, String> {
    workbook
        .add_worksheet()
        .set_name(name)
        .map_err(|e| format!("Failed to create sheet '{}': {}", name, e))
}

fn write_header(worksheet: &mut Worksheet, headers: &[&str], bold: &Format) -> Result<(), String> {
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, bold)
            .map_err(|e| format!("Failed to write header '{}': {}", header, e))?;
    }
    Ok(())
}

fn write_matches_sheet(
    workbook: &mut XlsxWorkbook,
    result: &ReconcileResult,
    wallet1_name: &str,
    wallet2_name: &str,
    bold: &Format,
) -> Result<(), String> {
    let worksheet = add_sheet(workbook, "Matches")?;
    let found1 = format!("Found in {}", wallet1_name);
    let found2 = format!("Found in {}", wallet2_name);
    write_header(
        worksheet,
        &[
            "Row #",
            "Description",
            "Debit",
            "Credit",
            "Match Type",
            found1.as_str(),
            found2.as_str(),
        ],
        bold,
    )?;

    for (index, record) in result.matches.iter().enumerate() {
        write_match_row(worksheet, (index + 1) as u32, record)?;
    }
    Ok(())
}

fn write_match_row(
    worksheet: &mut Worksheet,
    row: u32,
    record: &MatchRecord,
) -> Result<(), String> {
    let err = |e: XlsxError| format!("Failed to write sheet 'Matches': {}", e);
    worksheet
        .write_number(row, 0, record.row_number as f64)
        .map_err(err)?;
    worksheet
        .write_string(row, 1, &record.description)
        .map_err(err)?;
    worksheet.write_string(row, 2, &record.debit).map_err(err)?;
    worksheet
        .write_string(row, 3, &record.credit)
        .map_err(err)?;
    worksheet
        .write_string(row, 4, record.kind().label())
        .map_err(err)?;
    worksheet
        .write_string(row, 5, bool_text(record.found_in_wallet1()))
        .map_err(err)?;
    worksheet
        .write_string(row, 6, bool_text(record.found_in_wallet2()))
        .map_err(err)?;
    Ok(())
}

fn write_bank_uniques_sheet(
    workbook: &mut XlsxWorkbook,
    result: &ReconcileResult,
    bold: &Format,
) -> Result<(), String> {
    let worksheet = add_sheet(workbook, "Bank Uniques")?;
    write_header(
        worksheet,
        &["Row #", "Description", "Debit", "Credit", "Balance"],
        bold,
    )?;

    let err = |e: XlsxError| format!("Failed to write sheet 'Bank Uniques': {}", e);
    for (index, record) in result.unique.iter().enumerate() {
        let row = (index + 1) as u32;
        worksheet
            .write_number(row, 0, record.row_number as f64)
            .map_err(err)?;
        worksheet
            .write_string(row, 1, &record.description)
            .map_err(err)?;
        worksheet.write_string(row, 2, &record.debit).map_err(err)?;
        worksheet
            .write_string(row, 3, &record.credit)
            .map_err(err)?;
        worksheet
            .write_string(row, 4, balance_text(&record.cells))
            .map_err(err)?;
    }
    Ok(())
}

fn write_wallet_uniques_sheet(
    workbook: &mut XlsxWorkbook,
    result: &ReconcileResult,
    bold: &Format,
) -> Result<(), String> {
    let worksheet = add_sheet(workbook, "Wallet Uniques")?;
    write_header(
        worksheet,
        &["Sheet", "Row #", "Description", "Debit", "Credit"],
        bold,
    )?;

    let err = |e: XlsxError| format!("Failed to write sheet 'Wallet Uniques': {}", e);
    for (index, record) in result.unique_in_wallets.iter().enumerate() {
        let row = (index + 1) as u32;
        worksheet
            .write_string(row, 0, record.set.as_str())
            .map_err(err)?;
        worksheet
            .write_number(row, 1, record.row_number as f64)
            .map_err(err)?;
        worksheet
            .write_string(row, 2, &record.description)
            .map_err(err)?;
        worksheet.write_string(row, 3, &record.debit).map_err(err)?;
        worksheet
            .write_string(row, 4, &record.credit)
            .map_err(err)?;
    }
    Ok(())
}

fn write_summary_sheet(
    workbook: &mut XlsxWorkbook,
    result: &ReconcileResult,
    bold: &Format,
) -> Result<(), String> {
    let worksheet = add_sheet(workbook, "Summary")?;
    write_header(worksheet, &["Metric", "Value"], bold)?;

    let stats = &result.statistics;
    let lines: [(&str, usize); 10] = [
        ("Bank sheet rows", stats.bank_rows),
        ("Wallet 1 rows", stats.wallet1_rows),
        ("Wallet 2 rows", stats.wallet2_rows),
        ("Matching rows", stats.matching_rows),
        ("Exact matches", stats.exact_matches),
        ("Canceled and Credited matches", stats.tp2p_matches),
        ("Currency Exchange matches", stats.sell_rate_matches),
        ("Unique in bank sheet", stats.unique_rows),
        ("Unique in Wallet 1", stats.wallet1_unique_rows),
        ("Unique in Wallet 2", stats.wallet2_unique_rows),
    ];

    let err = |e: XlsxError| format!("Failed to write sheet 'Summary': {}", e);
    for (index, (label, value)) in lines.iter().enumerate() {
        let row = (index + 1) as u32;
        worksheet.write_string(row, 0, *label).map_err(err)?;
        worksheet
            .write_number(row, 1, *value as f64)
            .map_err(err)?;
    }
    let rate_row = (lines.len() + 1) as u32;
    worksheet
        .write_string(rate_row, 0, "Match rate (%)")
        .map_err(err)?;
    worksheet
        .write_number(rate_row, 1, stats.match_rate as f64)
        .map_err(err)?;
    Ok(())
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn balance_text(cells: &[Cell]) -> String {
    cells.last().map(Cell::display).unwrap_or_default()
}
