// LedgerLens CLI - headless bank/wallet reconciliation

mod exit_codes;
mod render;
mod run;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use ledgerlens_recon::{reconcile, ReconError, ReconcileResult, Statistics, Table};

use exit_codes::{
    EXIT_BANK_COLUMNS, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_UNRECONCILED, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "llens")]
#[command(about = "Bank statement vs wallet reconciliation (headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a bank sheet against one or two wallet sheets
    #[command(after_help = "\
With --strict, exit code 1 indicates unreconciled rows on either side.

Examples:
  llens compare bank.xlsx wallet.csv
  llens compare bank.csv wallet1.csv wallet2.csv --json
  llens compare bank.xlsx wallet.xlsx --export-csv report.csv
  llens compare bank.csv wallet.csv --export-xlsx report.xlsx --strict
  llens compare bank.csv wallet.csv --output result.json --quiet")]
    Compare {
        /// Bank sheet (csv, tsv, txt, xlsx, xls, xlsb, ods)
        bank: PathBuf,

        /// First wallet sheet
        wallet1: Option<PathBuf>,

        /// Second wallet sheet
        wallet2: Option<PathBuf>,

        /// Output JSON result to stdout instead of the report
        #[arg(long)]
        json: bool,

        /// Write JSON result to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the match/unique report as CSV
        #[arg(long, value_name = "FILE")]
        export_csv: Option<PathBuf>,

        /// Write the reconciliation workbook as XLSX
        #[arg(long, value_name = "FILE")]
        export_xlsx: Option<PathBuf>,

        /// CSV delimiter override (sniffed per file when omitted)
        #[arg(long)]
        delimiter: Option<char>,

        /// Exit 1 when unreconciled rows remain on either side
        #[arg(long)]
        strict: bool,

        /// Suppress the report and the stderr summary
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Show the discovered structure of a sheet without reconciling
    #[command(after_help = "\
Examples:
  llens inspect bank.xlsx
  llens inspect wallet.csv --json")]
    Inspect {
        /// Sheet to inspect
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// CSV delimiter override (sniffed when omitted)
        #[arg(long)]
        delimiter: Option<char>,
    },

    /// Run reconciliation from a TOML config file
    #[command(after_help = "\
Examples:
  llens run reconcile.toml
  llens run reconcile.toml --json
  llens run reconcile.toml --output result.json")]
    Run {
        /// Path to the config file
        config: PathBuf,

        /// Output JSON result to stdout instead of the report
        #[arg(long)]
        json: bool,

        /// Write JSON result to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Suppress the report and the stderr summary
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  llens validate reconcile.toml")]
    Validate {
        /// Path to the config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compare {
            bank,
            wallet1,
            wallet2,
            json,
            output,
            export_csv,
            export_xlsx,
            delimiter,
            strict,
            quiet,
        } => cmd_compare(
            bank, wallet1, wallet2, json, output, export_csv, export_xlsx, delimiter, strict,
            quiet,
        ),
        Commands::Inspect {
            file,
            json,
            delimiter,
        } => cmd_inspect(file, json, delimiter),
        Commands::Run {
            config,
            json,
            output,
            quiet,
        } => run::cmd_run(config, json, output, quiet),
        Commands::Validate { config } => run::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_IO,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_PARSE,
            message: msg.into(),
            hint: None,
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Map the engine's fatal error to its exit code, with a hint.
pub fn bank_columns_err(err: ReconError) -> CliError {
    CliError {
        code: EXIT_BANK_COLUMNS,
        message: err.to_string(),
        hint: Some("the bank sheet needs a \"Description\" header within its first ten rows".into()),
    }
}

pub fn has_unreconciled(stats: &Statistics) -> bool {
    stats.unique_rows > 0 || stats.wallet1_unique_rows > 0 || stats.wallet2_unique_rows > 0
}

// ============================================================================
// input decoding
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum SheetFormat {
    Delimited,
    Excel,
}

fn infer_format(path: &Path) -> Result<SheetFormat, CliError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("csv") | Some("tsv") | Some("txt") => Ok(SheetFormat::Delimited),
        Some("xlsx") | Some("xls") | Some("xlsb") | Some("ods") => Ok(SheetFormat::Excel),
        _ => Err(CliError::args(format!(
            "cannot infer format from extension {:?}",
            ext.as_deref().unwrap_or("(none)")
        ))
        .with_hint("supported extensions: csv, tsv, txt, xlsx, xls, xlsb, ods")),
    }
}

pub fn read_table(path: &Path, delimiter: Option<char>) -> Result<Table, CliError> {
    if !path.is_file() {
        return Err(CliError::io(format!("cannot read {}", path.display())));
    }
    match infer_format(path)? {
        SheetFormat::Delimited => match delimiter {
            Some(d) => ledgerlens_io::csv::import_with_delimiter(path, d as u8)
                .map_err(CliError::parse),
            None => ledgerlens_io::csv::import(path).map_err(CliError::parse),
        },
        SheetFormat::Excel => ledgerlens_io::xlsx::import(path).map_err(CliError::parse),
    }
}

fn check_delimiter(delimiter: Option<char>) -> Result<(), CliError> {
    match delimiter {
        Some(d) if !d.is_ascii() => {
            Err(CliError::args("delimiter must be a single ASCII character"))
        }
        _ => Ok(()),
    }
}

/// Display name for a wallet sheet: the file stem, or a fixed fallback.
pub fn sheet_display_name(path: Option<&Path>, fallback: &str) -> String {
    path.and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| fallback.to_string())
}

// ============================================================================
// compare
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn cmd_compare(
    bank: PathBuf,
    wallet1: Option<PathBuf>,
    wallet2: Option<PathBuf>,
    json: bool,
    output: Option<PathBuf>,
    export_csv: Option<PathBuf>,
    export_xlsx: Option<PathBuf>,
    delimiter: Option<char>,
    strict: bool,
    quiet: bool,
) -> Result<(), CliError> {
    if wallet1.is_none() && wallet2.is_none() {
        return Err(CliError::args("at least one wallet sheet is required")
            .with_hint("llens compare bank.csv wallet.csv"));
    }
    check_delimiter(delimiter)?;

    let bank_table = read_table(&bank, delimiter)?;
    let wallet1_table = wallet1
        .as_deref()
        .map(|p| read_table(p, delimiter))
        .transpose()?;
    let wallet2_table = wallet2
        .as_deref()
        .map(|p| read_table(p, delimiter))
        .transpose()?;

    let result = reconcile(&bank_table, wallet1_table.as_ref(), wallet2_table.as_ref())
        .map_err(bank_columns_err)?;

    let wallet1_name = sheet_display_name(wallet1.as_deref(), "Wallet 1");
    let wallet2_name = sheet_display_name(wallet2.as_deref(), "Wallet 2");

    write_outputs(
        &result,
        &wallet1_name,
        &wallet2_name,
        json,
        output.as_deref(),
        export_csv.as_deref(),
        export_xlsx.as_deref(),
    )?;

    if !json && !quiet {
        render::print_report(&result, &wallet1_name, &wallet2_name);
    }
    if !quiet {
        print_summary(&result.statistics);
    }

    if strict && has_unreconciled(&result.statistics) {
        return Err(CliError {
            code: EXIT_UNRECONCILED,
            message: "unreconciled rows remain".into(),
            hint: None,
        });
    }
    Ok(())
}

/// Write the selected outputs: JSON to stdout and/or file, CSV report, workbook.
pub fn write_outputs(
    result: &ReconcileResult,
    wallet1_name: &str,
    wallet2_name: &str,
    json: bool,
    output: Option<&Path>,
    export_csv: Option<&Path>,
    export_xlsx: Option<&Path>,
) -> Result<(), CliError> {
    if json || output.is_some() {
        let json_str = serde_json::to_string_pretty(result)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;

        if let Some(path) = output {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        if json {
            println!("{json_str}");
        }
    }

    if let Some(path) = export_csv {
        ledgerlens_io::export::export_csv(result, wallet1_name, wallet2_name, path)
            .map_err(CliError::io)?;
        eprintln!("wrote {}", path.display());
    }

    if let Some(path) = export_xlsx {
        ledgerlens_io::export::export_workbook(result, wallet1_name, wallet2_name, path)
            .map_err(CliError::io)?;
        eprintln!("wrote {}", path.display());
    }

    Ok(())
}

/// Human summary to stderr, so stdout stays clean for JSON.
pub fn print_summary(stats: &Statistics) {
    eprintln!(
        "bank: {} rows, wallet 1: {} rows, wallet 2: {} rows",
        stats.bank_rows, stats.wallet1_rows, stats.wallet2_rows,
    );
    eprintln!(
        "matched {} of {} bank rows ({}%): {} exact, {} canceled and credited, {} currency exchange",
        stats.matching_rows,
        stats.bank_rows,
        stats.match_rate,
        stats.exact_matches,
        stats.tp2p_matches,
        stats.sell_rate_matches,
    );
    eprintln!(
        "unique: {} in bank, {} in wallet 1, {} in wallet 2",
        stats.unique_rows, stats.wallet1_unique_rows, stats.wallet2_unique_rows,
    );

    if stats.wallets_compared.wallet1 && !stats.description_column_found.wallet1 {
        eprintln!("note: wallet 1 has no description column and was skipped");
    }
    if stats.wallets_compared.wallet2 && !stats.description_column_found.wallet2 {
        eprintln!("note: wallet 2 has no description column and was skipped");
    }
}

// ============================================================================
// inspect
// ============================================================================

fn cmd_inspect(file: PathBuf, json: bool, delimiter: Option<char>) -> Result<(), CliError> {
    check_delimiter(delimiter)?;

    let format = infer_format(&file)?;
    let table = read_table(&file, delimiter)?;
    let columns = ledgerlens_recon::columns::locate(&table);

    let sheets = match format {
        SheetFormat::Excel => Some(ledgerlens_io::xlsx::sheet_names(&file).map_err(CliError::parse)?),
        SheetFormat::Delimited => None,
    };

    if json {
        let report = serde_json::json!({
            "file": file.display().to_string(),
            "rows": table.rows.len(),
            "sheets": sheets,
            "columns": columns,
        });
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::io(e.to_string()))?;
        println!("{json_str}");
        return Ok(());
    }

    println!("file: {}", file.display());
    println!("rows: {}", table.rows.len());
    if let Some(names) = &sheets {
        println!(
            "sheets: {} (reading '{}')",
            names.len(),
            names.first().map(String::as_str).unwrap_or("")
        );
    }
    match columns {
        Some(map) => {
            println!("header row: {}", map.header_row + 1);
            println!("description column: {}", column_letter(map.description));
            println!("credit column: {}", format_column(map.credit));
            println!("debit column: {}", format_column(map.debit));
            println!("fx rate column: {}", format_column(map.fx_rate));
            println!(
                "data rows: {}",
                table.rows.len().saturating_sub(map.header_row + 1)
            );
        }
        None => println!(
            "description column: not found in the first {} rows",
            ledgerlens_recon::columns::HEADER_SCAN_ROWS
        ),
    }
    Ok(())
}

fn format_column(index: Option<usize>) -> String {
    match index {
        Some(i) => column_letter(i),
        None => "not found".to_string(),
    }
}

/// Convert column index to spreadsheet letters (0 = A, 25 = Z, 26 = AA).
fn column_letter(index: usize) -> String {
    let mut letters = String::new();
    let mut n = index;
    loop {
        letters.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters
}
