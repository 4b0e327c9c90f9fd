// `llens run` and `llens validate`: reconciliation driven by a TOML config.
//
// All paths inside the config resolve relative to the config file's
// directory, so a checked-in config keeps working from any cwd.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use ledgerlens_recon::reconcile;

use crate::exit_codes::{EXIT_INVALID_CONFIG, EXIT_UNRECONCILED};
use crate::render;
use crate::{
    bank_columns_err, has_unreconciled, print_summary, read_table, sheet_display_name,
    write_outputs, CliError,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Bank sheet path, relative to the config file.
    pub bank: PathBuf,
    pub wallet1: Option<PathBuf>,
    pub wallet2: Option<PathBuf>,
    #[serde(default)]
    pub export: ExportTargets,
    #[serde(default)]
    pub options: RunOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportTargets {
    pub csv: Option<PathBuf>,
    pub xlsx: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunOptions {
    #[serde(default)]
    pub strict: bool,
    pub delimiter: Option<char>,
}

impl RunConfig {
    pub fn from_toml(text: &str) -> Result<Self, String> {
        let config: RunConfig = toml::from_str(text).map_err(|e| e.to_string())?;
        if config.wallet1.is_none() && config.wallet2.is_none() {
            return Err("config must name at least one wallet sheet".to_string());
        }
        if let Some(d) = config.options.delimiter {
            if !d.is_ascii() {
                return Err("options.delimiter must be a single ASCII character".to_string());
            }
        }
        Ok(config)
    }

    fn wallet_count(&self) -> usize {
        self.wallet1.is_some() as usize + self.wallet2.is_some() as usize
    }
}

fn config_err(msg: String) -> CliError {
    CliError {
        code: EXIT_INVALID_CONFIG,
        message: format!("invalid config: {msg}"),
        hint: None,
    }
}

fn load_config(config_path: &Path) -> Result<RunConfig, CliError> {
    let text = fs::read_to_string(config_path)
        .map_err(|e| CliError::io(format!("cannot read config: {e}")))?;
    RunConfig::from_toml(&text).map_err(config_err)
}

pub fn cmd_run(
    config_path: PathBuf,
    json: bool,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let base_dir = config_path.parent().unwrap_or(Path::new("."));

    let bank_path = base_dir.join(&config.bank);
    let wallet1_path = config.wallet1.as_ref().map(|p| base_dir.join(p));
    let wallet2_path = config.wallet2.as_ref().map(|p| base_dir.join(p));

    let delimiter = config.options.delimiter;
    let bank_table = read_table(&bank_path, delimiter)?;
    let wallet1_table = wallet1_path
        .as_deref()
        .map(|p| read_table(p, delimiter))
        .transpose()?;
    let wallet2_table = wallet2_path
        .as_deref()
        .map(|p| read_table(p, delimiter))
        .transpose()?;

    let result = reconcile(&bank_table, wallet1_table.as_ref(), wallet2_table.as_ref())
        .map_err(bank_columns_err)?;

    let wallet1_name = sheet_display_name(wallet1_path.as_deref(), "Wallet 1");
    let wallet2_name = sheet_display_name(wallet2_path.as_deref(), "Wallet 2");

    // --output beats the config's export.json target.
    let json_file = output.or_else(|| config.export.json.as_ref().map(|p| base_dir.join(p)));
    let csv_file = config.export.csv.as_ref().map(|p| base_dir.join(p));
    let xlsx_file = config.export.xlsx.as_ref().map(|p| base_dir.join(p));

    write_outputs(
        &result,
        &wallet1_name,
        &wallet2_name,
        json,
        json_file.as_deref(),
        csv_file.as_deref(),
        xlsx_file.as_deref(),
    )?;

    if !json && !quiet {
        render::print_report(&result, &wallet1_name, &wallet2_name);
    }
    if !quiet {
        print_summary(&result.statistics);
    }

    if config.options.strict && has_unreconciled(&result.statistics) {
        return Err(CliError {
            code: EXIT_UNRECONCILED,
            message: "unreconciled rows remain".into(),
            hint: None,
        });
    }
    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    eprintln!(
        "valid: bank '{}' vs {} wallet sheet(s)",
        config.bank.display(),
        config.wallet_count()
    );
    Ok(())
}
