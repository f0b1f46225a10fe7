//! CLI 명령어 구현 모듈.

pub mod chain;
pub mod check;
pub mod clean;
pub mod output;
pub mod stocks;
pub mod trades;

pub use output::OutputFormat;

use crate::cli::Commands;
use anyhow::{Context, Result};
use chainlens_core::{AppConfig, RawTable, Table};
use chainlens_data::{read_raw_table_from_path, write_table_to_path, CsvOptions};
use std::path::Path;
use tracing::info;

/// 하위 명령을 실행합니다.
pub fn run(command: Commands, config: &AppConfig, format: OutputFormat) -> Result<()> {
    match command {
        Commands::Trades(args) => trades::run(args, config, format),
        Commands::Stocks(args) => stocks::run(args, config, format),
        Commands::Chain(args) => chain::run(args, config, format),
        Commands::Check(args) => check::run(args, config, format),
        Commands::Clean(args) => clean::run(args, config),
    }
}

/// 설정의 구분자로 CSV 옵션을 만듭니다.
pub(crate) fn csv_options(config: &AppConfig) -> Result<CsvOptions> {
    let delimiter = config
        .export
        .delimiter_byte()
        .context("Invalid export delimiter")?;
    Ok(CsvOptions::with_delimiter(delimiter))
}

pub(crate) fn load_input(path: &Path, config: &AppConfig) -> Result<RawTable> {
    let raw = read_raw_table_from_path(path, &csv_options(config)?)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    info!(path = %path.display(), rows = raw.len(), "Input loaded");
    Ok(raw)
}

pub(crate) fn export_table(table: &Table, path: &Path, config: &AppConfig) -> Result<()> {
    write_table_to_path(table, path, &csv_options(config)?)
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    info!(path = %path.display(), rows = table.len(), "Table exported");
    eprintln!("저장 위치: {} ({} 행)", path.display(), table.len());
    Ok(())
}
