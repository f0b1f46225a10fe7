//! `clean` 명령: 옵션 체인 정리.

use super::output::format_coercion;
use super::{export_table, load_input};
use crate::cli::CleanArgs;
use anyhow::{Context, Result};
use chainlens_analytics::clean_chain;
use chainlens_core::AppConfig;

pub fn run(args: CleanArgs, config: &AppConfig) -> Result<()> {
    let raw = load_input(&args.file, config)?;
    let (table, report) = clean_chain(raw, config).context("Option chain cleaning failed")?;
    eprint!("{}", format_coercion(&report));
    export_table(&table, &args.output, config)
}
