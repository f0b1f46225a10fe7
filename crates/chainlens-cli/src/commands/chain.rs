//! `chain` 명령: 옵션 체인 분석.

use super::output::{fmt_decimal, format_coercion, format_json, format_signals, section};
use super::{export_table, load_input, OutputFormat};
use crate::cli::ChainArgs;
use anyhow::{Context, Result};
use chainlens_analytics::{run_chain, ChainReport};
use chainlens_core::{AppConfig, ChainQuote};
use tracing::debug;

pub fn run(args: ChainArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let raw = load_input(&args.file, config)?;
    let previous = args
        .prev
        .as_deref()
        .map(|path| load_input(path, config))
        .transpose()?;

    let mut config = config.clone();
    if let Some(window) = args.window {
        anyhow::ensure!(!window.is_sign_negative(), "--window must not be negative");
        debug!(%window, "Strike window overridden");
        config.chain.strike_window = window;
    }

    let report = run_chain(raw, previous, &config).context("Option chain analysis failed")?;

    let content = match format {
        OutputFormat::Table => format_report(&report),
        OutputFormat::Json => format_json(&report)?,
    };
    println!("{}", content);

    if let Some(path) = &args.export {
        export_table(&report.table, path, &config)?;
    }
    Ok(())
}

fn quote_line(q: &ChainQuote) -> String {
    format!(
        "{:>10} {:<5} {:>12} {:>10} {:>12} {:>8} {:>10}\n",
        fmt_decimal(q.strike),
        q.side.as_str(),
        fmt_decimal(q.open_interest),
        fmt_decimal(q.oi_change),
        fmt_decimal(q.volume),
        fmt_decimal(q.iv),
        fmt_decimal(q.ltp)
    )
}

fn quote_header() -> String {
    format!(
        "{:>10} {:<5} {:>12} {:>10} {:>12} {:>8} {:>10}\n",
        "STRIKE", "SIDE", "OI", "OI CHG", "VOLUME", "IV", "LTP"
    )
}

/// 표 형식 리포트.
pub fn format_report(report: &ChainReport) -> String {
    let mut output = format_coercion(&report.coercion);

    section(&mut output, "Signals");
    output.push_str(&format_signals(&report.signals));

    section(&mut output, "Strike recommendations");
    if report.recommendations.is_empty() {
        output.push_str("(none)\n");
    }
    for rec in &report.recommendations {
        output.push_str(&format!(
            "{:<4} {:<4} {:>10} premium {:>8} lots {:>4} delta {:>4}  {}\n",
            rec.action.to_string(),
            rec.side.as_str(),
            fmt_decimal(rec.strike),
            fmt_decimal(rec.premium),
            rec.lots.map(|l| l.to_string()).unwrap_or_else(|| "-".to_string()),
            fmt_decimal(rec.estimated_delta),
            rec.rationale
        ));
    }

    let safe = &report.safe_strikes;
    section(
        &mut output,
        &format!("Safe strikes (premium >= {})", fmt_decimal(safe.premium_threshold)),
    );
    output.push_str(&quote_header());
    for q in safe.calls.iter().chain(&safe.puts) {
        output.push_str(&quote_line(q));
    }

    section(&mut output, "Strikes around ATM");
    output.push_str(&quote_header());
    for q in &report.window {
        output.push_str(&quote_line(q));
    }
    output
}
