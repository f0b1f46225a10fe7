//! `trades` 명령: 매매 기록 분석.

use super::output::{fmt_decimal, format_coercion, format_json, format_summary, section};
use super::{export_table, load_input, OutputFormat};
use crate::cli::TradesArgs;
use anyhow::{Context, Result};
use chainlens_analytics::{run_trades, TradeFilter, TradesReport};
use chainlens_core::AppConfig;

/// 매매 기록 분석을 실행하고 결과를 출력합니다.
pub fn run(args: TradesArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let raw = load_input(&args.file, config)?;
    let filter = TradeFilter::new()
        .with_range(args.from, args.to)
        .with_instruments(args.instrument)
        .with_sides(args.side);

    let report = run_trades(raw, &filter, config).context("Trade analysis failed")?;

    let content = match format {
        OutputFormat::Table => format_report(&report),
        OutputFormat::Json => format_json(&report)?,
    };
    println!("{}", content);

    if let Some(path) = &args.export {
        export_table(&report.table, path, config)?;
    }
    Ok(())
}

/// 표 형식 리포트.
pub fn format_report(report: &TradesReport) -> String {
    let mut output = format_coercion(&report.coercion);
    let m = &report.metrics;

    section(&mut output, "Trade metrics");
    output.push_str(&format!("{:<20} {}\n", "Total trades", m.total_trades));
    output.push_str(&format!("{:<20} {}\n", "Profitable days", m.profitable_days));
    output.push_str(&format!("{:<20} {}\n", "Loss days", m.loss_days));
    output.push_str(&format!("{:<20} {}\n", "Open positions", m.open_positions));
    output.push_str(&format!(
        "{:<20} {}\n",
        "Total P/L",
        fmt_decimal(m.total_profit_loss)
    ));

    section(&mut output, "Daily P/L");
    for day in &report.daily_profit {
        output.push_str(&format!(
            "{:<20} {:>16}\n",
            day.day.to_string(),
            fmt_decimal(day.profit_loss)
        ));
    }

    section(&mut output, "By option side");
    output.push_str(&format_summary("SIDE", &report.by_side));
    section(&mut output, "By instrument");
    output.push_str(&format_summary("INSTRUMENT", &report.by_instrument));
    section(&mut output, "By strike");
    output.push_str(&format_summary("STRIKE", &report.by_strike));
    output
}
