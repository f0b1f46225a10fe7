//! `stocks` 명령: 가격 시계열 분석.

use super::output::{
    fmt_decimal, format_coercion, format_json, format_signals, format_summary, section,
};
use super::{export_table, load_input, OutputFormat};
use crate::cli::StocksArgs;
use anyhow::{Context, Result};
use chainlens_analytics::{run_stocks, StockFilter, StocksReport};
use chainlens_core::AppConfig;

pub fn run(args: StocksArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let raw = load_input(&args.file, config)?;
    let filter = StockFilter::new().with_weekdays(args.weekday);

    let report = run_stocks(raw, &filter, config).context("Price series analysis failed")?;

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
pub fn format_report(report: &StocksReport) -> String {
    let mut output = format_coercion(&report.coercion);

    section(&mut output, "Weekday summary (close vs open)");
    output.push_str(&format_summary("WEEKDAY", &report.weekday_summary));

    section(&mut output, "Recent trend");
    for point in &report.trend {
        output.push_str(&format!(
            "{:<12} {:<10} {:>12} {}\n",
            point.day.map(|d| d.to_string()).unwrap_or_default(),
            point.weekday.as_deref().unwrap_or("-"),
            fmt_decimal(point.close),
            point.trend.map(|t| t.as_str()).unwrap_or("-")
        ));
    }

    if let Some(run) = report.runs.iter().max_by_key(|r| r.length) {
        output.push_str(&format!(
            "Longest run: {} x{} (from row {})\n",
            run.label, run.length, run.start_index
        ));
    }

    section(&mut output, "Signals");
    output.push_str(&format_signals(&report.signals));
    output
}
