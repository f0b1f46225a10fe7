//! 리포트 출력 형식.

use anyhow::{Context, Result};
use chainlens_analytics::CoercionReport;
use chainlens_core::{SignalReport, SignalValue, SummaryRecord};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Use: table, json", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        })
    }
}

/// 리포트를 JSON 문자열로 변환합니다.
pub fn format_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize report")
}

/// 소수 둘째 자리까지 표시합니다.
pub fn fmt_decimal(value: Decimal) -> String {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}

/// 승률. 빈 그룹은 `undefined`.
pub fn fmt_rate(rate: Option<Decimal>) -> String {
    match rate {
        Some(r) => format!("{}%", fmt_decimal(r)),
        None => "undefined".to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// 섹션 제목.
pub fn section(output: &mut String, title: &str) {
    output.push('\n');
    output.push_str(title);
    output.push('\n');
    output.push_str(&"=".repeat(title.chars().count().max(20)));
    output.push('\n');
}

/// 집계 결과 표.
pub fn format_summary(key_header: &str, records: &[SummaryRecord]) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<20} {:>8} {:>8} {:>8} {:>16} {:>10}\n",
        key_header, "TOTAL", "POS", "NEG", "VALUE", "WIN RATE"
    ));
    output.push_str(&"-".repeat(75));
    output.push('\n');

    for r in records {
        output.push_str(&format!(
            "{:<20} {:>8} {:>8} {:>8} {:>16} {:>10}\n",
            truncate(&r.key_value.render(), 20),
            r.total_count,
            r.positive_count,
            r.negative_count,
            fmt_decimal(r.total_value),
            fmt_rate(r.win_rate)
        ));
    }
    if records.is_empty() {
        output.push_str("(no rows)\n");
    }
    output
}

/// 이름별 시그널 표.
pub fn format_signals(report: &SignalReport) -> String {
    let mut output = String::new();
    for (name, value) in report.iter() {
        let text = match value {
            SignalValue::Available(v) => v.clone(),
            other => format!("[{}]", other),
        };
        output.push_str(&format!("{:<18} {}\n", name, text));
    }
    output
}

/// 형변환 요약 한 줄.
pub fn format_coercion(report: &CoercionReport) -> String {
    format!(
        "rows: {} read, {} kept, {} dropped (bad date), {} numeric cells zero-filled\n",
        report.rows_in,
        report.rows_out(),
        report.rows_dropped,
        report.total_zero_filled()
    )
}
