//! `check` 명령: 헤더 정규화 결과 확인.

use super::output::{format_json, section};
use super::{load_input, OutputFormat};
use crate::cli::CheckArgs;
use anyhow::Result;
use chainlens_analytics::{ColumnCheck, ColumnNormalizer};
use chainlens_core::AppConfig;

/// 헤더를 검사합니다. 필수 컬럼이 빠져 있으면 에러로 종료합니다.
pub fn run(args: CheckArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let raw = load_input(&args.file, config)?;
    let check = ColumnNormalizer::new(args.variant).check(&raw.headers);

    let content = match format {
        OutputFormat::Table => format_report(&check),
        OutputFormat::Json => format_json(&check)?,
    };
    println!("{}", content);

    if !check.is_valid() {
        anyhow::bail!(
            "{} input is missing required columns: {}",
            check.variant,
            check.missing.join(", ")
        );
    }
    Ok(())
}

/// 표 형식 리포트.
pub fn format_report(check: &ColumnCheck) -> String {
    let mut output = format!("variant: {}\n", check.variant);

    section(&mut output, "Columns");
    output.push_str(&format!("{:<30} {}\n", "RAW", "NORMALIZED"));
    output.push_str(&"-".repeat(55));
    output.push('\n');
    for (raw, normalized) in &check.columns {
        output.push_str(&format!("{:<30} {}\n", raw, normalized));
    }

    section(&mut output, "Missing required columns");
    if check.missing.is_empty() {
        output.push_str("(none)\n");
    }
    for field in &check.missing {
        output.push_str(field);
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainlens_analytics::Variant;

    #[test]
    fn test_format_report_lists_missing() {
        let headers: Vec<String> = ["Date", "Open", "Price"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let check = ColumnNormalizer::new(Variant::Stocks).check(&headers);
        let text = format_report(&check);
        assert!(text.starts_with("variant: stocks\n"));
        assert!(text.contains("Price"));
        assert!(text.contains("Close"));
        assert!(text.trim_end().ends_with("High\nLow"));
    }
}
