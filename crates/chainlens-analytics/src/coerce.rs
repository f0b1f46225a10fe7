//! 타입 형변환.
//!
//! 날짜 필드는 정렬 기준이므로 파싱에 실패한 행을 제거하고, 숫자 필드는
//! 합계에 NaN이 섞이지 않도록 실패 시 0으로 채웁니다.

use chainlens_core::field::{DAY, WEEKDAY};
use chainlens_core::{weekday_name, Cell, PipelineResult, RawTable, Table};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, warn};

/// 형변환 계획.
#[derive(Debug, Clone, Default)]
pub struct CoercionPlan {
    /// 날짜 필드 (파싱 실패 시 행 제거)
    pub date_field: Option<String>,
    /// 날짜 파싱 형식 (순서대로 시도)
    pub date_formats: Vec<String>,
    /// 숫자 필드 (파싱 실패 시 0)
    pub numeric_fields: Vec<String>,
    /// `Weekday` 컬럼 생성 여부
    pub derive_weekday: bool,
}

impl CoercionPlan {
    pub fn new(date_formats: Vec<String>) -> Self {
        Self {
            date_formats,
            ..Default::default()
        }
    }

    pub fn with_date(mut self, field: impl Into<String>) -> Self {
        self.date_field = Some(field.into());
        self
    }

    pub fn with_numeric<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_weekday(mut self, enabled: bool) -> Self {
        self.derive_weekday = enabled;
        self
    }
}

/// 형변환 결과 요약.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoercionReport {
    pub rows_in: usize,
    /// 날짜 파싱 실패로 제거된 행 수
    pub rows_dropped: usize,
    /// 헤더와 폭이 달라 채우거나 잘라낸 행 수
    pub rows_reshaped: usize,
    /// 필드별 0으로 채운 셀 수
    pub zero_filled: BTreeMap<String, usize>,
}

impl CoercionReport {
    pub fn rows_out(&self) -> usize {
        self.rows_in - self.rows_dropped
    }

    pub fn total_zero_filled(&self) -> usize {
        self.zero_filled.values().sum()
    }

    /// 요약 로그 출력.
    pub fn log_summary(&self) {
        if self.rows_dropped > 0 || self.rows_reshaped > 0 || self.total_zero_filled() > 0 {
            warn!(
                rows_in = self.rows_in,
                rows_dropped = self.rows_dropped,
                rows_reshaped = self.rows_reshaped,
                zero_filled = self.total_zero_filled(),
                "Coercion recovered from unparseable values"
            );
        } else {
            debug!(rows_in = self.rows_in, "Coercion completed without recovery");
        }
        for (field, count) in self.zero_filled.iter().filter(|(_, c)| **c > 0) {
            debug!(field = %field, count, "Numeric field zero-filled");
        }
    }
}

/// 형변환기.
#[derive(Debug, Clone)]
pub struct TypeCoercer {
    plan: CoercionPlan,
}

impl TypeCoercer {
    pub fn new(plan: CoercionPlan) -> Self {
        Self { plan }
    }

    pub fn plan(&self) -> &CoercionPlan {
        &self.plan
    }

    /// 원본 테이블을 형변환합니다.
    ///
    /// 계획에 있지만 테이블에 없는 숫자 필드는 건너뜁니다.
    pub fn coerce(&self, raw: &RawTable) -> PipelineResult<(Table, CoercionReport)> {
        let mut report = CoercionReport {
            rows_in: raw.len(),
            ..Default::default()
        };

        let date_idx = self
            .plan
            .date_field
            .as_deref()
            .and_then(|name| raw.column_index(name));
        let numeric_idx: Vec<(usize, &str)> = self
            .plan
            .numeric_fields
            .iter()
            .filter_map(|name| raw.column_index(name).map(|idx| (idx, name.as_str())))
            .collect();
        for (_, name) in &numeric_idx {
            report.zero_filled.insert(name.to_string(), 0);
        }

        let mut table = Table::new(raw.headers.clone());
        let mut days: Vec<NaiveDate> = Vec::new();

        let width = raw.headers.len();
        for (line, record) in raw.records.iter().enumerate() {
            if record.len() != width {
                report.rows_reshaped += 1;
            }
            // 헤더 폭에 맞춤: 빠진 값은 빈 값, 남는 값은 버림
            let field = |idx: usize| record.get(idx).map(String::as_str).unwrap_or("");
            let mut row: Vec<Cell> = (0..width).map(|idx| Cell::text(field(idx))).collect();

            if let Some(idx) = date_idx {
                match parse_datetime(field(idx), &self.plan.date_formats) {
                    Some(ts) => {
                        row[idx] = Cell::DateTime(ts);
                        days.push(ts.date());
                    }
                    None => {
                        debug!(row = line, value = %field(idx), "Dropping row with unparseable date");
                        report.rows_dropped += 1;
                        continue;
                    }
                }
            }

            for (idx, name) in &numeric_idx {
                let value = match parse_decimal(field(*idx)) {
                    Some(v) => v,
                    None => {
                        if let Some(count) = report.zero_filled.get_mut(*name) {
                            *count += 1;
                        }
                        Decimal::ZERO
                    }
                };
                row[*idx] = Cell::Number(value);
            }

            table.push_row(row)?;
        }

        if date_idx.is_some() {
            table.set_or_append_column(DAY, days.iter().map(|d| Cell::Date(*d)).collect())?;
            if self.plan.derive_weekday {
                table.set_or_append_column(
                    WEEKDAY,
                    days.iter()
                        .map(|d| Cell::text(weekday_name(d.weekday())))
                        .collect(),
                )?;
            }
        }

        report.log_summary();
        Ok((table, report))
    }
}

/// 숫자 문자열을 파싱합니다.
///
/// 천 단위 구분자 `,`와 끝의 `%`를 제거합니다. 빈 값과 `-`는 숫자가 아닙니다.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    let cleaned: String = trimmed
        .strip_suffix('%')
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let cleaned = cleaned.trim();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(cleaned);

    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }

    Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .ok()
}

/// 날짜/시간 문자열을 파싱합니다.
///
/// RFC 3339를 먼저 시도한 뒤 주어진 형식을 순서대로 시도합니다. 날짜만 있는
/// 형식은 자정으로 취급합니다.
pub fn parse_datetime(raw: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.naive_local());
    }
    formats.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(value, fmt)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(value, fmt)
                    .ok()
                    .map(|d| d.and_time(NaiveTime::MIN))
            })
    })
}
