//! 지표 집계.
//!
//! 그룹 키만 바꿔 가며 같은 `summarize`를 재사용합니다
//! (옵션 방향별, 종목별, 행사가별, 요일별, 일자별).

use chainlens_core::field::{CLOSE, DAY, EXIT_PRICE, OPEN, PROFIT_LOSS};
use chainlens_core::{
    weekday_name, AggregationKey, Cell, Measure, PipelineError, PipelineResult, RowView,
    SummaryRecord, Table,
};
use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

fn measure_value(row: &RowView<'_>, measure: &Measure) -> PipelineResult<Decimal> {
    let numeric = |column: &str| {
        row.decimal(column).ok_or_else(|| PipelineError::NotNumeric {
            column: column.to_string(),
            row: row.index(),
        })
    };
    match measure {
        Measure::Column(name) => numeric(name.as_str()),
        Measure::CloseMinusOpen => numeric(CLOSE)?
            .checked_sub(numeric(OPEN)?)
            .ok_or_else(|| PipelineError::Overflow(format!("close - open at row {}", row.index()))),
    }
}

fn add_checked(total: Decimal, value: Decimal, what: &str) -> PipelineResult<Decimal> {
    total
        .checked_add(value)
        .ok_or_else(|| PipelineError::Overflow(what.to_string()))
}

fn require_measure(table: &Table, measure: &Measure) -> PipelineResult<()> {
    match measure {
        Measure::Column(name) => table.require_column(name).map(|_| ()),
        Measure::CloseMinusOpen => {
            table.require_column(CLOSE)?;
            table.require_column(OPEN).map(|_| ())
        }
    }
}

/// 키별 집계.
///
/// 그룹은 처음 등장한 순서로 만들어지고, `total_value` 내림차순으로
/// 안정 정렬됩니다 (동률이면 등장 순서 유지).
pub fn summarize(
    table: &Table,
    key: AggregationKey,
    measure: &Measure,
) -> PipelineResult<Vec<SummaryRecord>> {
    summarize_by_column(table, key.column(), measure)
}

/// 임의의 컬럼으로 집계합니다.
pub fn summarize_by_column(
    table: &Table,
    column: &str,
    measure: &Measure,
) -> PipelineResult<Vec<SummaryRecord>> {
    let key_idx = table.require_column(column)?;
    require_measure(table, measure)?;

    let mut records: Vec<SummaryRecord> = Vec::new();
    let mut index: HashMap<&Cell, usize> = HashMap::new();

    for row in table.iter() {
        let key = &row.cells()[key_idx];
        let value = measure_value(&row, measure)?;
        let slot = *index.entry(key).or_insert_with(|| {
            records.push(SummaryRecord::empty(key.clone()));
            records.len() - 1
        });
        records[slot].record(value)?;
    }

    records.sort_by(|a, b| b.total_value.cmp(&a.total_value));
    debug!(column, groups = records.len(), "Summary computed");
    Ok(records)
}

/// 매매 기록 요약 지표.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeMetrics {
    pub total_trades: usize,
    /// 수익 거래가 있었던 날짜 수 (중복 제외)
    pub profitable_days: usize,
    /// 손실 거래가 있었던 날짜 수 (중복 제외)
    pub loss_days: usize,
    /// 청산가가 비어 있는 거래 수
    pub open_positions: usize,
    pub total_profit_loss: Decimal,
}

/// 매매 기록 요약 지표를 계산합니다.
///
/// 미청산 거래는 `Exit_Price`가 비어 있는 행입니다. 공백만 있는 값도 비어
/// 있는 것으로 셉니다 (CSV 내보내기에서 빈 칸이 공백으로 채워지는 경우).
/// 손익 합계가 Decimal 범위를 넘으면 `PipelineError::Overflow`입니다.
pub fn trade_metrics(table: &Table) -> PipelineResult<TradeMetrics> {
    table.require_column(DAY)?;
    let measure = Measure::profit_loss();
    require_measure(table, &measure)?;
    let has_exit = table.has_column(EXIT_PRICE);
    if !has_exit {
        debug!("No exit price column; open positions counted as zero");
    }

    let mut profit_days: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut loss_days: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut open_positions = 0;
    let mut total = Decimal::ZERO;

    for row in table.iter() {
        let value = measure_value(&row, &measure)?;
        total = add_checked(total, value, "total profit/loss")?;
        if let Some(day) = row.date(DAY) {
            if value > Decimal::ZERO {
                profit_days.insert(day);
            } else if value < Decimal::ZERO {
                loss_days.insert(day);
            }
        }
        if has_exit && row.get(EXIT_PRICE).map_or(true, Cell::is_blank) {
            open_positions += 1;
        }
    }

    Ok(TradeMetrics {
        total_trades: table.len(),
        profitable_days: profit_days.len(),
        loss_days: loss_days.len(),
        open_positions,
        total_profit_loss: total,
    })
}

/// 하루 손익.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyProfit {
    pub day: NaiveDate,
    pub profit_loss: Decimal,
}

/// 일자별 손익 합계 (날짜 오름차순).
pub fn daily_profit(table: &Table) -> PipelineResult<Vec<DailyProfit>> {
    table.require_column(DAY)?;
    table.require_column(PROFIT_LOSS)?;
    let measure = Measure::profit_loss();

    let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for row in table.iter() {
        let value = measure_value(&row, &measure)?;
        if let Some(day) = row.date(DAY) {
            let slot = by_day.entry(day).or_default();
            *slot = add_checked(*slot, value, "daily profit/loss")?;
        }
    }
    Ok(by_day
        .into_iter()
        .map(|(day, profit_loss)| DailyProfit { day, profit_loss })
        .collect())
}

/// 요일별 시가 대비 종가 요약.
///
/// `positive_count`는 콜 수익일 (종가 > 시가), `negative_count`는 풋 수익일
/// (종가 < 시가)입니다. 결과는 `days` 순서를 따르며, 데이터가 없는 요일도
/// 빈 그룹 (승률 정의되지 않음)으로 포함됩니다.
pub fn weekday_summary(table: &Table, days: &[Weekday]) -> PipelineResult<Vec<SummaryRecord>> {
    let records = summarize(table, AggregationKey::Weekday, &Measure::CloseMinusOpen)?;
    let mut by_name: HashMap<String, SummaryRecord> = records
        .into_iter()
        .filter_map(|r| Some((r.key_value.as_text()?.to_string(), r)))
        .collect();

    Ok(days
        .iter()
        .map(|day| {
            let name = weekday_name(*day);
            by_name
                .remove(name)
                .unwrap_or_else(|| SummaryRecord::empty(Cell::text(name)))
        })
        .collect())
}
