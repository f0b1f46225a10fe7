//! 가격 시계열 파이프라인.
//!
//! 지표(RSI, SMA, MACD)는 제외 요일만 뺀 전체 시계열로 계산하고, 추세
//! 라벨과 요일 요약은 요일 필터를 적용한 행으로 계산합니다.

use crate::aggregate::weekday_summary;
use crate::coerce::CoercionReport;
use crate::indicators::{IndicatorEngine, IndicatorResult, MacdParams, RsiParams, SmaParams};
use crate::normalize::Variant;
use crate::signals::{
    candle_type, last_trend, suggest, trend_labels, trend_runs, RsiZone, Suggestion,
};
use chainlens_core::field::{CLOSE, DATE, DAY, OPEN, WEEKDAY};
use chainlens_core::{
    parse_weekday, weekday_name, AppConfig, CandleType, PipelineResult, RawTable, RowView,
    SignalReport, SignalValue, SummaryRecord, Table, TrendLabel, TrendRun, WEEK_ORDER,
};
use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use super::prepare;

/// 가격 시계열 필터.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockFilter {
    /// 분석할 요일. 비어 있으면 데이터에 있는 모든 요일.
    pub weekdays: Vec<Weekday>,
}

impl StockFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weekdays(mut self, weekdays: Vec<Weekday>) -> Self {
        self.weekdays = weekdays;
        self
    }
}

/// 추세 표의 한 행.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub day: Option<NaiveDate>,
    pub weekday: Option<String>,
    pub close: Decimal,
    /// 직전 행이 없으면 `None`
    pub trend: Option<TrendLabel>,
}

/// 마지막 행 기준 지표 스냅샷.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorSnapshot {
    pub day: Option<NaiveDate>,
    pub close: SignalValue<Decimal>,
    pub sma: SignalValue<Decimal>,
    pub rsi: SignalValue<Decimal>,
    pub rsi_zone: SignalValue<RsiZone>,
    pub macd_histogram: SignalValue<Decimal>,
    pub candle: SignalValue<CandleType>,
}

/// 가격 시계열 분석 결과.
#[derive(Debug, Clone, Serialize)]
pub struct StocksReport {
    pub coercion: CoercionReport,
    /// 요일 요약에 사용한 요일 (순서대로)
    pub weekdays: Vec<String>,
    pub weekday_summary: Vec<SummaryRecord>,
    /// 최근 `trend_tail`개 행의 추세
    pub trend: Vec<TrendPoint>,
    pub runs: Vec<TrendRun>,
    pub snapshot: IndicatorSnapshot,
    pub suggestion: Suggestion,
    pub signals: SignalReport,
    /// 요일 필터 적용 후 테이블 (날짜 오름차순)
    pub table: Table,
}

fn is_selected(row: &RowView<'_>, weekdays: &[Weekday]) -> bool {
    weekdays.is_empty()
        || row
            .text(WEEKDAY)
            .and_then(parse_weekday)
            .is_some_and(|day| weekdays.contains(&day))
}

/// 정의된 위치의 지표 값을 시그널로 변환합니다.
fn value_at(
    series: IndicatorResult<Vec<Option<Decimal>>>,
    index: Option<usize>,
) -> SignalValue<Decimal> {
    let Some(index) = index else {
        return SignalValue::insufficient(1, 0);
    };
    match series {
        Ok(values) => match values.get(index).copied().flatten() {
            Some(v) => SignalValue::Available(v),
            None => SignalValue::not_available(format!("value undefined at row {}", index)),
        },
        Err(err) => err.into(),
    }
}

/// 데이터에 존재하는 요일 (월요일부터).
fn present_weekdays(table: &Table) -> Vec<Weekday> {
    WEEK_ORDER
        .iter()
        .copied()
        .filter(|day| {
            table
                .iter()
                .any(|row| row.text(WEEKDAY).and_then(parse_weekday) == Some(*day))
        })
        .collect()
}

/// 가격 시계열 분석을 실행합니다.
pub fn run_stocks(
    raw: RawTable,
    filter: &StockFilter,
    config: &AppConfig,
) -> PipelineResult<StocksReport> {
    let settings = &config.pipeline;
    let excluded = settings.excluded_weekdays()?;
    let (table, coercion) = prepare(raw, Variant::Stocks, settings)?;

    let span = chainlens_core::pipeline_span!("signals", Variant::Stocks, table.len());
    let _guard = span.enter();

    let mut table = table.filter(|row| {
        !row.text(WEEKDAY)
            .and_then(parse_weekday)
            .is_some_and(|day| excluded.contains(&day))
    });
    table.sort_by_column(DATE)?;
    debug!(rows = table.len(), excluded = ?excluded, "Excluded weekdays removed");

    // 지표는 전체 시계열 기준
    let engine = IndicatorEngine::new();
    let closes = table.decimal_column(CLOSE)?;
    let selected: Vec<bool> = table
        .iter()
        .map(|row| is_selected(&row, &filter.weekdays))
        .collect();
    let last_selected = selected.iter().rposition(|s| *s);

    let rsi_params = RsiParams {
        period: settings.rsi_period,
        smoothing: settings.rsi_smoothing,
    };
    let rsi = value_at(engine.rsi(&closes, rsi_params), last_selected);
    let sma = value_at(
        engine.sma(&closes, SmaParams { period: settings.sma_period }),
        last_selected,
    );
    let macd_histogram = value_at(
        engine
            .macd(&closes, MacdParams::default())
            .map(|series| series.into_iter().map(|m| m.histogram).collect()),
        last_selected,
    );

    let filtered = table.filter(|row| is_selected(row, &filter.weekdays));
    let filtered_closes = filtered.decimal_column(CLOSE)?;
    let opens = filtered.decimal_column(OPEN)?;

    let labels = trend_labels(&filtered_closes);
    let runs = trend_runs(&labels);
    let trend_signal = last_trend(&labels);

    let skip = filtered.len().saturating_sub(settings.trend_tail);
    let trend: Vec<TrendPoint> = filtered
        .iter()
        .zip(&labels)
        .skip(skip)
        .map(|(row, label)| TrendPoint {
            day: row.date(DAY),
            weekday: row.text(WEEKDAY).map(str::to_string),
            close: filtered_closes[row.index()],
            trend: *label,
        })
        .collect();

    let days = if filter.weekdays.is_empty() {
        present_weekdays(&filtered)
    } else {
        WEEK_ORDER
            .iter()
            .copied()
            .filter(|day| filter.weekdays.contains(day))
            .collect()
    };
    let summary = weekday_summary(&filtered, &days)?;

    let last = filtered.len().checked_sub(1);
    let snapshot = IndicatorSnapshot {
        day: last.and_then(|i| filtered.row(i)).and_then(|row| row.date(DAY)),
        close: match last {
            Some(i) => SignalValue::Available(filtered_closes[i]),
            None => SignalValue::insufficient(1, 0),
        },
        rsi_zone: rsi.as_ref().map(|r| RsiZone::from_rsi(*r)),
        candle: match last {
            Some(i) => SignalValue::Available(candle_type(opens[i], filtered_closes[i])),
            None => SignalValue::insufficient(1, 0),
        },
        sma,
        rsi,
        macd_histogram,
    };
    let suggestion = suggest(
        snapshot.rsi.value().copied(),
        trend_signal.value().copied(),
    );

    let mut signals = SignalReport::new();
    signals.insert("close", &snapshot.close);
    signals.insert("sma", &snapshot.sma);
    signals.insert("rsi", &snapshot.rsi);
    signals.insert("rsi_zone", &snapshot.rsi_zone);
    signals.insert("macd_histogram", &snapshot.macd_histogram);
    signals.insert("candle", &snapshot.candle);
    signals.insert("last_trend", &trend_signal);
    signals.insert("suggestion", &SignalValue::Available(suggestion));

    info!(
        rows = filtered.len(),
        runs = runs.len(),
        suggestion = %suggestion,
        "Price series analysed"
    );

    Ok(StocksReport {
        coercion,
        weekdays: days.iter().map(|d| weekday_name(*d).to_string()).collect(),
        weekday_summary: summary,
        trend,
        runs,
        snapshot,
        suggestion,
        signals,
        table: filtered,
    })
}
