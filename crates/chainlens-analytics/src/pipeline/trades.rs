//! 매매 기록 파이프라인.

use crate::aggregate::{daily_profit, summarize, trade_metrics, DailyProfit, TradeMetrics};
use crate::coerce::CoercionReport;
use crate::normalize::Variant;
use chainlens_core::field::{DAY, INSTRUMENT, OPTION_SIDE};
use chainlens_core::{
    AggregationKey, AppConfig, Measure, OptionSide, PipelineError, PipelineResult, RawTable,
    RowView, SummaryRecord, Table,
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use super::prepare;

/// 매매 기록 필터. 빈 목록은 "전체"를 의미합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeFilter {
    /// 시작일 (포함)
    pub from: Option<NaiveDate>,
    /// 종료일 (포함)
    pub to: Option<NaiveDate>,
    pub instruments: Vec<String>,
    pub sides: Vec<OptionSide>,
}

impl TradeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_instruments(mut self, instruments: Vec<String>) -> Self {
        self.instruments = instruments;
        self
    }

    pub fn with_sides(mut self, sides: Vec<OptionSide>) -> Self {
        self.sides = sides;
        self
    }

    fn validate(&self) -> PipelineResult<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(PipelineError::InvalidInput(format!(
                    "date range is empty: {} > {}",
                    from, to
                )));
            }
        }
        Ok(())
    }

    fn matches(&self, row: &RowView<'_>) -> bool {
        if self.from.is_some() || self.to.is_some() {
            let Some(day) = row.date(DAY) else {
                return false;
            };
            if self.from.is_some_and(|from| day < from) || self.to.is_some_and(|to| day > to) {
                return false;
            }
        }

        if !self.instruments.is_empty() {
            let instrument = row.text(INSTRUMENT).map(str::trim).unwrap_or_default();
            if !self
                .instruments
                .iter()
                .any(|i| i.trim().eq_ignore_ascii_case(instrument))
            {
                return false;
            }
        }

        if !self.sides.is_empty() {
            let side = row.text(OPTION_SIDE).and_then(|s| s.parse::<OptionSide>().ok());
            if !side.is_some_and(|s| self.sides.contains(&s)) {
                return false;
            }
        }
        true
    }
}

/// 매매 기록 분석 결과.
#[derive(Debug, Clone, Serialize)]
pub struct TradesReport {
    pub coercion: CoercionReport,
    pub metrics: TradeMetrics,
    pub daily_profit: Vec<DailyProfit>,
    pub by_side: Vec<SummaryRecord>,
    pub by_instrument: Vec<SummaryRecord>,
    pub by_strike: Vec<SummaryRecord>,
    /// 필터 적용 후 테이블
    pub table: Table,
}

/// 매매 기록 분석을 실행합니다.
pub fn run_trades(
    raw: RawTable,
    filter: &TradeFilter,
    config: &AppConfig,
) -> PipelineResult<TradesReport> {
    filter.validate()?;
    let (table, coercion) = prepare(raw, Variant::Trades, &config.pipeline)?;

    let span = chainlens_core::pipeline_span!("aggregate", Variant::Trades, table.len());
    let _guard = span.enter();

    if !filter.instruments.is_empty() {
        table.require_column(INSTRUMENT)?;
    }
    if !filter.sides.is_empty() {
        table.require_column(OPTION_SIDE)?;
    }
    let table = table.filter(|row| filter.matches(row));
    debug!(rows = table.len(), "Trade filter applied");

    let measure = Measure::profit_loss();
    let report = TradesReport {
        metrics: trade_metrics(&table)?,
        daily_profit: daily_profit(&table)?,
        by_side: summarize(&table, AggregationKey::OptionSide, &measure)?,
        by_instrument: summarize(&table, AggregationKey::Instrument, &measure)?,
        by_strike: summarize(&table, AggregationKey::Strike, &measure)?,
        coercion,
        table,
    };
    info!(
        trades = report.metrics.total_trades,
        total_profit_loss = %report.metrics.total_profit_loss,
        "Trades analysed"
    );
    Ok(report)
}
