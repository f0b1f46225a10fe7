//! 입력 유형별 파이프라인.
//!
//! 정규화 → 형변환 → (집계 | 시그널) 순서로 한 번에 실행합니다. 스키마
//! 에러는 수치 계산 전에 실행을 중단시키고, 나머지 실패는 해당 값만
//! 마커로 남깁니다.

mod chain;
mod stocks;
mod trades;

pub use chain::{clean_chain, run_chain, ChainReport};
pub use stocks::{run_stocks, IndicatorSnapshot, StockFilter, StocksReport, TrendPoint};
pub use trades::{run_trades, TradeFilter, TradesReport};

use crate::coerce::{CoercionPlan, CoercionReport, TypeCoercer};
use crate::normalize::{ColumnNormalizer, Variant};
use chainlens_core::field::*;
use chainlens_core::{PipelineConfig, PipelineResult, RawTable, Table};
use tracing::info;

/// 가격 시계열의 숫자 필드.
pub const STOCK_NUMERIC_FIELDS: &[&str] = &[
    OPEN, HIGH, LOW, CLOSE, PREV_CLOSE, VWAP, HIGH_52W, LOW_52W, VOLUME, VALUE, TRADES, CHANGE_PCT,
];

/// 매매 기록의 숫자 필드. `Exit_Price`는 미청산 판정을 위해 문자열로 둡니다.
pub const TRADE_NUMERIC_FIELDS: &[&str] = &[STRIKE, PROFIT_LOSS, RETURN_PCT];

/// 옵션 체인의 숫자 필드 (`Strike` + CALL/PUT 각 10개).
pub fn chain_numeric_fields() -> Vec<&'static str> {
    std::iter::once(STRIKE)
        .chain(CHAIN_CALL_FIELDS)
        .chain(CHAIN_PUT_FIELDS)
        .collect()
}

/// 입력 유형별 형변환 계획.
pub fn coercion_plan(variant: Variant, config: &PipelineConfig) -> CoercionPlan {
    let plan = CoercionPlan::new(config.date_formats.clone());
    match variant {
        Variant::Trades => plan.with_date(DATE).with_numeric(TRADE_NUMERIC_FIELDS.iter().copied()),
        Variant::Stocks => plan
            .with_date(DATE)
            .with_numeric(STOCK_NUMERIC_FIELDS.iter().copied())
            .with_weekday(true),
        Variant::Chain => plan.with_numeric(chain_numeric_fields()),
    }
}

/// 정규화 + 필수 컬럼 검사 + 형변환.
pub fn prepare(
    raw: RawTable,
    variant: Variant,
    config: &PipelineConfig,
) -> PipelineResult<(Table, CoercionReport)> {
    let span = chainlens_core::pipeline_span!("prepare", variant, raw.len());
    let _guard = span.enter();

    let normalized = ColumnNormalizer::new(variant).apply(raw)?;
    let (table, report) = TypeCoercer::new(coercion_plan(variant, config)).coerce(&normalized)?;
    info!(
        rows_in = report.rows_in,
        rows_out = table.len(),
        dropped = report.rows_dropped,
        "Input prepared"
    );
    Ok((table, report))
}
