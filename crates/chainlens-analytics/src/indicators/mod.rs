//! 기술적 지표.
//!
//! 종가 시계열에 대한 지표를 계산합니다. 결과 벡터는 입력과 길이가 같고,
//! 워밍업 구간은 `None`입니다 (0으로 채우지 않음).
//!
//! - **SMA** / **EMA** / **MACD** (`trend`)
//! - **RSI** (`momentum`, 단순 평균 또는 Wilder 평활)
//!
//! ```ignore
//! use chainlens_analytics::indicators::{IndicatorEngine, RsiParams};
//!
//! let engine = IndicatorEngine::new();
//! let rsi = engine.rsi(&closes, RsiParams::default())?;
//! ```

pub mod momentum;
pub mod trend;

use chainlens_core::SignalValue;
use rust_decimal::Decimal;
use thiserror::Error;

pub use momentum::{MomentumCalculator, RsiParams};
pub use trend::{EmaParams, MacdParams, MacdResult, SmaParams, TrendIndicators};

/// 지표 계산 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    /// 데이터 부족
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

impl<T> From<IndicatorError> for SignalValue<T> {
    fn from(err: IndicatorError) -> Self {
        match err {
            IndicatorError::InsufficientData { required, provided } => {
                SignalValue::insufficient(required, provided)
            }
            IndicatorError::InvalidParameter(msg) => SignalValue::not_available(msg),
        }
    }
}

/// 지수 가중 평균 (가중치 보정 없음).
///
/// 첫 값으로 시작하여 `y[i] = x[i] × alpha + y[i-1] × (1 - alpha)`로
/// 갱신합니다. 처음 `min_periods - 1`개는 `None`입니다.
pub(crate) fn ewm(values: &[Decimal], alpha: Decimal, min_periods: usize) -> Vec<Option<Decimal>> {
    let mut result = Vec::with_capacity(values.len());
    let Some(first) = values.first() else {
        return result;
    };

    let one_minus_alpha = Decimal::ONE - alpha;
    let mut ewm_value = *first;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            ewm_value = (*value * alpha) + (ewm_value * one_minus_alpha);
        }
        if i + 1 >= min_periods {
            result.push(Some(ewm_value));
        } else {
            result.push(None);
        }
    }
    result
}

/// 지표 시계열의 마지막 값을 시그널로 변환합니다.
///
/// 계산은 되었지만 마지막 값이 정의되지 않은 경우 (예: RSI에서 상승/하락이
/// 모두 0) `NotAvailable`입니다.
pub fn latest_signal(series: IndicatorResult<Vec<Option<Decimal>>>) -> SignalValue<Decimal> {
    match series {
        Ok(values) => match values.last().copied().flatten() {
            Some(v) => SignalValue::Available(v),
            None => SignalValue::not_available("latest value is undefined"),
        },
        Err(err) => err.into(),
    }
}

/// 통합 지표 엔진.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
}

impl IndicatorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// 단순 이동평균. 처음 `period - 1`개는 `None`.
    pub fn sma(&self, prices: &[Decimal], params: SmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.sma(prices, params)
    }

    /// 지수 이동평균. 첫 가격으로 시작합니다.
    pub fn ema(&self, prices: &[Decimal], params: EmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.ema(prices, params)
    }

    /// MACD 라인, 시그널 라인, 히스토그램.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        self.trend.macd(prices, params)
    }

    /// RSI (0~100). 처음 `period`개 (Wilder는 `period - 1`개)는 `None`.
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.rsi(prices, params)
    }
}
