//! 이동평균 계열 지표.
//!
//! - SMA (단순 이동평균)
//! - EMA (지수 이동평균, 첫 가격으로 시작)
//! - MACD (단기 EMA - 장기 EMA, 시그널은 MACD의 EMA)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ewm, IndicatorError, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmaParams {
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmaParams {
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 12 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12)
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26)
    pub slow_period: usize,
    /// 시그널 EMA 기간 (기본: 9)
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// 한 시점의 MACD 값.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdResult {
    pub macd: Option<Decimal>,
    pub signal: Option<Decimal>,
    /// MACD - 시그널
    pub histogram: Option<Decimal>,
}

/// 이동평균 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

fn check_period(period: usize, provided: usize) -> IndicatorResult<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(
            "기간은 0보다 커야 합니다".to_string(),
        ));
    }
    if provided < period {
        return Err(IndicatorError::InsufficientData {
            required: period,
            provided,
        });
    }
    Ok(())
}

impl TrendIndicators {
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균.
    pub fn sma(&self, prices: &[Decimal], params: SmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        check_period(period, prices.len())?;

        let divisor = Decimal::from(period);
        let mut result = vec![None; period - 1];
        result.extend(
            prices
                .windows(period)
                .map(|w| Some(w.iter().sum::<Decimal>() / divisor)),
        );
        Ok(result)
    }

    /// 지수 이동평균.
    ///
    /// k = 2 / (period + 1), EMA = price × k + 이전 EMA × (1 - k).
    /// 첫 가격에서 시작하고 인덱스 `period - 1`부터 값을 내보냅니다.
    pub fn ema(&self, prices: &[Decimal], params: EmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        check_period(period, prices.len())?;

        let k = Decimal::TWO / Decimal::from(period + 1);
        Ok(ewm(prices, k, period))
    }

    /// MACD.
    ///
    /// MACD 라인은 인덱스 `slow_period - 1`, 시그널과 히스토그램은
    /// `slow_period + signal_period - 2`부터 정의되므로 최소
    /// `slow_period + signal_period - 1`개의 가격이 필요합니다.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        if params.fast_period >= params.slow_period {
            return Err(IndicatorError::InvalidParameter(format!(
                "단기 기간({})은 장기 기간({})보다 짧아야 합니다",
                params.fast_period, params.slow_period
            )));
        }
        check_period(params.signal_period, prices.len())?;
        let required = params.slow_period + params.signal_period - 1;
        if prices.len() < required {
            return Err(IndicatorError::InsufficientData {
                required,
                provided: prices.len(),
            });
        }

        let fast = self.ema(prices, EmaParams { period: params.fast_period })?;
        let slow = self.ema(prices, EmaParams { period: params.slow_period })?;
        let line: Vec<Option<Decimal>> = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();

        // 정의된 MACD 구간에만 시그널 EMA를 적용
        let offset = line.iter().position(Option::is_some).unwrap_or(line.len());
        let defined: Vec<Decimal> = line[offset..].iter().flatten().copied().collect();
        let signal = self.ema(&defined, EmaParams { period: params.signal_period })?;

        let mut result = vec![MacdResult::default(); offset];
        for (macd, signal) in defined.into_iter().zip(signal) {
            result.push(MacdResult {
                macd: Some(macd),
                signal,
                histogram: signal.map(|s| macd - s),
            });
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ramp(n: i64) -> Vec<Decimal> {
        (1..=n).map(Decimal::from).collect()
    }

    #[test]
    fn test_sma() {
        let sma = TrendIndicators::new()
            .sma(&ramp(5), SmaParams { period: 3 })
            .unwrap();
        assert_eq!(sma, vec![None, None, Some(dec!(2)), Some(dec!(3)), Some(dec!(4))]);
    }

    #[test]
    fn test_ema_starts_from_first_price() {
        let ema = TrendIndicators::new()
            .ema(&[dec!(2), dec!(4), dec!(6), dec!(8)], EmaParams { period: 3 })
            .unwrap();
        // k = 0.5: 2 → 3 → 4.5 → 6.25
        assert_eq!(ema, vec![None, None, Some(dec!(4.5)), Some(dec!(6.25))]);
    }

    #[test]
    fn test_macd_shape() {
        let prices = ramp(40);
        let macd = TrendIndicators::new()
            .macd(&prices, MacdParams::default())
            .unwrap();
        assert_eq!(macd.len(), 40);
        assert!(macd[24].macd.is_none());
        assert!(macd[25].macd.is_some());
        assert!(macd[32].signal.is_none());
        assert!(macd[33].histogram.is_some());
        // 선형 상승에서 MACD는 양수
        assert!(macd[39].macd.unwrap() > Decimal::ZERO);
    }

    #[test]
    fn test_macd_insufficient() {
        let err = TrendIndicators::new()
            .macd(&ramp(30), MacdParams::default())
            .unwrap_err();
        assert_eq!(err, IndicatorError::InsufficientData { required: 34, provided: 30 });
    }

    #[test]
    fn test_macd_minimum_input_defines_last_histogram() {
        let engine = TrendIndicators::new();
        let prices = ramp(34);
        let macd = engine.macd(&prices, MacdParams::default()).unwrap();
        assert_eq!(macd.len(), 34);
        assert!(macd[32].histogram.is_none());
        assert!(macd[33].histogram.is_some());

        let err = engine.macd(&prices[1..], MacdParams::default()).unwrap_err();
        assert_eq!(err, IndicatorError::InsufficientData { required: 34, provided: 33 });
    }
}
