//! 모멘텀 지표 (RSI).

use chainlens_core::RsiSmoothing;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ewm, IndicatorError, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsiParams {
    /// 평균 기간 (기본: 14)
    pub period: usize,
    /// 평활화 방식 (기본: 단순 평균)
    pub smoothing: RsiSmoothing,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            period: 14,
            smoothing: RsiSmoothing::Simple,
        }
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// - 상승폭 = max(diff, 0), 하락폭 = max(-diff, 0)
    /// - RS = 평균 상승폭 / 평균 하락폭, RSI = 100 - 100 / (1 + RS)
    ///
    /// `Simple`은 인덱스 `period`부터 값이 정의됩니다. `Wilder`는 첫 행의
    /// 변화량을 0으로 두고 alpha = 1/period 지수 가중 평균을 쓰므로 인덱스
    /// `period - 1`부터 정의됩니다.
    /// 평균 하락폭이 0이면 상승폭이 있을 때 100, 상승폭도 0이면 정의되지
    /// 않음 (`None`)입니다.
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }
        let required = match params.smoothing {
            RsiSmoothing::Simple => period + 1,
            RsiSmoothing::Wilder => period,
        };
        if prices.len() < required {
            return Err(IndicatorError::InsufficientData {
                required,
                provided: prices.len(),
            });
        }

        // diffs[i]는 prices[i + 1] - prices[i]
        let (gains, losses): (Vec<Decimal>, Vec<Decimal>) = prices
            .windows(2)
            .map(|w| {
                let diff = w[1] - w[0];
                (diff.max(Decimal::ZERO), (-diff).max(Decimal::ZERO))
            })
            .unzip();

        let (avg_gains, avg_losses) = match params.smoothing {
            RsiSmoothing::Simple => {
                // 첫 행은 변화량이 없음
                let mut gains = rolling_mean(&gains, period);
                let mut losses = rolling_mean(&losses, period);
                gains.insert(0, None);
                losses.insert(0, None);
                (gains, losses)
            }
            RsiSmoothing::Wilder => {
                let alpha = Decimal::ONE / Decimal::from(period);
                let gains: Vec<Decimal> = std::iter::once(Decimal::ZERO).chain(gains).collect();
                let losses: Vec<Decimal> = std::iter::once(Decimal::ZERO).chain(losses).collect();
                (ewm(&gains, alpha, period), ewm(&losses, alpha, period))
            }
        };

        Ok(avg_gains
            .into_iter()
            .zip(avg_losses)
            .map(|(gain, loss)| match (gain, loss) {
                (Some(g), Some(l)) => rsi_value(g, l),
                _ => None,
            })
            .collect())
    }
}

fn rsi_value(avg_gain: Decimal, avg_loss: Decimal) -> Option<Decimal> {
    if avg_loss.is_zero() {
        if avg_gain.is_zero() {
            return None;
        }
        return Some(Decimal::ONE_HUNDRED);
    }
    let rs = avg_gain / avg_loss;
    Some(Decimal::ONE_HUNDRED - Decimal::ONE_HUNDRED / (Decimal::ONE + rs))
}

/// 길이 `period` 창의 이동 평균. 처음 `period - 1`개는 `None`.
fn rolling_mean(values: &[Decimal], period: usize) -> Vec<Option<Decimal>> {
    let divisor = Decimal::from(period);
    let mut result = vec![None; values.len()];
    let mut sum = Decimal::ZERO;
    for (i, value) in values.iter().enumerate() {
        sum += *value;
        if i >= period {
            sum -= values[i - period];
        }
        if i + 1 >= period {
            result[i] = Some(sum / divisor);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_prices() -> Vec<Decimal> {
        vec![
            dec!(100.0),
            dec!(102.0),
            dec!(101.0),
            dec!(103.0),
            dec!(105.0),
            dec!(104.0),
            dec!(106.0),
            dec!(108.0),
            dec!(107.0),
            dec!(109.0),
            dec!(111.0),
            dec!(110.0),
            dec!(112.0),
            dec!(114.0),
            dec!(113.0),
            dec!(115.0),
        ]
    }

    #[test]
    fn test_rsi_warmup_is_undefined() {
        let rsi = MomentumCalculator::new()
            .rsi(&sample_prices(), RsiParams::default())
            .unwrap();
        assert_eq!(rsi.len(), 16);
        assert!(rsi[..14].iter().all(Option::is_none));
        assert!(rsi[14].is_some());
        for value in rsi.iter().flatten() {
            assert!(*value >= Decimal::ZERO && *value <= dec!(100));
        }
    }

    #[test]
    fn test_rsi_simple_known_value() {
        // 상승 4, 하락 1 → 평균 2 / 0.5 → RS = 4, RSI = 80
        let prices = vec![dec!(10), dec!(14), dec!(13)];
        let rsi = MomentumCalculator::new()
            .rsi(&prices, RsiParams { period: 2, smoothing: RsiSmoothing::Simple })
            .unwrap();
        assert_eq!(rsi, vec![None, None, Some(dec!(80))]);
    }

    #[test]
    fn test_rsi_monotonic_extremes() {
        let up: Vec<Decimal> = (0..30).map(|i| Decimal::from(100 + i)).collect();
        let down: Vec<Decimal> = (0..30).map(|i| Decimal::from(200 - i)).collect();
        let calc = MomentumCalculator::new();

        for smoothing in [RsiSmoothing::Simple, RsiSmoothing::Wilder] {
            let params = RsiParams { period: 14, smoothing };
            let rsi_up = calc.rsi(&up, params).unwrap();
            let rsi_down = calc.rsi(&down, params).unwrap();
            assert_eq!(rsi_up.last().copied().flatten(), Some(dec!(100)));
            assert_eq!(rsi_down.last().copied().flatten(), Some(dec!(0)));
        }
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let err = MomentumCalculator::new()
            .rsi(&sample_prices()[..14], RsiParams::default())
            .unwrap_err();
        assert_eq!(err, IndicatorError::InsufficientData { required: 15, provided: 14 });
    }

    #[test]
    fn test_rsi_wilder_matches_ewm_alignment() {
        // 상승 [0, 4, 0], 하락 [0, 0, 1], alpha 0.5
        // → 평균 상승 [_, 2, 1], 평균 하락 [_, 0, 0.5] → [_, 100, 66.67]
        let prices = vec![dec!(10), dec!(14), dec!(13)];
        let rsi = MomentumCalculator::new()
            .rsi(&prices, RsiParams { period: 2, smoothing: RsiSmoothing::Wilder })
            .unwrap();
        assert_eq!(rsi.len(), 3);
        assert_eq!(rsi[0], None);
        assert_eq!(rsi[1], Some(dec!(100)));
        assert_eq!(rsi[2].map(|v| v.round_dp(2)), Some(dec!(66.67)));
    }

    #[test]
    fn test_rsi_wilder_needs_period_prices() {
        let calc = MomentumCalculator::new();
        let params = RsiParams { period: 3, smoothing: RsiSmoothing::Wilder };
        assert_eq!(
            calc.rsi(&[dec!(1), dec!(2)], params).unwrap_err(),
            IndicatorError::InsufficientData { required: 3, provided: 2 }
        );
        let rsi = calc.rsi(&[dec!(1), dec!(2), dec!(3)], params).unwrap();
        assert_eq!(rsi, vec![None, None, Some(dec!(100))]);
    }
}
