//! 가격 시계열 시그널.
//!
//! 추세 라벨, 연속 구간, 캔들 유형, RSI 구간, 옵션 매매 제안.

use chainlens_core::{CandleType, SignalValue, TrendLabel, TrendRun};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// RSI 과매도 기준.
pub const RSI_OVERSOLD: Decimal = dec!(30);
/// RSI 과매수 기준.
pub const RSI_OVERBOUGHT: Decimal = dec!(70);

/// 전일 대비 종가 방향. 첫 행은 비교 대상이 없어 `None`입니다.
pub fn trend_labels(closes: &[Decimal]) -> Vec<Option<TrendLabel>> {
    let mut labels = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return labels;
    }
    labels.push(None);
    labels.extend(closes.windows(2).map(|w| {
        Some(match w[1].cmp(&w[0]) {
            Ordering::Greater => TrendLabel::Up,
            Ordering::Less => TrendLabel::Down,
            Ordering::Equal => TrendLabel::NoChange,
        })
    }));
    labels
}

/// 연속 구간 검출 (한 번의 선형 스캔).
///
/// 라벨이 이전과 달라질 때마다 새 구간이 시작됩니다. `start_index`는
/// 입력 슬라이스 기준 위치입니다.
pub fn detect_runs(labels: &[TrendLabel]) -> Vec<TrendRun> {
    let mut runs: Vec<TrendRun> = Vec::new();
    for (index, label) in labels.iter().enumerate() {
        match runs.last_mut() {
            Some(run) if run.label == *label => run.length += 1,
            _ => runs.push(TrendRun {
                label: *label,
                length: 1,
                start_index: index,
            }),
        }
    }
    runs
}

/// 행 위치 기준 연속 구간. 라벨이 없는 행은 구간을 끊습니다.
pub fn trend_runs(labels: &[Option<TrendLabel>]) -> Vec<TrendRun> {
    let mut runs: Vec<TrendRun> = Vec::new();
    let mut open = false;
    for (index, label) in labels.iter().enumerate() {
        let Some(label) = label else {
            open = false;
            continue;
        };
        match runs.last_mut() {
            Some(run) if open && run.label == *label => run.length += 1,
            _ => {
                runs.push(TrendRun {
                    label: *label,
                    length: 1,
                    start_index: index,
                });
                open = true;
            }
        }
    }
    runs
}

/// 마지막 추세 라벨.
pub fn last_trend(labels: &[Option<TrendLabel>]) -> SignalValue<TrendLabel> {
    match labels.last().copied().flatten() {
        Some(label) => SignalValue::Available(label),
        None => SignalValue::insufficient(2, labels.len()),
    }
}

/// 캔들 유형.
pub fn candle_type(open: Decimal, close: Decimal) -> CandleType {
    match close.cmp(&open) {
        Ordering::Greater => CandleType::Bullish,
        Ordering::Less => CandleType::Bearish,
        Ordering::Equal => CandleType::Neutral,
    }
}

/// RSI 구간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RsiZone {
    Oversold,
    Neutral,
    Overbought,
}

impl RsiZone {
    pub fn from_rsi(rsi: Decimal) -> Self {
        if rsi < RSI_OVERSOLD {
            RsiZone::Oversold
        } else if rsi > RSI_OVERBOUGHT {
            RsiZone::Overbought
        } else {
            RsiZone::Neutral
        }
    }
}

impl fmt::Display for RsiZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RsiZone::Oversold => "Oversold",
            RsiZone::Neutral => "Neutral",
            RsiZone::Overbought => "Overbought",
        };
        f.write_str(s)
    }
}

/// 옵션 매매 제안.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Suggestion {
    #[serde(rename = "Sell Call")]
    SellCall,
    #[serde(rename = "Sell Put")]
    SellPut,
    #[serde(rename = "Buy Call")]
    BuyCall,
    #[serde(rename = "Buy Put")]
    BuyPut,
    Hold,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Suggestion::SellCall => "Sell Call",
            Suggestion::SellPut => "Sell Put",
            Suggestion::BuyCall => "Buy Call",
            Suggestion::BuyPut => "Buy Put",
            Suggestion::Hold => "Hold",
        };
        f.write_str(s)
    }
}

/// 최근 RSI와 마지막 추세로 제안을 만듭니다.
///
/// RSI 규칙이 추세 규칙보다 우선하며, RSI가 없으면 추세 규칙만 적용합니다.
pub fn suggest(rsi: Option<Decimal>, last_trend: Option<TrendLabel>) -> Suggestion {
    match rsi {
        Some(r) if r > RSI_OVERBOUGHT => return Suggestion::SellCall,
        Some(r) if r < RSI_OVERSOLD => return Suggestion::SellPut,
        _ => {}
    }
    match last_trend {
        Some(TrendLabel::Up) => Suggestion::BuyCall,
        Some(TrendLabel::Down) => Suggestion::BuyPut,
        _ => Suggestion::Hold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chainlens_core::TrendLabel::{Down, NoChange, Up};

    #[test]
    fn test_trend_labels() {
        let labels = trend_labels(&[dec!(10), dec!(11), dec!(11), dec!(9)]);
        assert_eq!(labels, vec![None, Some(Up), Some(NoChange), Some(Down)]);
        assert!(trend_labels(&[]).is_empty());
    }

    #[test]
    fn test_detect_runs_example() {
        let runs = detect_runs(&[Up, Up, Down, Down, Down, NoChange]);
        let pairs: Vec<_> = runs.iter().map(|r| (r.label, r.length)).collect();
        assert_eq!(pairs, vec![(Up, 2), (Down, 3), (NoChange, 1)]);
        assert_eq!(runs[1].start_index, 2);
        assert_eq!(runs.iter().map(|r| r.length).sum::<usize>(), 6);
    }

    #[test]
    fn test_trend_runs_uses_row_positions() {
        let runs = trend_runs(&[None, Some(Up), Some(Up), None, Some(Up)]);
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].start_index, runs[0].length), (1, 2));
        assert_eq!((runs[1].start_index, runs[1].length), (4, 1));
    }

    #[test]
    fn test_suggestion_rules() {
        assert_eq!(suggest(Some(dec!(75)), Some(Up)), Suggestion::SellCall);
        assert_eq!(suggest(Some(dec!(25)), Some(Up)), Suggestion::SellPut);
        assert_eq!(suggest(Some(dec!(50)), Some(Up)), Suggestion::BuyCall);
        assert_eq!(suggest(None, Some(Down)), Suggestion::BuyPut);
        assert_eq!(suggest(Some(dec!(70)), Some(NoChange)), Suggestion::Hold);
        assert_eq!(suggest(None, None), Suggestion::Hold);
    }

    #[test]
    fn test_candle_and_zone() {
        assert_eq!(candle_type(dec!(10), dec!(12)), CandleType::Bullish);
        assert_eq!(candle_type(dec!(10), dec!(9)), CandleType::Bearish);
        assert_eq!(candle_type(dec!(10), dec!(10)), CandleType::Neutral);
        assert_eq!(RsiZone::from_rsi(dec!(29.9)), RsiZone::Oversold);
        assert_eq!(RsiZone::from_rsi(dec!(70)), RsiZone::Neutral);
        assert_eq!(RsiZone::from_rsi(dec!(70.1)), RsiZone::Overbought);
    }

    #[test]
    fn test_last_trend_marker() {
        assert_eq!(last_trend(&[None]), SignalValue::insufficient(2, 1));
        assert_eq!(last_trend(&[None, Some(Down)]), SignalValue::Available(Down));
    }
}
