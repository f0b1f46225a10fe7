//! 집계 결과와 추세 라벨.

use crate::error::{PipelineError, PipelineResult};
use crate::types::{field, Cell};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 그룹화 기준.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationKey {
    OptionSide,
    Instrument,
    Strike,
    Weekday,
    /// 달력 날짜 (일별 손익 시계열)
    Day,
}

impl AggregationKey {
    /// 그룹화에 사용하는 정규화 컬럼 이름.
    pub fn column(&self) -> &'static str {
        match self {
            AggregationKey::OptionSide => field::OPTION_SIDE,
            AggregationKey::Instrument => field::INSTRUMENT,
            AggregationKey::Strike => field::STRIKE,
            AggregationKey::Weekday => field::WEEKDAY,
            AggregationKey::Day => field::DAY,
        }
    }
}

/// 손익 측정값.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Measure {
    /// 숫자 컬럼 값 그대로 (예: `Profit_Loss`)
    Column(String),
    /// 종가 - 시가
    CloseMinusOpen,
}

impl Measure {
    /// `Profit_Loss` 컬럼 측정값.
    pub fn profit_loss() -> Self {
        Measure::Column(field::PROFIT_LOSS.to_string())
    }
}

/// 그룹별 집계 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRecord {
    /// 그룹 키 값
    pub key_value: Cell,
    /// 그룹 행 수
    pub total_count: usize,
    /// 측정값 > 0 인 행 수
    pub positive_count: usize,
    /// 측정값 < 0 인 행 수
    pub negative_count: usize,
    /// 측정값 합계
    pub total_value: Decimal,
    /// 승률 (%). 행이 없는 그룹은 `None` (정의되지 않음)
    pub win_rate: Option<Decimal>,
}

impl SummaryRecord {
    /// 빈 그룹 레코드.
    pub fn empty(key_value: Cell) -> Self {
        Self {
            key_value,
            total_count: 0,
            positive_count: 0,
            negative_count: 0,
            total_value: Decimal::ZERO,
            win_rate: None,
        }
    }

    /// 측정값 하나를 반영합니다.
    ///
    /// 합계가 Decimal 범위를 넘으면 `PipelineError::Overflow`를 반환하고
    /// 레코드는 바뀌지 않습니다.
    pub fn record(&mut self, value: Decimal) -> PipelineResult<()> {
        let total_value = self.total_value.checked_add(value).ok_or_else(|| {
            PipelineError::Overflow(format!("group {} total", self.key_value))
        })?;
        self.total_count += 1;
        if value > Decimal::ZERO {
            self.positive_count += 1;
        } else if value < Decimal::ZERO {
            self.negative_count += 1;
        }
        self.total_value = total_value;
        self.win_rate = self.ratio(self.positive_count).map(|r| r * Decimal::ONE_HUNDRED);
        Ok(())
    }

    /// 양수 비율 (0~1). 빈 그룹은 `None`.
    pub fn positive_ratio(&self) -> Option<Decimal> {
        self.ratio(self.positive_count)
    }

    /// 음수 비율 (0~1). 빈 그룹은 `None`.
    pub fn negative_ratio(&self) -> Option<Decimal> {
        self.ratio(self.negative_count)
    }

    fn ratio(&self, count: usize) -> Option<Decimal> {
        if self.total_count == 0 {
            return None;
        }
        Some(Decimal::from(count) / Decimal::from(self.total_count))
    }
}

/// 전일 대비 종가 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendLabel {
    Up,
    Down,
    #[serde(rename = "No Change")]
    NoChange,
}

impl TrendLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendLabel::Up => "Up",
            TrendLabel::Down => "Down",
            TrendLabel::NoChange => "No Change",
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 같은 추세 라벨이 연속된 구간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendRun {
    pub label: TrendLabel,
    pub length: usize,
    /// 구간이 시작되는 행 위치
    pub start_index: usize,
}

/// 캔들 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandleType {
    /// 종가 > 시가
    Bullish,
    /// 종가 < 시가
    Bearish,
    Neutral,
}

impl fmt::Display for CandleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CandleType::Bullish => "Bullish",
            CandleType::Bearish => "Bearish",
            CandleType::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_record_updates_counts() {
        let mut rec = SummaryRecord::empty(Cell::text("CALL"));
        assert_eq!(rec.win_rate, None);

        for value in [dec!(100), dec!(-40), dec!(0), dec!(10)] {
            rec.record(value).unwrap();
        }

        assert_eq!(rec.total_count, 4);
        assert_eq!(rec.positive_count, 2);
        assert_eq!(rec.negative_count, 1);
        assert_eq!(rec.total_value, dec!(70));
        assert_eq!(rec.win_rate, Some(dec!(50)));
        assert_eq!(rec.negative_ratio(), Some(dec!(0.25)));
    }

    #[test]
    fn test_record_overflow_leaves_record_unchanged() {
        let mut rec = SummaryRecord::empty(Cell::text("CE"));
        rec.record(Decimal::MAX).unwrap();

        let err = rec.record(Decimal::MAX).unwrap_err();
        assert!(matches!(err, PipelineError::Overflow(_)));
        assert_eq!(rec.total_count, 1);
        assert_eq!(rec.total_value, Decimal::MAX);
    }

    #[test]
    fn test_trend_label_serde_name() {
        let json = serde_json::to_string(&TrendLabel::NoChange).unwrap();
        assert_eq!(json, "\"No Change\"");
        assert_eq!(TrendLabel::NoChange.to_string(), "No Change");
    }
}
