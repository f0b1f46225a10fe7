//! long 형식 옵션 체인 호가.

use crate::types::OptionSide;
use rust_decimal::Decimal;
use serde::Serialize;

/// 행사가/방향별 옵션 체인 한 줄.
///
/// wide 형식 체인 (`CALLS …` / `STRIKE` / `PUTS …`)을 펼친 결과입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainQuote {
    pub strike: Decimal,
    pub side: OptionSide,
    pub open_interest: Decimal,
    pub oi_change: Decimal,
    pub volume: Decimal,
    pub iv: Decimal,
    /// 최종 체결가 (프리미엄)
    pub ltp: Decimal,
}
