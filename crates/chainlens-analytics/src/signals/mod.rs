//! 파생 시그널.
//!
//! 모든 함수는 순수 함수이며, 입력이 부족하면 `SignalValue`의
//! 명시적인 마커를 반환합니다.

pub mod chain;
pub mod price;

pub use chain::{
    atm_strike, directional_bias, estimate_delta, iv_change_signal, lots_for_target, max_pain,
    mean_iv_change, median, open_interest_by_strike, recommend_strikes, safe_strikes,
    strike_window, tidy, DirectionalBias, IvSignal, MaxPain, SafeStrikes, StrikeRecommendation,
    TradeAction,
};
pub use price::{
    candle_type, detect_runs, last_trend, suggest, trend_labels, trend_runs, RsiZone, Suggestion,
};
