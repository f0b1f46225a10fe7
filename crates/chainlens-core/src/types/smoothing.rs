//! RSI 평활화 방식.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// RSI 평균 상승/하락폭 계산 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiSmoothing {
    /// 단순 이동평균 (rolling mean)
    #[default]
    Simple,
    /// Wilder 방식 지수 가중 평균 (alpha = 1/period)
    Wilder,
}

impl FromStr for RsiSmoothing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" | "sma" => Ok(Self::Simple),
            "wilder" | "ewm" => Ok(Self::Wilder),
            _ => Err(format!("Unknown RSI smoothing: {}", s)),
        }
    }
}
