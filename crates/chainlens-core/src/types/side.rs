//! 옵션 방향 (CALL / PUT).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 옵션 방향.
///
/// 브로커 내보내기에서는 `CE`/`PE`, `CALL`/`PUT`, `CALLS`/`PUTS` 등으로 표기됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionSide {
    /// 콜 옵션 (CE)
    Call,
    /// 풋 옵션 (PE)
    Put,
}

impl OptionSide {
    /// 표준 표기 (`CALL` / `PUT`)를 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionSide::Call => "CALL",
            OptionSide::Put => "PUT",
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CE" | "C" | "CALL" | "CALLS" => Ok(OptionSide::Call),
            "PE" | "P" | "PUT" | "PUTS" => Ok(OptionSide::Put),
            _ => Err(format!("Unknown option side: {}", s)),
        }
    }
}
