//! 헤더 정규화.
//!
//! 브로커마다 다른 헤더 (`Prev. Close`, `CE/PE`, `CALLS CHNG IN OI` 등)를
//! 정규화 컬럼 이름으로 바꾸고, 입력 유형별 필수 컬럼을 검사합니다.

use chainlens_core::field::*;
use chainlens_core::{RawTable, SchemaError};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// 입력 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// 옵션 매매 기록
    Trades,
    /// 일별 가격 시계열
    Stocks,
    /// wide 형식 옵션 체인
    Chain,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Trades => "trades",
            Variant::Stocks => "stocks",
            Variant::Chain => "chain",
        }
    }

    fn synonyms(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Variant::Trades => TRADE_SYNONYMS,
            Variant::Stocks => STOCK_SYNONYMS,
            Variant::Chain => CHAIN_SYNONYMS,
        }
    }

    /// 정규화 이후 반드시 있어야 하는 컬럼.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Variant::Trades => &[DATE, INSTRUMENT, OPTION_SIDE, STRIKE, PROFIT_LOSS],
            Variant::Stocks => &[DATE, OPEN, HIGH, LOW, CLOSE],
            Variant::Chain => CHAIN_REQUIRED,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trades" | "trade" => Ok(Variant::Trades),
            "stocks" | "stock" => Ok(Variant::Stocks),
            "chain" | "option-chain" => Ok(Variant::Chain),
            _ => Err(format!("Unknown input variant: {}", s)),
        }
    }
}

const STOCK_SYNONYMS: &[(&str, &str)] = &[
    ("DATE", DATE),
    ("DAY", DAY),
    ("WEEKDAY", WEEKDAY),
    ("OPEN", OPEN),
    ("HIGH", HIGH),
    ("LOW", LOW),
    ("PREV. CLOSE", PREV_CLOSE),
    ("LTP", CLOSE),
    ("CLOSE", CLOSE),
    ("PRICE", CLOSE),
    ("VWAP", VWAP),
    ("52W H", HIGH_52W),
    ("52W L", LOW_52W),
    ("VOLUME", VOLUME),
    ("VOL.", VOLUME),
    ("VALUE", VALUE),
    ("NO OF TRADES", TRADES),
    ("SERIES", SERIES),
    ("CHANGE(%)", CHANGE_PCT),
    ("CHANGE %", CHANGE_PCT),
];

const TRADE_SYNONYMS: &[(&str, &str)] = &[
    ("DATE", DATE),
    ("DAY", DAY),
    ("INSTRUMENT", INSTRUMENT),
    ("CE/PE", OPTION_SIDE),
    ("OPTION TYPE", OPTION_SIDE),
    ("STRIKE", STRIKE),
    ("PROFIT/LOSS", PROFIT_LOSS),
    ("P&L", PROFIT_LOSS),
    ("RETURN %", RETURN_PCT),
    ("EXIT PRICE", EXIT_PRICE),
];

const CHAIN_SYNONYMS: &[(&str, &str)] = &[
    ("STRIKE", STRIKE),
    ("CALLS OI", CALL_OI),
    ("CALLS CHNG IN OI", CALL_OI_CHANGE),
    ("CALLS VOLUME", CALL_VOLUME),
    ("CALLS IV", CALL_IV),
    ("CALLS LTP", CALL_LTP),
    ("CALLS CHNG", CALL_CHNG),
    ("CALLS BID QTY", CALL_BID_QTY),
    ("CALLS BID", CALL_BID),
    ("CALLS ASK", CALL_ASK),
    ("CALLS ASK QTY", CALL_ASK_QTY),
    ("PUTS OI", PUT_OI),
    ("PUTS CHNG IN OI", PUT_OI_CHANGE),
    ("PUTS VOLUME", PUT_VOLUME),
    ("PUTS IV", PUT_IV),
    ("PUTS LTP", PUT_LTP),
    ("PUTS CHNG", PUT_CHNG),
    ("PUTS BID QTY", PUT_BID_QTY),
    ("PUTS BID", PUT_BID),
    ("PUTS ASK", PUT_ASK),
    ("PUTS ASK QTY", PUT_ASK_QTY),
];

const CHAIN_REQUIRED: &[&str] = &[
    STRIKE,
    CALL_OI,
    CALL_OI_CHANGE,
    CALL_VOLUME,
    CALL_IV,
    CALL_LTP,
    CALL_CHNG,
    CALL_BID_QTY,
    CALL_BID,
    CALL_ASK,
    CALL_ASK_QTY,
    PUT_OI,
    PUT_OI_CHANGE,
    PUT_VOLUME,
    PUT_IV,
    PUT_LTP,
    PUT_CHNG,
    PUT_BID_QTY,
    PUT_BID,
    PUT_ASK,
    PUT_ASK_QTY,
];

/// 공백 정리 + 대문자화.
fn canonical_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// 헤더 검사 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnCheck {
    pub variant: Variant,
    /// (원본 헤더, 정규화 헤더)
    pub columns: Vec<(String, String)>,
    /// 누락된 필수 컬럼 (정렬됨)
    pub missing: Vec<String>,
}

impl ColumnCheck {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }
}

/// 입력 유형별 헤더 정규화기.
#[derive(Debug, Clone)]
pub struct ColumnNormalizer {
    variant: Variant,
    lookup: HashMap<String, &'static str>,
}

impl ColumnNormalizer {
    pub fn new(variant: Variant) -> Self {
        let mut lookup = HashMap::new();
        for (raw, canonical) in variant.synonyms() {
            lookup.insert(canonical_key(raw), *canonical);
            // 이미 정규화된 이름도 그대로 인식 (멱등성)
            lookup.insert(canonical_key(canonical), *canonical);
        }
        Self { variant, lookup }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// 헤더 하나를 정규화합니다. 매핑이 없으면 대문자화된 형태를 반환합니다.
    pub fn normalize(&self, raw: &str) -> String {
        let key = canonical_key(raw);
        match self.lookup.get(&key) {
            Some(canonical) => (*canonical).to_string(),
            None => key,
        }
    }

    /// 헤더 목록 전체를 정규화합니다.
    ///
    /// 여러 헤더가 같은 이름으로 매핑되면 (`LTP`와 `CLOSE` 등) 정규화 이름과
    /// 직접 일치하는 헤더가, 없으면 먼저 나온 헤더가 이름을 갖습니다. 나머지는
    /// 대문자화된 원래 이름을 유지합니다.
    pub fn normalize_headers(&self, headers: &[String]) -> Vec<String> {
        let mut owner: HashMap<&'static str, (usize, bool)> = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            let key = canonical_key(header);
            let Some(canonical) = self.lookup.get(&key).copied() else {
                continue;
            };
            let direct = key == canonical_key(canonical);
            match owner.get(canonical) {
                Some((_, true)) => {}
                Some((_, false)) if !direct => {}
                _ => {
                    owner.insert(canonical, (idx, direct));
                }
            }
        }

        headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let key = canonical_key(header);
                match self.lookup.get(&key) {
                    Some(canonical) if owner.get(canonical).map(|(i, _)| *i) == Some(idx) => {
                        (*canonical).to_string()
                    }
                    _ => key,
                }
            })
            .collect()
    }

    /// 필수 컬럼 검사 없이 헤더만 바꿉니다.
    pub fn rename(&self, mut raw: RawTable) -> RawTable {
        raw.headers = self.normalize_headers(&raw.headers);
        raw
    }

    /// 정규화된 헤더 목록에서 누락된 필수 컬럼.
    pub fn missing_required(&self, headers: &[String]) -> Vec<String> {
        let mut missing: Vec<String> = self
            .variant
            .required_fields()
            .iter()
            .filter(|field| !headers.iter().any(|h| h == *field))
            .map(|field| field.to_string())
            .collect();
        missing.sort();
        missing
    }

    /// 헤더를 정규화하고 필수 컬럼을 검사합니다.
    pub fn apply(&self, raw: RawTable) -> Result<RawTable, SchemaError> {
        let renamed = self.rename(raw);
        let missing = self.missing_required(&renamed.headers);
        if !missing.is_empty() {
            return Err(SchemaError::new(missing));
        }
        debug!(variant = %self.variant, columns = renamed.headers.len(), "Headers normalized");
        Ok(renamed)
    }

    /// 헤더를 검사만 합니다 (테이블은 변경하지 않음).
    pub fn check(&self, headers: &[String]) -> ColumnCheck {
        let columns: Vec<(String, String)> = headers
            .iter()
            .cloned()
            .zip(self.normalize_headers(headers))
            .collect();
        let normalized: Vec<String> = columns.iter().map(|(_, n)| n.clone()).collect();
        ColumnCheck {
            variant: self.variant,
            missing: self.missing_required(&normalized),
            columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_stock_synonyms() {
        let n = ColumnNormalizer::new(Variant::Stocks);
        assert_eq!(n.normalize("  Prev.   Close "), PREV_CLOSE);
        assert_eq!(n.normalize("Price"), CLOSE);
        assert_eq!(n.normalize("ltp"), CLOSE);
        assert_eq!(n.normalize("Vol."), VOLUME);
        assert_eq!(n.normalize("Change %"), CHANGE_PCT);
        assert_eq!(n.normalize("unknown col"), "UNKNOWN COL");
    }

    #[test]
    fn test_trade_synonyms() {
        let n = ColumnNormalizer::new(Variant::Trades);
        assert_eq!(n.normalize("CE/PE"), OPTION_SIDE);
        assert_eq!(n.normalize("Profit/Loss"), PROFIT_LOSS);
        assert_eq!(n.normalize("Exit Price"), EXIT_PRICE);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for variant in [Variant::Trades, Variant::Stocks, Variant::Chain] {
            let n = ColumnNormalizer::new(variant);
            for (raw, _) in variant.synonyms() {
                let once = n.normalize(raw);
                assert_eq!(n.normalize(&once), once, "{} / {}", variant, raw);
            }
        }
    }

    #[test]
    fn test_direct_match_wins_collision() {
        let n = ColumnNormalizer::new(Variant::Stocks);
        let renamed = n.normalize_headers(&headers(&["Date", "LTP", "Close", "Price"]));
        assert_eq!(renamed, vec![DATE, "LTP", CLOSE, "PRICE"]);
        assert_eq!(n.normalize_headers(&renamed), renamed);

        let fallback = n.normalize_headers(&headers(&["LTP", "Price"]));
        assert_eq!(fallback, vec![CLOSE, "PRICE"]);
    }

    #[test]
    fn test_apply_reports_missing_sorted() {
        let n = ColumnNormalizer::new(Variant::Stocks);
        let raw = RawTable::new(headers(&["Date", "Price"]), vec![]);
        let err = n.apply(raw).unwrap_err();
        assert_eq!(err.missing, vec!["High", "Low", "Open"]);
    }

    #[test]
    fn test_chain_requires_all_fields() {
        let n = ColumnNormalizer::new(Variant::Chain);
        let check = n.check(&headers(&["STRIKE", "CALLS OI", "PUTS OI"]));
        assert!(!check.is_valid());
        assert_eq!(check.missing.len(), 18);
        assert_eq!(check.columns[1], ("CALLS OI".to_string(), CALL_OI.to_string()));
    }
}
