//! 테이블 셀 값.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// 내보내기 시 날짜 형식.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// 내보내기 시 날짜+시간 형식 (자정이 아닌 경우). 초 미만 값이 있을 때만
/// 소수부를 씁니다.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// 형변환이 끝난 테이블의 셀.
///
/// `Decimal`의 `Eq`/`Hash`는 스케일과 무관하므로 (`100` == `100.0`)
/// 셀을 그대로 그룹 키로 사용할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// 값 없음 (빈 문자열, 계산 불가 등)
    Missing,
    /// 숫자
    Number(Decimal),
    /// 날짜+시간
    DateTime(NaiveDateTime),
    /// 날짜 (시간 정보 제거)
    Date(NaiveDate),
    /// 문자열
    Text(String),
}

impl Cell {
    /// 문자열 셀을 생성합니다.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// 값이 없는 셀인지 확인합니다.
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// 숫자 값을 반환합니다.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// 날짜+시간 값을 반환합니다.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::DateTime(value) => Some(*value),
            Cell::Date(value) => Some(value.and_time(NaiveTime::MIN)),
            _ => None,
        }
    }

    /// 날짜 값을 반환합니다 (`DateTime`이면 시간을 버립니다).
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(value) => Some(*value),
            Cell::DateTime(value) => Some(value.date()),
            _ => None,
        }
    }

    /// 문자열 값을 반환합니다.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// 비어 있거나 공백뿐인 셀인지 확인합니다.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }

    /// CSV 내보내기용 문자열로 변환합니다.
    ///
    /// 다시 읽어 같은 형변환을 적용하면 같은 셀이 복원됩니다.
    pub fn render(&self) -> String {
        match self {
            Cell::Missing => String::new(),
            Cell::Number(value) => value.to_string(),
            Cell::DateTime(value) => {
                if value.time() == NaiveTime::MIN {
                    value.format(DATE_FORMAT).to_string()
                } else {
                    value.format(DATETIME_FORMAT).to_string()
                }
            }
            Cell::Date(value) => value.format(DATE_FORMAT).to_string(),
            Cell::Text(value) => value.clone(),
        }
    }

    /// 정렬용 비교.
    ///
    /// 같은 종류끼리는 값으로 비교하고, 종류가 다르면
    /// `Missing < Number < Date/DateTime < Text` 순서를 따릅니다.
    pub fn sort_cmp(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Number(a), Cell::Number(b)) => a.cmp(b),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (a, b) if a.rank() == 2 && b.rank() == 2 => a.as_datetime().cmp(&b.as_datetime()),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Cell::Missing => 0,
            Cell::Number(_) => 1,
            Cell::DateTime(_) | Cell::Date(_) => 2,
            Cell::Text(_) => 3,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Cell::Number(value)
    }
}

impl From<Option<Decimal>> for Cell {
    fn from(value: Option<Decimal>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Missing)
    }
}
