//! 파생 시그널 값과 리포트.
//!
//! 계산에 필요한 입력이 부족하면 그럴듯한 기본값 대신 명시적인 마커를 돌려줍니다.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// 시그널 계산 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum SignalValue<T> {
    /// 계산된 값
    Available(T),
    /// 최소 입력 조건 미충족
    InsufficientData { required: usize, provided: usize },
    /// 입력 자체가 없어 계산하지 않음 (예: 이전 체인 미제공)
    NotAvailable(String),
}

impl<T> SignalValue<T> {
    pub fn insufficient(required: usize, provided: usize) -> Self {
        SignalValue::InsufficientData { required, provided }
    }

    pub fn not_available(reason: impl Into<String>) -> Self {
        SignalValue::NotAvailable(reason.into())
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SignalValue::Available(_))
    }

    /// 계산된 값 참조.
    pub fn value(&self) -> Option<&T> {
        match self {
            SignalValue::Available(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            SignalValue::Available(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> SignalValue<&T> {
        match self {
            SignalValue::Available(v) => SignalValue::Available(v),
            SignalValue::InsufficientData { required, provided } => SignalValue::InsufficientData {
                required: *required,
                provided: *provided,
            },
            SignalValue::NotAvailable(reason) => SignalValue::NotAvailable(reason.clone()),
        }
    }

    /// 값이 있을 때만 변환합니다. 마커는 그대로 유지됩니다.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> SignalValue<U> {
        match self {
            SignalValue::Available(v) => SignalValue::Available(f(v)),
            SignalValue::InsufficientData { required, provided } => {
                SignalValue::InsufficientData { required, provided }
            }
            SignalValue::NotAvailable(reason) => SignalValue::NotAvailable(reason),
        }
    }
}

impl<T: fmt::Display> fmt::Display for SignalValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Available(v) => write!(f, "{}", v),
            SignalValue::InsufficientData { required, provided } => {
                write!(f, "insufficient data (required {}, provided {})", required, provided)
            }
            SignalValue::NotAvailable(reason) => write!(f, "not available: {}", reason),
        }
    }
}

/// 이름별 시그널 모음. 이름 순으로 정렬되어 출력이 결정적입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SignalReport {
    signals: BTreeMap<String, SignalValue<String>>,
}

impl SignalReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 시그널을 문자열 값으로 기록합니다.
    pub fn insert<T: fmt::Display>(&mut self, name: impl Into<String>, value: &SignalValue<T>) {
        self.signals
            .insert(name.into(), value.as_ref().map(|v| v.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&SignalValue<String>> {
        self.signals.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SignalValue<String>)> {
        self.signals.iter()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}
