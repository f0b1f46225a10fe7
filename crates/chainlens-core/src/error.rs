//! 파이프라인 에러 타입.
//!
//! 스키마 에러는 수치 계산 이전에 실행 전체를 중단시키고, 그 외 에러는
//! 해당 파생 값만 무효화합니다. 필드 단위 파싱 실패는 에러로 전파하지 않고
//! 형변환 단계에서 바로 복구합니다 (`CoercionReport` 참고).

use thiserror::Error;

/// 정규화 이후 필수 컬럼이 누락된 경우의 스키마 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("필수 컬럼 누락: {}", .missing.join(", "))]
pub struct SchemaError {
    /// 누락된 정규화 컬럼 이름 (정렬, 중복 제거됨)
    pub missing: Vec<String>,
}

impl SchemaError {
    /// 누락 컬럼 목록으로 스키마 에러를 생성합니다.
    pub fn new<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut missing: Vec<String> = missing.into_iter().map(Into::into).collect();
        missing.sort();
        missing.dedup();
        Self { missing }
    }
}

/// 핵심 파이프라인 에러.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 스키마 에러 (치명적)
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// 테이블에 없는 컬럼 참조
    #[error("알 수 없는 컬럼: {0}")]
    UnknownColumn(String),

    /// 숫자가 아닌 셀을 숫자로 읽으려 한 경우
    #[error("숫자 컬럼이 아닙니다: {column} (행 {row})")]
    NotNumeric { column: String, row: usize },

    /// 행 너비가 컬럼 수와 다름
    #[error("행 너비 불일치: 기대 {expected}개, 실제 {found}개")]
    RowWidth { expected: usize, found: usize },

    /// 잘못된 입력 (필터 파라미터 등)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 합계가 Decimal 표현 범위를 넘음
    #[error("수치 범위 초과: {0}")]
    Overflow(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 입출력 에러
    #[error("데이터 에러: {0}")]
    Data(String),
}

/// 파이프라인 작업을 위한 Result 타입.
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// 스키마 단계에서 실행을 중단시킨 에러인지 확인합니다.
    pub fn is_schema(&self) -> bool {
        matches!(self, PipelineError::Schema(_))
    }

    /// 스키마 에러라면 누락 컬럼 목록을 반환합니다.
    pub fn missing_fields(&self) -> Option<&[String]> {
        match self {
            PipelineError::Schema(err) => Some(&err.missing),
            _ => None,
        }
    }
}

impl From<::config::ConfigError> for PipelineError {
    fn from(err: ::config::ConfigError) -> Self {
        PipelineError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_sorts_and_dedups() {
        let err = SchemaError::new(["Open", "Close", "Open"]);
        assert_eq!(err.missing, vec!["Close".to_string(), "Open".to_string()]);
        assert_eq!(err.to_string(), "필수 컬럼 누락: Close, Open");
    }

    #[test]
    fn test_pipeline_error_schema_helpers() {
        let err: PipelineError = SchemaError::new(["Date"]).into();
        assert!(err.is_schema());
        assert_eq!(err.missing_fields(), Some(&["Date".to_string()][..]));

        let other = PipelineError::UnknownColumn("RSI".to_string());
        assert!(!other.is_schema());
        assert!(other.missing_fields().is_none());
    }
}
