//! 데이터 모듈 오류 타입.

use chainlens_core::PipelineError;
use thiserror::Error;

/// 데이터 입출력 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    IoError(String),

    /// CSV 파싱/쓰기 오류
    #[error("CSV error: {0}")]
    CsvError(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        DataError::IoError(err.to_string())
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            DataError::IoError(err.to_string())
        } else {
            DataError::CsvError(err.to_string())
        }
    }
}

impl From<DataError> for PipelineError {
    fn from(err: DataError) -> Self {
        PipelineError::Data(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
