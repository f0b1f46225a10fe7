//! CSV 입출력.
//!
//! 이 crate는 다음을 제공합니다:
//! - 헤더 + 레코드 형식의 구분자 텍스트를 `RawTable`로 읽기
//! - `Table`을 결정적인 CSV로 내보내기 (컬럼 순서 유지)

pub mod delimited;
pub mod error;

pub use delimited::*;
pub use error::{DataError, Result};
