//! # Chainlens Core
//!
//! 옵션/주식 CSV 분석 파이프라인의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 셀/행/테이블 모델 (`Cell`, `Row`, `Table`, `RawTable`)
//! - 정규화된 컬럼 이름 (`field`)
//! - 옵션 방향 (CALL/PUT) 및 요일 유틸리티
//! - 집계 결과 (`SummaryRecord`), 추세 구간 (`TrendRun`)
//! - 시그널 값과 리포트 (`SignalValue`, `SignalReport`)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use self::config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
