//! # Chainlens Analytics
//!
//! 브로커 CSV 내보내기를 분석하는 파이프라인 단계를 제공합니다.
//!
//! - [`normalize`]: 헤더 정규화와 필수 컬럼 검사
//! - [`coerce`]: 날짜/숫자 형변환 (날짜 실패 시 행 제거, 숫자 실패 시 0)
//! - [`aggregate`]: 키별 승률 집계 및 매매 지표
//! - [`indicators`]: SMA / EMA / MACD / RSI
//! - [`signals`]: 추세, ATM, Max Pain, 방향성, IV 변화 등 파생 시그널
//! - [`pipeline`]: 입력 유형별 (trades / stocks / chain) 실행 흐름

pub mod aggregate;
pub mod coerce;
pub mod indicators;
pub mod normalize;
pub mod pipeline;
pub mod signals;

pub use aggregate::*;
pub use coerce::{CoercionPlan, CoercionReport, TypeCoercer};
pub use normalize::{ColumnCheck, ColumnNormalizer, Variant};
pub use pipeline::*;
