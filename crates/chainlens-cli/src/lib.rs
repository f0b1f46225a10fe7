//! chainlens CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 명령행 인자 정의 ([`cli`])
//! - 입력 유형별 분석 명령과 출력 형식 ([`commands`])

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
