//! 명령행 인자 정의.

use crate::commands::OutputFormat;
use chainlens_analytics::Variant;
use chainlens_core::{AppConfig, LogConfig, LogFormat, OptionSide};
use chrono::{NaiveDate, Weekday};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "chainlens")]
#[command(about = "옵션/주식 CSV 내보내기 분석 도구", long_about = None)]
#[command(version)]
pub struct Cli {
    /// 설정 파일 (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 로그 필터 (예: info, chainlens_analytics=debug)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// 출력 형식 (table, json)
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// 매매 기록 분석 (승률, 일자별 손익)
    Trades(TradesArgs),

    /// 가격 시계열 분석 (RSI, 추세, 요일별 요약)
    Stocks(StocksArgs),

    /// 옵션 체인 분석 (ATM, Max Pain, 행사가 추천)
    Chain(ChainArgs),

    /// 헤더 정규화 결과와 누락된 필수 컬럼 확인
    Check(CheckArgs),

    /// 옵션 체인 정리 (빈 값 0 채우기 후 내보내기)
    Clean(CleanArgs),
}

#[derive(Debug, Args)]
pub struct TradesArgs {
    /// 매매 기록 CSV
    pub file: PathBuf,

    /// 시작일 (YYYY-MM-DD, 포함)
    #[arg(short = 'f', long)]
    pub from: Option<NaiveDate>,

    /// 종료일 (YYYY-MM-DD, 포함)
    #[arg(short, long)]
    pub to: Option<NaiveDate>,

    /// 종목 (쉼표로 구분)
    #[arg(short, long, value_delimiter = ',')]
    pub instrument: Vec<String>,

    /// 옵션 방향 (CE, PE)
    #[arg(short, long, value_delimiter = ',')]
    pub side: Vec<OptionSide>,

    /// 필터 적용 후 테이블을 CSV로 저장
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct StocksArgs {
    /// 가격 시계열 CSV
    pub file: PathBuf,

    /// 분석할 요일 (예: mon,fri). 비우면 전체
    #[arg(short, long, value_delimiter = ',')]
    pub weekday: Vec<Weekday>,

    /// 필터 적용 후 테이블을 CSV로 저장
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ChainArgs {
    /// 옵션 체인 CSV
    pub file: PathBuf,

    /// 이전 옵션 체인 CSV (IV 변화 계산용)
    #[arg(short, long)]
    pub prev: Option<PathBuf>,

    /// ATM 기준 행사가 범위 (설정값 대신 사용)
    #[arg(short, long)]
    pub window: Option<Decimal>,

    /// 정리된 wide 테이블을 CSV로 저장
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// 검사할 CSV
    pub file: PathBuf,

    /// 입력 유형 (chain, stocks, trades)
    #[arg(long, default_value = "chain")]
    pub variant: Variant,
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// 원본 옵션 체인 CSV
    pub file: PathBuf,

    /// 출력 파일
    #[arg(short, long)]
    pub output: PathBuf,
}

impl Cli {
    /// 로깅 설정 (설정 파일 → 환경 변수 → 명령행 순으로 덮어씀).
    pub fn log_config(&self, config: &AppConfig) -> LogConfig {
        let mut log = config.logging.to_log_config().override_from_env();
        if let Some(level) = &self.log_level {
            log.level = level.clone();
        }
        if let Some(format) = self.log_format {
            log.format = format;
        }
        log
    }
}
