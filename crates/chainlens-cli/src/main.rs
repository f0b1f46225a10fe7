//! chainlens CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 매매 기록: 3월 NIFTY 콜만
//! chainlens trades trades.csv -f 2024-03-01 -t 2024-03-31 -i NIFTY -s CE
//!
//! # 주식 시세: 월요일/금요일만, JSON 출력
//! chainlens --format json stocks quotes.csv -w mon,fri
//!
//! # 옵션 체인: 이전 체인과 비교
//! chainlens chain chain.csv --prev chain_yesterday.csv --window 200
//!
//! # 헤더 확인 / 정리
//! chainlens check chain.csv --variant chain
//! chainlens clean chain.csv -o chain_clean.csv
//! ```

use anyhow::Context;
use chainlens_cli::{commands, Cli};
use chainlens_core::{init_logging, AppConfig};
use clap::Parser;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(cli.log_config(&config)).context("Failed to initialize logging")?;
    info!(config = ?cli.config, format = %cli.format, "Starting chainlens");

    if let Err(e) = commands::run(cli.command, &config, cli.format) {
        error!("Command failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}
