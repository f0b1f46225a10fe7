//! 명령행 인자 파싱 테스트

use chainlens_analytics::Variant;
use chainlens_cli::commands::OutputFormat;
use chainlens_cli::{Cli, Commands};
use chainlens_core::{AppConfig, LogFormat, OptionSide};
use chrono::{NaiveDate, Weekday};
use clap::Parser;
use rust_decimal_macros::dec;
use std::path::PathBuf;

#[test]
fn parses_trades_filters() {
    let cli = Cli::try_parse_from([
        "chainlens",
        "trades",
        "trades.csv",
        "--from",
        "2024-03-01",
        "--to",
        "2024-03-31",
        "-i",
        "NIFTY,BANKNIFTY",
        "--side",
        "CE",
        "--export",
        "out.csv",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Table);
    let Commands::Trades(args) = cli.command else {
        panic!("expected trades command");
    };
    assert_eq!(args.file, PathBuf::from("trades.csv"));
    assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 3, 1));
    assert_eq!(args.to, NaiveDate::from_ymd_opt(2024, 3, 31));
    assert_eq!(args.instrument, vec!["NIFTY", "BANKNIFTY"]);
    assert_eq!(args.side, vec![OptionSide::Call]);
    assert_eq!(args.export, Some(PathBuf::from("out.csv")));
}

#[test]
fn parses_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "chainlens",
        "stocks",
        "quotes.csv",
        "-w",
        "mon,fri",
        "--format",
        "json",
        "--log-format",
        "json",
        "--log-level",
        "debug",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Json);
    assert_eq!(cli.log_format, Some(LogFormat::Json));

    let log = cli.log_config(&AppConfig::default());
    assert_eq!(log.level, "debug");
    assert_eq!(log.format, LogFormat::Json);

    let Commands::Stocks(args) = cli.command else {
        panic!("expected stocks command");
    };
    assert_eq!(args.weekday, vec![Weekday::Mon, Weekday::Fri]);
}

#[test]
fn parses_chain_and_check() {
    let cli = Cli::try_parse_from([
        "chainlens",
        "chain",
        "chain.csv",
        "--prev",
        "yesterday.csv",
        "--window",
        "200",
    ])
    .unwrap();
    let Commands::Chain(args) = cli.command else {
        panic!("expected chain command");
    };
    assert_eq!(args.prev, Some(PathBuf::from("yesterday.csv")));
    assert_eq!(args.window, Some(dec!(200)));

    let cli = Cli::try_parse_from(["chainlens", "check", "data.csv"]).unwrap();
    let Commands::Check(args) = cli.command else {
        panic!("expected check command");
    };
    assert_eq!(args.variant, Variant::Chain);
}

#[test]
fn rejects_invalid_values() {
    assert!(Cli::try_parse_from(["chainlens", "clean", "chain.csv"]).is_err());
    assert!(Cli::try_parse_from(["chainlens", "check", "a.csv", "--variant", "bonds"]).is_err());
    assert!(Cli::try_parse_from(["chainlens", "trades", "t.csv", "--side", "XX"]).is_err());
    assert!(Cli::try_parse_from(["chainlens", "--format", "xml", "stocks", "s.csv"]).is_err());
}
