//! 집계/지표/정규화 속성 테스트

use chainlens_analytics::indicators::{IndicatorEngine, RsiParams};
use chainlens_analytics::signals::{atm_strike, detect_runs, max_pain};
use chainlens_analytics::{summarize_by_column, ColumnNormalizer, Variant};
use chainlens_core::{
    Cell, ChainQuote, Measure, OptionSide, RsiSmoothing, SignalValue, Table, TrendLabel,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn grouped(values: &[(u8, i64)]) -> Table {
    let rows = values
        .iter()
        .map(|(key, v)| vec![Cell::text(format!("k{}", key)), Cell::Number(Decimal::from(*v))])
        .collect();
    Table::from_rows(vec!["Key".to_string(), "Profit_Loss".to_string()], rows).unwrap()
}

fn quote(strike: Decimal, side: OptionSide, oi: Decimal, ltp: Decimal) -> ChainQuote {
    ChainQuote {
        strike,
        side,
        open_interest: oi,
        oi_change: Decimal::ZERO,
        volume: Decimal::ZERO,
        iv: Decimal::ZERO,
        ltp,
    }
}

fn label_strategy() -> impl Strategy<Value = TrendLabel> {
    prop_oneof![
        Just(TrendLabel::Up),
        Just(TrendLabel::Down),
        Just(TrendLabel::NoChange),
    ]
}

fn header_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec![
            "Date", "OPEN", "high", " Low ", "PREV. CLOSE", "ltp", "52W H", "Vol.", "No of trades",
            "CE/PE", "P&L", "Exit Price", "CALLS  OI", "puts chng in oi", "Strike", "Prev_Close",
        ])
        .prop_map(str::to_string),
        "[A-Za-z %./]{1,12}",
    ]
}

proptest! {
    #[test]
    fn summary_counts_cover_every_row(values in prop::collection::vec((0u8..5, -20i64..20), 0..60)) {
        let table = grouped(&values);
        let records = summarize_by_column(&table, "Key", &Measure::profit_loss()).unwrap();

        let total: usize = records.iter().map(|r| r.total_count).sum();
        prop_assert_eq!(total, values.len());
        for r in &records {
            prop_assert!(r.positive_count <= r.total_count);
            prop_assert!(r.positive_count + r.negative_count <= r.total_count);
            prop_assert!(r.win_rate.is_some());
        }
        prop_assert!(records.windows(2).all(|w| w[0].total_value >= w[1].total_value));
    }

    #[test]
    fn rsi_stays_within_bounds(prices in prop::collection::vec(1i64..500, 16..60)) {
        let prices: Vec<Decimal> = prices.into_iter().map(Decimal::from).collect();
        for smoothing in [RsiSmoothing::Simple, RsiSmoothing::Wilder] {
            let rsi = IndicatorEngine::new()
                .rsi(&prices, RsiParams { period: 14, smoothing })
                .unwrap();
            let warmup = match smoothing {
                RsiSmoothing::Simple => 14,
                RsiSmoothing::Wilder => 13,
            };
            prop_assert_eq!(rsi.len(), prices.len());
            prop_assert!(rsi[..warmup].iter().all(Option::is_none));
            for v in rsi.iter().flatten() {
                prop_assert!(*v >= Decimal::ZERO && *v <= Decimal::ONE_HUNDRED);
            }
        }
    }

    #[test]
    fn rsi_follows_monotonic_series(start in 10i64..1000, step in 1i64..20, len in 16usize..50) {
        let rising: Vec<Decimal> = (0..len as i64).map(|i| Decimal::from(start + i * step)).collect();
        let falling: Vec<Decimal> = rising.iter().rev().copied().collect();
        let engine = IndicatorEngine::new();

        let up = engine.rsi(&rising, RsiParams::default()).unwrap();
        let down = engine.rsi(&falling, RsiParams::default()).unwrap();
        prop_assert_eq!(up.last().copied().flatten(), Some(Decimal::ONE_HUNDRED));
        prop_assert_eq!(down.last().copied().flatten(), Some(Decimal::ZERO));
    }

    #[test]
    fn run_lengths_sum_to_label_count(labels in prop::collection::vec(label_strategy(), 0..50)) {
        let runs = detect_runs(&labels);
        prop_assert_eq!(runs.iter().map(|r| r.length).sum::<usize>(), labels.len());
        prop_assert!(runs.windows(2).all(|w| w[0].label != w[1].label));
    }

    #[test]
    fn normalization_is_idempotent(headers in prop::collection::vec(header_strategy(), 1..12)) {
        for variant in [Variant::Trades, Variant::Stocks, Variant::Chain] {
            let normalizer = ColumnNormalizer::new(variant);
            let once: Vec<String> = headers.iter().map(|h| normalizer.normalize(h)).collect();
            let twice: Vec<String> = once.iter().map(|h| normalizer.normalize(h)).collect();
            prop_assert_eq!(once, twice);
        }
    }
}

#[test]
fn trend_runs_example() {
    use chainlens_core::TrendLabel::{Down, NoChange, Up};
    let runs = detect_runs(&[Up, Up, Down, Down, Down, NoChange]);
    let pairs: Vec<(String, usize)> = runs.iter().map(|r| (r.label.to_string(), r.length)).collect();
    assert_eq!(
        pairs,
        vec![
            ("Up".to_string(), 2),
            ("Down".to_string(), 3),
            ("No Change".to_string(), 1)
        ]
    );
}

#[test]
fn atm_prefers_zero_divergence() {
    let quotes = vec![
        quote(dec!(100), OptionSide::Call, dec!(0), dec!(5.0)),
        quote(dec!(100), OptionSide::Put, dec!(0), dec!(5.1)),
        quote(dec!(105), OptionSide::Call, dec!(0), dec!(4.0)),
        quote(dec!(105), OptionSide::Put, dec!(0), dec!(4.0)),
    ];
    assert_eq!(atm_strike(&quotes), SignalValue::Available(dec!(105)));
}

#[test]
fn max_pain_tie_goes_to_lowest_strike() {
    let quotes = vec![
        quote(dec!(100), OptionSide::Call, dec!(300), dec!(1)),
        quote(dec!(100), OptionSide::Put, dec!(200), dec!(1)),
        quote(dec!(105), OptionSide::Call, dec!(400), dec!(1)),
        quote(dec!(105), OptionSide::Put, dec!(500), dec!(1)),
        quote(dec!(110), OptionSide::Call, dec!(900), dec!(1)),
    ];
    let pain = max_pain(&quotes).into_value().unwrap();
    assert_eq!(pain.strike, dec!(105));
    assert_eq!(pain.total_open_interest, dec!(900));
}

#[test]
fn empty_group_has_undefined_win_rate() {
    let table = grouped(&[]);
    let records = summarize_by_column(&table, "Key", &Measure::profit_loss()).unwrap();
    assert!(records.is_empty());

    let empty = chainlens_core::SummaryRecord::empty(Cell::text("Friday"));
    assert_eq!(empty.win_rate, None);
    assert_eq!(empty.positive_ratio(), None);
}
