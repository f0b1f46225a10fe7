//! 옵션 체인 파이프라인.

use crate::coerce::{CoercionReport, TypeCoercer};
use crate::normalize::{ColumnNormalizer, Variant};
use crate::signals::{
    atm_strike, directional_bias, iv_change_signal, max_pain, mean_iv_change, recommend_strikes,
    safe_strikes, strike_window, tidy, DirectionalBias, IvSignal, MaxPain, SafeStrikes,
    StrikeRecommendation,
};
use chainlens_core::{
    AppConfig, ChainQuote, PipelineResult, RawTable, SignalReport, SignalValue, Table,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use super::{coercion_plan, prepare};

/// 옵션 체인 분석 결과.
#[derive(Debug, Clone, Serialize)]
pub struct ChainReport {
    pub coercion: CoercionReport,
    /// 펼친 호가 수 (행사가 × 2)
    pub quote_count: usize,
    pub atm_strike: SignalValue<Decimal>,
    pub max_pain: SignalValue<MaxPain>,
    pub directional_bias: SignalValue<DirectionalBias>,
    pub mean_iv_change: SignalValue<Decimal>,
    pub iv_signal: SignalValue<IvSignal>,
    pub recommendations: Vec<StrikeRecommendation>,
    pub safe_strikes: SafeStrikes,
    /// ATM ± `strike_window` 범위의 호가
    pub window: Vec<ChainQuote>,
    pub signals: SignalReport,
    /// 0으로 채운 wide 형식 테이블
    pub table: Table,
}

fn load_quotes(
    raw: RawTable,
    config: &AppConfig,
) -> PipelineResult<(Table, CoercionReport, Vec<ChainQuote>)> {
    let (table, report) = prepare(raw, Variant::Chain, &config.pipeline)?;
    let quotes = tidy(&table)?;
    Ok((table, report, quotes))
}

/// 옵션 체인 분석을 실행합니다.
///
/// 이전 체인이 주어지면 같은 규칙으로 정규화하며, 스키마 에러는 현재
/// 체인과 마찬가지로 실행을 중단시킵니다.
pub fn run_chain(
    raw: RawTable,
    previous: Option<RawTable>,
    config: &AppConfig,
) -> PipelineResult<ChainReport> {
    let (table, coercion, quotes) = load_quotes(raw, config)?;
    let previous_quotes = match previous {
        Some(prev) => {
            let (_, prev_report, prev_quotes) = load_quotes(prev, config)?;
            debug!(rows = prev_report.rows_out(), "Previous chain loaded");
            Some(prev_quotes)
        }
        None => None,
    };

    let span = chainlens_core::pipeline_span!("signals", Variant::Chain, quotes.len());
    let _guard = span.enter();

    let atm = atm_strike(&quotes);
    let pain = max_pain(&quotes);
    let bias = directional_bias(&quotes);
    let (mean_change, iv_signal) = match previous_quotes.as_deref() {
        Some(prev) => (mean_iv_change(&quotes, prev), iv_change_signal(&quotes, Some(prev))),
        None => (
            SignalValue::not_available("no previous chain provided"),
            iv_change_signal(&quotes, None),
        ),
    };

    let (recommendations, window) = match atm.value() {
        Some(atm) => (
            recommend_strikes(&quotes, *atm, &config.chain),
            strike_window(&quotes, *atm, config.chain.strike_window),
        ),
        None => (Vec::new(), Vec::new()),
    };
    let safe = safe_strikes(&quotes, &config.chain);

    let mut signals = SignalReport::new();
    signals.insert("atm_strike", &atm);
    signals.insert("max_pain", &pain);
    signals.insert("directional_bias", &bias);
    signals.insert("mean_iv_change", &mean_change);
    signals.insert("iv_signal", &iv_signal);

    info!(
        strikes = table.len(),
        atm = %atm,
        recommendations = recommendations.len(),
        "Option chain analysed"
    );

    Ok(ChainReport {
        coercion,
        quote_count: quotes.len(),
        atm_strike: atm,
        max_pain: pain,
        directional_bias: bias,
        mean_iv_change: mean_change,
        iv_signal,
        recommendations,
        safe_strikes: safe,
        window,
        signals,
        table,
    })
}

/// 옵션 체인 정리.
///
/// 필수 컬럼 검사 없이 헤더를 정규화하고, 존재하는 숫자 컬럼의 빈 값이나
/// 잘못된 값을 0으로 채웁니다.
pub fn clean_chain(raw: RawTable, config: &AppConfig) -> PipelineResult<(Table, CoercionReport)> {
    let span = chainlens_core::pipeline_span!("clean", Variant::Chain, raw.len());
    let _guard = span.enter();

    let renamed = ColumnNormalizer::new(Variant::Chain).rename(raw);
    let coercer = TypeCoercer::new(coercion_plan(Variant::Chain, &config.pipeline));
    let (table, report) = coercer.coerce(&renamed)?;
    info!(
        rows = table.len(),
        zero_filled = report.total_zero_filled(),
        "Option chain cleaned"
    );
    Ok((table, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainlens_core::field::{CALL_LTP, STRIKE};
    use chainlens_core::{Cell, PipelineError};
    use rust_decimal_macros::dec;

    const HEADERS: [&str; 21] = [
        "STRIKE",
        "CALLS OI",
        "CALLS CHNG IN OI",
        "CALLS VOLUME",
        "CALLS IV",
        "CALLS LTP",
        "CALLS CHNG",
        "CALLS BID QTY",
        "CALLS BID",
        "CALLS ASK",
        "CALLS ASK QTY",
        "PUTS OI",
        "PUTS CHNG IN OI",
        "PUTS VOLUME",
        "PUTS IV",
        "PUTS LTP",
        "PUTS CHNG",
        "PUTS BID QTY",
        "PUTS BID",
        "PUTS ASK",
        "PUTS ASK QTY",
    ];

    /// (행사가, CALL OI, CALL IV, CALL LTP, PUT OI, PUT IV, PUT LTP)
    fn raw(rows: &[(&str, &str, &str, &str, &str, &str, &str)]) -> RawTable {
        let records = rows
            .iter()
            .map(|(strike, c_oi, c_iv, c_ltp, p_oi, p_iv, p_ltp)| {
                let call = [*c_oi, "10", "100", *c_iv, *c_ltp, "0", "1", "0", "0", "1"];
                let put = [*p_oi, "5", "100", *p_iv, *p_ltp, "0", "1", "0", "0", "1"];
                std::iter::once(*strike)
                    .chain(call)
                    .chain(put)
                    .map(str::to_string)
                    .collect()
            })
            .collect();
        RawTable::new(HEADERS.iter().map(|s| s.to_string()).collect(), records)
    }

    fn sample() -> RawTable {
        raw(&[
            ("100", "1,000", "20", "10", "500", "22", "2"),
            ("105", "2000", "18", "6", "1500", "19", "5"),
            ("110", "300", "17", "2", "100", "21", "9"),
        ])
    }

    #[test]
    fn test_run_chain_signals() {
        let report = run_chain(sample(), None, &AppConfig::default()).unwrap();
        assert_eq!(report.quote_count, 6);
        assert_eq!(report.atm_strike, SignalValue::Available(dec!(105)));
        assert_eq!(report.max_pain.value().map(|m| m.strike), Some(dec!(105)));
        // CALL OI 변화 합계(30) > PUT(15)
        assert_eq!(report.directional_bias, SignalValue::Available(DirectionalBias::Bearish));
        assert!(matches!(report.iv_signal, SignalValue::NotAvailable(_)));
        assert_eq!(report.window.len(), 6);
        assert!(report.signals.get("atm_strike").is_some_and(SignalValue::is_available));
    }

    #[test]
    fn test_run_chain_with_previous() {
        let previous = raw(&[
            ("100", "900", "25", "11", "400", "26", "2"),
            ("105", "1800", "22", "7", "1400", "23", "4"),
        ]);
        let report = run_chain(sample(), Some(previous), &AppConfig::default()).unwrap();
        // 매칭된 4개 호가의 IV 변화: -5, -4, -4, -4
        assert_eq!(report.mean_iv_change, SignalValue::Available(dec!(-4.25)));
        assert_eq!(report.iv_signal, SignalValue::Available(IvSignal::IvCrush));
    }

    #[test]
    fn test_run_chain_previous_schema_error_is_fatal() {
        let previous = RawTable::new(vec!["STRIKE".to_string()], vec![vec!["100".to_string()]]);
        let err = run_chain(sample(), Some(previous), &AppConfig::default()).unwrap_err();
        assert!(err.is_schema());
        assert_eq!(err.missing_fields().map(<[String]>::len), Some(20));
    }

    #[test]
    fn test_run_chain_missing_columns() {
        let raw = RawTable::new(vec!["STRIKE".to_string(), "CALLS LTP".to_string()], Vec::new());
        let err = run_chain(raw, None, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[test]
    fn test_clean_chain_zero_fills_present_columns() {
        let raw = RawTable::new(
            vec!["Strike".to_string(), "calls ltp".to_string(), "Note".to_string()],
            vec![
                vec!["100".to_string(), "-".to_string(), "x".to_string()],
                vec!["105".to_string(), "4.5".to_string(), "".to_string()],
            ],
        );
        let (table, report) = clean_chain(raw, &AppConfig::default()).unwrap();
        assert_eq!(table.columns(), &[STRIKE, CALL_LTP, "NOTE"]);
        assert_eq!(table.rows()[0][1], Cell::Number(Decimal::ZERO));
        assert_eq!(table.rows()[1][2], Cell::text(""));
        assert_eq!(report.total_zero_filled(), 1);
    }
}
