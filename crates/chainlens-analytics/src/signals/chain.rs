//! 옵션 체인 시그널.
//!
//! wide 형식 체인을 `ChainQuote` 목록으로 펼친 뒤 ATM, Max Pain, 방향성,
//! IV 변화, 행사가 추천을 계산합니다. 동률은 모두 낮은 행사가가 우선합니다.

use chainlens_core::field::*;
use chainlens_core::{ChainConfig, ChainQuote, OptionSide, PipelineResult, SignalValue, Table};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// 평균 IV 변화가 이 값보다 작으면 IV 급락.
pub const IV_CRUSH_THRESHOLD: Decimal = dec!(-1);
/// 평균 IV 변화가 이 값보다 크면 IV 상승.
pub const RISING_IV_THRESHOLD: Decimal = dec!(1);

/// wide 형식 체인을 long 형식으로 펼칩니다.
///
/// CALL 쪽 행이 원본 순서대로 먼저 오고, PUT 쪽 행이 뒤따릅니다.
pub fn tidy(table: &Table) -> PipelineResult<Vec<ChainQuote>> {
    let strikes = table.decimal_column(STRIKE)?;
    let mut quotes = Vec::with_capacity(strikes.len() * 2);

    for (side, [oi, oi_change, volume, iv, ltp]) in [
        (OptionSide::Call, [CALL_OI, CALL_OI_CHANGE, CALL_VOLUME, CALL_IV, CALL_LTP]),
        (OptionSide::Put, [PUT_OI, PUT_OI_CHANGE, PUT_VOLUME, PUT_IV, PUT_LTP]),
    ] {
        let oi = table.decimal_column(oi)?;
        let oi_change = table.decimal_column(oi_change)?;
        let volume = table.decimal_column(volume)?;
        let iv = table.decimal_column(iv)?;
        let ltp = table.decimal_column(ltp)?;
        for i in 0..strikes.len() {
            quotes.push(ChainQuote {
                strike: strikes[i],
                side,
                open_interest: oi[i],
                oi_change: oi_change[i],
                volume: volume[i],
                iv: iv[i],
                ltp: ltp[i],
            });
        }
    }
    Ok(quotes)
}

/// ATM 행사가.
///
/// CALL과 PUT이 모두 있는 행사가 중 `|call_ltp - put_ltp|`가 가장 작은 행사가.
/// 같은 행사가/방향이 여러 번 나오면 첫 번째 값을 사용합니다.
pub fn atm_strike(quotes: &[ChainQuote]) -> SignalValue<Decimal> {
    let mut pairs: BTreeMap<Decimal, (Option<Decimal>, Option<Decimal>)> = BTreeMap::new();
    for q in quotes {
        let entry = pairs.entry(q.strike).or_default();
        let slot = match q.side {
            OptionSide::Call => &mut entry.0,
            OptionSide::Put => &mut entry.1,
        };
        slot.get_or_insert(q.ltp);
    }

    let mut best: Option<(Decimal, Decimal)> = None;
    for (strike, pair) in &pairs {
        let (Some(call), Some(put)) = pair else {
            continue;
        };
        let diff = (*call - *put).abs();
        if best.map_or(true, |(_, d)| diff < d) {
            best = Some((*strike, diff));
        }
    }

    match best {
        Some((strike, _)) => SignalValue::Available(strike),
        None => SignalValue::insufficient(1, 0),
    }
}

/// Max Pain 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaxPain {
    pub strike: Decimal,
    /// 해당 행사가의 CALL + PUT 미결제약정 합계
    pub total_open_interest: Decimal,
}

impl fmt::Display for MaxPain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (OI {})", self.strike, self.total_open_interest)
    }
}

/// 행사가별 미결제약정 합계 (행사가 오름차순).
pub fn open_interest_by_strike(quotes: &[ChainQuote]) -> BTreeMap<Decimal, Decimal> {
    let mut totals: BTreeMap<Decimal, Decimal> = BTreeMap::new();
    for q in quotes {
        *totals.entry(q.strike).or_default() += q.open_interest;
    }
    totals
}

/// Max Pain 행사가 (미결제약정 합계 최대).
pub fn max_pain(quotes: &[ChainQuote]) -> SignalValue<MaxPain> {
    let mut best: Option<MaxPain> = None;
    for (strike, total) in open_interest_by_strike(quotes) {
        if best.map_or(true, |b| total > b.total_open_interest) {
            best = Some(MaxPain {
                strike,
                total_open_interest: total,
            });
        }
    }
    match best {
        Some(mp) => SignalValue::Available(mp),
        None => SignalValue::insufficient(1, 0),
    }
}

/// 미결제약정 변화 기반 방향성.
///
/// CALL 쪽 증가가 크면 약세, PUT 쪽 증가가 크면 강세로 보는 경험칙입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DirectionalBias {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for DirectionalBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DirectionalBias::Bullish => "Bullish (put OI buildup > call)",
            DirectionalBias::Bearish => "Bearish (call OI buildup > put)",
            DirectionalBias::Neutral => "Neutral (OI buildup balanced)",
        };
        f.write_str(s)
    }
}

/// 방향성 판단.
pub fn directional_bias(quotes: &[ChainQuote]) -> SignalValue<DirectionalBias> {
    if quotes.is_empty() {
        return SignalValue::insufficient(1, 0);
    }
    let side_total = |side: OptionSide| -> Decimal {
        quotes
            .iter()
            .filter(|q| q.side == side)
            .map(|q| q.oi_change)
            .sum()
    };
    let calls = side_total(OptionSide::Call);
    let puts = side_total(OptionSide::Put);

    let bias = if calls > puts {
        DirectionalBias::Bearish
    } else if puts > calls {
        DirectionalBias::Bullish
    } else {
        DirectionalBias::Neutral
    };
    SignalValue::Available(bias)
}

/// IV 변화 시그널.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IvSignal {
    /// IV 급락 (프리미엄 매도 우위)
    IvCrush,
    /// IV 상승 (프리미엄 매수 우위)
    RisingIv,
    Stable,
}

impl fmt::Display for IvSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IvSignal::IvCrush => "IV crush",
            IvSignal::RisingIv => "Rising IV",
            IvSignal::Stable => "Stable",
        };
        f.write_str(s)
    }
}

impl IvSignal {
    pub fn from_mean_change(mean: Decimal) -> Self {
        if mean < IV_CRUSH_THRESHOLD {
            IvSignal::IvCrush
        } else if mean > RISING_IV_THRESHOLD {
            IvSignal::RisingIv
        } else {
            IvSignal::Stable
        }
    }
}

fn first_by_key(quotes: &[ChainQuote]) -> Vec<((Decimal, OptionSide), Decimal)> {
    let mut seen: HashSet<(Decimal, OptionSide)> = HashSet::new();
    quotes
        .iter()
        .filter(|q| seen.insert((q.strike, q.side)))
        .map(|q| ((q.strike, q.side), q.iv))
        .collect()
}

/// (행사가, 방향)으로 매칭한 평균 IV 변화.
pub fn mean_iv_change(current: &[ChainQuote], previous: &[ChainQuote]) -> SignalValue<Decimal> {
    let prev: HashMap<(Decimal, OptionSide), Decimal> = first_by_key(previous).into_iter().collect();
    let deltas: Vec<Decimal> = first_by_key(current)
        .into_iter()
        .filter_map(|(key, iv)| prev.get(&key).map(|p| iv - *p))
        .collect();

    if deltas.is_empty() {
        return SignalValue::insufficient(1, 0);
    }
    let mean = deltas.iter().sum::<Decimal>() / Decimal::from(deltas.len());
    SignalValue::Available(mean)
}

/// IV 변화 시그널. 이전 체인이 없으면 `NotAvailable`.
pub fn iv_change_signal(
    current: &[ChainQuote],
    previous: Option<&[ChainQuote]>,
) -> SignalValue<IvSignal> {
    match previous {
        None => SignalValue::not_available("no previous chain provided"),
        Some(prev) => mean_iv_change(current, prev).map(IvSignal::from_mean_change),
    }
}

/// 경험적 델타 추정치.
pub fn estimate_delta(quote: &ChainQuote) -> Decimal {
    if quote.open_interest > dec!(5000) && quote.volume < dec!(1000) {
        dec!(0.1)
    } else if quote.volume > dec!(3000) && quote.open_interest < dec!(3000) {
        dec!(0.7)
    } else {
        dec!(0.4)
    }
}

/// 중앙값 (짝수 개면 가운데 두 값의 평균).
pub fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / Decimal::TWO)
    } else {
        Some(sorted[mid])
    }
}

/// 목표 수익을 위한 로트 수. 프리미엄이 0 이하면 `None`.
pub fn lots_for_target(premium: Decimal, target: Decimal, lot_size: u32) -> Option<u64> {
    if premium <= Decimal::ZERO || lot_size == 0 {
        return None;
    }
    (target / (premium * Decimal::from(lot_size))).ceil().to_u64()
}

/// ATM ± `window` 범위의 호가.
pub fn strike_window(quotes: &[ChainQuote], atm: Decimal, window: Decimal) -> Vec<ChainQuote> {
    quotes
        .iter()
        .filter(|q| (q.strike - atm).abs() <= window)
        .cloned()
        .collect()
}

/// 매매 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Sell,
    Buy,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TradeAction::Sell => "SELL",
            TradeAction::Buy => "BUY",
        })
    }
}

/// 행사가 추천.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrikeRecommendation {
    pub strike: Decimal,
    pub side: OptionSide,
    pub action: TradeAction,
    pub premium: Decimal,
    /// 목표 수익 달성에 필요한 로트 수 (프리미엄 0이면 없음)
    pub lots: Option<u64>,
    pub estimated_delta: Decimal,
    pub rationale: &'static str,
}

impl StrikeRecommendation {
    fn from_quote(quote: &ChainQuote, action: TradeAction, config: &ChainConfig) -> Self {
        let rationale = match action {
            TradeAction::Sell => "High OI + High IV + Low Volume",
            TradeAction::Buy => "Low OI + High Volume + Rising IV",
        };
        Self {
            strike: quote.strike,
            side: quote.side,
            action,
            premium: quote.ltp,
            lots: lots_for_target(quote.ltp, config.target_daily_profit, config.lot_size),
            estimated_delta: estimate_delta(quote),
            rationale,
        }
    }
}

/// ATM 주변 행사가 추천 (SELL 후보 먼저, BUY 후보 다음).
///
/// - SELL: OI ≥ 중앙값, IV ≥ 중앙값, 거래량 ≤ 중앙값 → (OI, IV) 내림차순
/// - BUY: OI ≤ 중앙값, 거래량 ≥ 중앙값, IV ≥ 중앙값 → (거래량, IV) 내림차순
pub fn recommend_strikes(
    quotes: &[ChainQuote],
    atm: Decimal,
    config: &ChainConfig,
) -> Vec<StrikeRecommendation> {
    let window = strike_window(quotes, atm, config.strike_window);
    let column = |f: fn(&ChainQuote) -> Decimal| -> Vec<Decimal> { window.iter().map(f).collect() };
    let (Some(med_oi), Some(med_iv), Some(med_vol)) = (
        median(&column(|q| q.open_interest)),
        median(&column(|q| q.iv)),
        median(&column(|q| q.volume)),
    ) else {
        return Vec::new();
    };

    let mut sell: Vec<&ChainQuote> = window
        .iter()
        .filter(|q| q.open_interest >= med_oi && q.iv >= med_iv && q.volume <= med_vol)
        .collect();
    sell.sort_by(|a, b| {
        b.open_interest
            .cmp(&a.open_interest)
            .then_with(|| b.iv.cmp(&a.iv))
    });

    let mut buy: Vec<&ChainQuote> = window
        .iter()
        .filter(|q| q.open_interest <= med_oi && q.volume >= med_vol && q.iv >= med_iv)
        .collect();
    buy.sort_by(|a, b| b.volume.cmp(&a.volume).then_with(|| b.iv.cmp(&a.iv)));

    sell.into_iter()
        .take(config.max_recommendations)
        .map(|q| StrikeRecommendation::from_quote(q, TradeAction::Sell, config))
        .chain(
            buy.into_iter()
                .take(config.max_recommendations)
                .map(|q| StrikeRecommendation::from_quote(q, TradeAction::Buy, config)),
        )
        .collect()
}

/// 매도하기 안전한 행사가.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafeStrikes {
    /// 최소 프리미엄 (목표 수익 / 로트 크기)
    pub premium_threshold: Decimal,
    pub calls: Vec<ChainQuote>,
    pub puts: Vec<ChainQuote>,
}

/// 1 로트로 목표 수익을 낼 수 있는 프리미엄 이상의 행사가를
/// (OI, LTP) 내림차순으로 방향별 상위 `max_recommendations`개 고릅니다.
pub fn safe_strikes(quotes: &[ChainQuote], config: &ChainConfig) -> SafeStrikes {
    let threshold = if config.lot_size == 0 {
        Decimal::ZERO
    } else {
        config.target_daily_profit / Decimal::from(config.lot_size)
    };
    let pick = |side: OptionSide| -> Vec<ChainQuote> {
        let mut picked: Vec<ChainQuote> = quotes
            .iter()
            .filter(|q| q.side == side && q.ltp >= threshold)
            .cloned()
            .collect();
        picked.sort_by(|a, b| {
            b.open_interest
                .cmp(&a.open_interest)
                .then_with(|| b.ltp.cmp(&a.ltp))
        });
        picked.truncate(config.max_recommendations);
        picked
    };

    SafeStrikes {
        premium_threshold: threshold,
        calls: pick(OptionSide::Call),
        puts: pick(OptionSide::Put),
    }
}
