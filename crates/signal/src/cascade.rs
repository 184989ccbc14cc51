use crate::snapshot::BarSnapshot;
use klinesight_core::signal::entity::{
    CompositeSignal, FibKeyZone, MaFastSignal, MaSignal, MacdSignal, MacdZeroCross, RsiSignal,
    SignalSet,
};

/// # Summary
/// 有序规则：一个标签加一个谓词。
pub struct Rule<C, L> {
    pub label: L,
    pub predicate: fn(&C) -> bool,
}

/// # Summary
/// 自上而下求值规则列表，返回第一条命中规则的标签。
///
/// # Returns
/// 无规则命中时返回 None，由调用方决定缺省值。
pub fn first_match<C, L: Copy>(rules: &[Rule<C, L>], ctx: &C) -> Option<L> {
    rules.iter().find(|r| (r.predicate)(ctx)).map(|r| r.label)
}

/// 综合信号规则的求值上下文
#[derive(Debug, Clone, Copy)]
pub struct CascadeInput {
    pub signals: SignalSet,
    pub snapshot: BarSnapshot,
    // 放量阈值
    pub volume_surge_ratio: f64,
    // 是否配置了长期 RSI；未配置时长期 RSI 条件视为满足
    pub long_rsi_configured: bool,
}

fn ma_is(c: &CascadeInput, v: MaSignal) -> bool {
    c.signals.ma == Some(v)
}

fn macd_is(c: &CascadeInput, v: MacdSignal) -> bool {
    c.signals.macd == Some(v)
}

fn rsi_bullish(c: &CascadeInput) -> bool {
    matches!(c.signals.rsi, Some(RsiSignal::StrongBuy | RsiSignal::BullishZone))
}

fn rsi_bearish(c: &CascadeInput) -> bool {
    matches!(c.signals.rsi, Some(RsiSignal::StrongSell | RsiSignal::BearishZone))
}

fn bb_bullish(c: &CascadeInput) -> bool {
    c.signals.bb.is_some_and(|b| b.is_bullish())
}

fn bb_bearish(c: &CascadeInput) -> bool {
    c.signals.bb.is_some_and(|b| b.is_bearish())
}

fn volume_surge(c: &CascadeInput) -> bool {
    c.snapshot
        .volume_ratio
        .is_some_and(|r| r > c.volume_surge_ratio)
}

fn long_rsi_below(c: &CascadeInput, limit: f64) -> bool {
    !c.long_rsi_configured || c.snapshot.rsi_long.is_some_and(|v| v < limit)
}

fn long_rsi_above(c: &CascadeInput, limit: f64) -> bool {
    !c.long_rsi_configured || c.snapshot.rsi_long.is_some_and(|v| v > limit)
}

fn extreme_bullish(c: &CascadeInput) -> bool {
    strong_bullish(c) && bb_bullish(c)
}

fn extreme_bearish(c: &CascadeInput) -> bool {
    strong_bearish(c) && bb_bearish(c)
}

fn strong_bullish(c: &CascadeInput) -> bool {
    plain_bullish(c) && rsi_bullish(c)
}

fn strong_bearish(c: &CascadeInput) -> bool {
    plain_bearish(c) && rsi_bearish(c)
}

fn plain_bullish(c: &CascadeInput) -> bool {
    ma_is(c, MaSignal::GoldenCross) && macd_is(c, MacdSignal::Bullish)
}

fn plain_bearish(c: &CascadeInput) -> bool {
    ma_is(c, MaSignal::DeathCross) && macd_is(c, MacdSignal::Bearish)
}

fn ma_only_bullish(c: &CascadeInput) -> bool {
    ma_is(c, MaSignal::GoldenCross)
}

fn ma_only_bearish(c: &CascadeInput) -> bool {
    ma_is(c, MaSignal::DeathCross)
}

/// # Summary
/// 标准规则链：极强 → 强烈 → 普通 → 单一均线信号，多空交替，强度递减。
pub fn standard_rules() -> Vec<Rule<CascadeInput, CompositeSignal>> {
    vec![
        Rule { label: CompositeSignal::ExtremeBullish, predicate: extreme_bullish },
        Rule { label: CompositeSignal::ExtremeBearish, predicate: extreme_bearish },
        Rule { label: CompositeSignal::StrongBullish, predicate: strong_bullish },
        Rule { label: CompositeSignal::StrongBearish, predicate: strong_bearish },
        Rule { label: CompositeSignal::Bullish, predicate: plain_bullish },
        Rule { label: CompositeSignal::Bearish, predicate: plain_bearish },
        Rule { label: CompositeSignal::LeaningBullish, predicate: ma_only_bullish },
        Rule { label: CompositeSignal::LeaningBearish, predicate: ma_only_bearish },
    ]
}

/// # Summary
/// 扩展规则链，用于配置了长周期指标的档位。
///
/// # Logic
/// 1. 爆发：快速金叉 + 零轴上穿 + 放量 + 关键支撑区（空头镜像为快速死叉 + 零轴下穿 + 放量 + 强势区）。
/// 2. 超强：极强条件 + 长期 RSI 未超买 (< 70) / 未超卖 (> 30)。
/// 3. 之后接标准规则链。
pub fn extended_rules() -> Vec<Rule<CascadeInput, CompositeSignal>> {
    let mut rules = vec![
        Rule { label: CompositeSignal::ExplosiveBullish, predicate: explosive_bullish },
        Rule { label: CompositeSignal::ExplosiveBearish, predicate: explosive_bearish },
        Rule { label: CompositeSignal::SuperBullish, predicate: super_bullish },
        Rule { label: CompositeSignal::SuperBearish, predicate: super_bearish },
    ];
    rules.extend(standard_rules());
    rules
}

fn explosive_bullish(c: &CascadeInput) -> bool {
    c.signals.ma_fast == Some(MaFastSignal::FastGoldenCross)
        && c.signals.macd_zero_cross == Some(MacdZeroCross::CrossUp)
        && volume_surge(c)
        && c.signals.fib_key_zone == Some(FibKeyZone::KeySupport)
}

fn explosive_bearish(c: &CascadeInput) -> bool {
    c.signals.ma_fast == Some(MaFastSignal::FastDeathCross)
        && c.signals.macd_zero_cross == Some(MacdZeroCross::CrossDown)
        && volume_surge(c)
        && c.signals.fib_key_zone == Some(FibKeyZone::Strong)
}

fn super_bullish(c: &CascadeInput) -> bool {
    extreme_bullish(c) && long_rsi_below(c, 70.0)
}

fn super_bearish(c: &CascadeInput) -> bool {
    extreme_bearish(c) && long_rsi_above(c, 30.0)
}
