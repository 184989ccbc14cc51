use crate::snapshot::BarSnapshot;
use klinesight_core::config::SignalThresholds;
use klinesight_core::signal::entity::{
    BbBreakoutStrength, BbSignal, FibKeyZone, MaFastSignal, MaSignal, MacdSignal, MacdZeroCross,
    RsiSignal, StochSignal,
};
use std::cmp::Ordering;

fn compare(a: Option<f64>, b: Option<f64>) -> Option<Ordering> {
    a?.partial_cmp(&b?)
}

/// MA3 与短期均线比较
pub fn ma_fast(s: &BarSnapshot) -> Option<MaFastSignal> {
    Some(match compare(s.ma_fast, s.ma_short)? {
        Ordering::Greater => MaFastSignal::FastGoldenCross,
        Ordering::Less => MaFastSignal::FastDeathCross,
        Ordering::Equal => MaFastSignal::Neutral,
    })
}

/// 短期均线与中期均线比较
pub fn ma(s: &BarSnapshot) -> Option<MaSignal> {
    Some(match compare(s.ma_short, s.ma_medium)? {
        Ordering::Greater => MaSignal::GoldenCross,
        Ordering::Less => MaSignal::DeathCross,
        Ordering::Equal => MaSignal::Neutral,
    })
}

// MACD 与信号线差值在该相对误差内视为重合
const MACD_EPSILON: f64 = 1e-9;

/// MACD 线与信号线比较，浮点噪声内的差值视为中性
pub fn macd(s: &BarSnapshot) -> Option<MacdSignal> {
    let (line, signal) = (s.macd?, s.macd_signal?);
    let diff = line - signal;
    if diff.is_nan() {
        return None;
    }
    Some(if diff.abs() <= MACD_EPSILON * signal.abs().max(1.0) {
        MacdSignal::Neutral
    } else if diff > 0.0 {
        MacdSignal::Bullish
    } else {
        MacdSignal::Bearish
    })
}

/// MACD 由非正转正为上穿，由非负转负为下穿
pub fn macd_zero_cross(s: &BarSnapshot) -> Option<MacdZeroCross> {
    let (cur, prev) = (s.macd?, s.macd_prev?);
    if cur > 0.0 && prev <= 0.0 {
        Some(MacdZeroCross::CrossUp)
    } else if cur < 0.0 && prev >= 0.0 {
        Some(MacdZeroCross::CrossDown)
    } else {
        None
    }
}

/// # Summary
/// RSI 分档，按顺序判断，先命中者优先。
///
/// # Logic
/// 1. ≥ 极度超买阈值：极度超买；≤ 极度超卖阈值：极度超卖。
/// 2. [强卖出, 极度超买)：强卖出；(极度超卖, 强买入]：强买入。
/// 3. (50, 强卖出)：看涨区域；(强买入, 50)：看跌区域。
/// 4. 其余（恰为 50）：中性。
pub fn rsi(s: &BarSnapshot, t: &SignalThresholds) -> Option<RsiSignal> {
    let v = s.rsi?;
    Some(if v >= t.rsi_extreme_overbought {
        RsiSignal::ExtremeOverbought
    } else if v <= t.rsi_extreme_oversold {
        RsiSignal::ExtremeOversold
    } else if v >= t.rsi_strong_sell {
        RsiSignal::StrongSell
    } else if v <= t.rsi_strong_buy {
        RsiSignal::StrongBuy
    } else if v > 50.0 {
        RsiSignal::BullishZone
    } else if v < 50.0 {
        RsiSignal::BearishZone
    } else {
        RsiSignal::Neutral
    })
}

/// # Summary
/// 价格相对布林带的位置。
///
/// # Logic
/// 1. 收盘价越过上/下轨且处于挤压状态：强力突破。
/// 2. 仅越过上/下轨：普通突破。
/// 3. 高于中轨 0.5% 且不高于上轨：强势上轨区域；低于中轨 0.5% 且不低于下轨：弱势下轨区域。
/// 4. 其余：中轨附近。挤压标记缺失按未挤压处理。
pub fn bb(s: &BarSnapshot) -> Option<BbSignal> {
    let (upper, middle, lower) = (s.bb_upper?, s.bb_middle?, s.bb_lower?);
    let close = s.close;
    let squeezed = s.bb_squeeze.unwrap_or(false);
    Some(if close > upper && squeezed {
        BbSignal::SqueezeBreakoutUpper
    } else if close < lower && squeezed {
        BbSignal::SqueezeBreakoutLower
    } else if close > upper {
        BbSignal::BreakoutUpper
    } else if close < lower {
        BbSignal::BreakoutLower
    } else if close > middle * 1.005 {
        BbSignal::UpperZone
    } else if close < middle * 0.995 {
        BbSignal::LowerZone
    } else {
        BbSignal::NearMiddle
    })
}

/// 放量突破布林带：量比超过阈值且收盘价越过上/下轨
pub fn bb_breakout(s: &BarSnapshot, t: &SignalThresholds) -> Option<BbBreakoutStrength> {
    let (upper, lower, ratio) = (s.bb_upper?, s.bb_lower?, s.volume_ratio?);
    if ratio <= t.volume_surge_ratio {
        return None;
    }
    if s.close > upper {
        Some(BbBreakoutStrength::VolumeBreakoutUpper)
    } else if s.close < lower {
        Some(BbBreakoutStrength::VolumeBreakoutLower)
    } else {
        None
    }
}

pub fn stoch(s: &BarSnapshot) -> Option<StochSignal> {
    let (k, d) = (s.stoch_k?, s.stoch_d?);
    Some(if k > 80.0 && d > 80.0 {
        StochSignal::OverboughtCross
    } else if k < 20.0 && d < 20.0 {
        StochSignal::OversoldCross
    } else if k > d {
        StochSignal::BullishCross
    } else if k < d {
        StochSignal::BearishCross
    } else {
        StochSignal::Neutral
    })
}

pub fn fib_key_zone(s: &BarSnapshot) -> Option<FibKeyZone> {
    let p = s.fib_position?;
    if (0.35..=0.40).contains(&p) {
        Some(FibKeyZone::KeySupport)
    } else if (0.58..=0.62).contains(&p) {
        Some(FibKeyZone::Reversal)
    } else if (0.75..=0.80).contains(&p) {
        Some(FibKeyZone::Strong)
    } else {
        None
    }
}
