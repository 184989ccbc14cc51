use serde::{Deserialize, Serialize};

/// 超短均线 (MA3) 与短期均线比较
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaFastSignal {
    FastGoldenCross,
    FastDeathCross,
    Neutral,
}

impl MaFastSignal {
    pub fn label(&self) -> &'static str {
        match self {
            MaFastSignal::FastGoldenCross => "快速金叉",
            MaFastSignal::FastDeathCross => "快速死叉",
            MaFastSignal::Neutral => "中性",
        }
    }
}

/// 短期均线与中期均线比较
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaSignal {
    GoldenCross,
    DeathCross,
    Neutral,
}

impl MaSignal {
    pub fn label(&self) -> &'static str {
        match self {
            MaSignal::GoldenCross => "金叉",
            MaSignal::DeathCross => "死叉",
            MaSignal::Neutral => "中性",
        }
    }
}

/// MACD 线与信号线比较
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacdSignal {
    Bullish,
    Bearish,
    Neutral,
}

impl MacdSignal {
    pub fn label(&self) -> &'static str {
        match self {
            MacdSignal::Bullish => "看涨",
            MacdSignal::Bearish => "看跌",
            MacdSignal::Neutral => "中性",
        }
    }
}

/// MACD 零轴穿越
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacdZeroCross {
    CrossUp,
    CrossDown,
}

impl MacdZeroCross {
    pub fn label(&self) -> &'static str {
        match self {
            MacdZeroCross::CrossUp => "零轴上穿",
            MacdZeroCross::CrossDown => "零轴下穿",
        }
    }
}

/// RSI 分档
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiSignal {
    ExtremeOverbought,
    ExtremeOversold,
    StrongSell,
    StrongBuy,
    BullishZone,
    BearishZone,
    Neutral,
}

impl RsiSignal {
    pub fn label(&self) -> &'static str {
        match self {
            RsiSignal::ExtremeOverbought => "极度超买",
            RsiSignal::ExtremeOversold => "极度超卖",
            RsiSignal::StrongSell => "强卖出",
            RsiSignal::StrongBuy => "强买入",
            RsiSignal::BullishZone => "看涨区域",
            RsiSignal::BearishZone => "看跌区域",
            RsiSignal::Neutral => "中性",
        }
    }
}

/// 价格相对布林带的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BbSignal {
    // 挤压后突破上轨
    SqueezeBreakoutUpper,
    // 挤压后突破下轨
    SqueezeBreakoutLower,
    BreakoutUpper,
    BreakoutLower,
    UpperZone,
    LowerZone,
    NearMiddle,
}

impl BbSignal {
    pub fn label(&self) -> &'static str {
        match self {
            BbSignal::SqueezeBreakoutUpper => "强力突破上轨",
            BbSignal::SqueezeBreakoutLower => "强力突破下轨",
            BbSignal::BreakoutUpper => "突破上轨",
            BbSignal::BreakoutLower => "突破下轨",
            BbSignal::UpperZone => "强势上轨区域",
            BbSignal::LowerZone => "弱势下轨区域",
            BbSignal::NearMiddle => "中轨附近",
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(
            self,
            BbSignal::SqueezeBreakoutUpper | BbSignal::BreakoutUpper | BbSignal::UpperZone
        )
    }

    pub fn is_bearish(&self) -> bool {
        matches!(
            self,
            BbSignal::SqueezeBreakoutLower | BbSignal::BreakoutLower | BbSignal::LowerZone
        )
    }
}

/// 放量突破布林带
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BbBreakoutStrength {
    VolumeBreakoutUpper,
    VolumeBreakoutLower,
}

impl BbBreakoutStrength {
    pub fn label(&self) -> &'static str {
        match self {
            BbBreakoutStrength::VolumeBreakoutUpper => "带量突破上轨",
            BbBreakoutStrength::VolumeBreakoutLower => "带量突破下轨",
        }
    }
}

/// 随机指标 K/D 关系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StochSignal {
    OverboughtCross,
    OversoldCross,
    BullishCross,
    BearishCross,
    Neutral,
}

impl StochSignal {
    pub fn label(&self) -> &'static str {
        match self {
            StochSignal::OverboughtCross => "超买交叉",
            StochSignal::OversoldCross => "超卖交叉",
            StochSignal::BullishCross => "看涨交叉",
            StochSignal::BearishCross => "看跌交叉",
            StochSignal::Neutral => "中性",
        }
    }
}

/// 斐波那契价格位置所处的关键区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FibKeyZone {
    // [0.35, 0.40]
    KeySupport,
    // [0.58, 0.62]
    Reversal,
    // [0.75, 0.80]
    Strong,
}

impl FibKeyZone {
    pub fn label(&self) -> &'static str {
        match self {
            FibKeyZone::KeySupport => "关键支撑区",
            FibKeyZone::Reversal => "反转区",
            FibKeyZone::Strong => "强势区",
        }
    }
}

/// # Summary
/// 综合信号，变体按强度从高到低排列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompositeSignal {
    ExplosiveBullish,
    ExplosiveBearish,
    SuperBullish,
    SuperBearish,
    ExtremeBullish,
    ExtremeBearish,
    StrongBullish,
    StrongBearish,
    Bullish,
    Bearish,
    // 仅均线金叉
    LeaningBullish,
    // 仅均线死叉
    LeaningBearish,
    Neutral,
}

impl CompositeSignal {
    pub fn label(&self) -> &'static str {
        match self {
            CompositeSignal::ExplosiveBullish => "🔥超强看涨",
            CompositeSignal::ExplosiveBearish => "🔥超强看跌",
            CompositeSignal::SuperBullish => "超强看涨",
            CompositeSignal::SuperBearish => "超强看跌",
            CompositeSignal::ExtremeBullish => "极强看涨",
            CompositeSignal::ExtremeBearish => "极强看跌",
            CompositeSignal::StrongBullish => "强烈看涨",
            CompositeSignal::StrongBearish => "强烈看跌",
            CompositeSignal::Bullish => "看涨",
            CompositeSignal::Bearish => "看跌",
            CompositeSignal::LeaningBullish => "偏多",
            CompositeSignal::LeaningBearish => "偏空",
            CompositeSignal::Neutral => "中性",
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(
            self,
            CompositeSignal::ExplosiveBullish
                | CompositeSignal::SuperBullish
                | CompositeSignal::ExtremeBullish
                | CompositeSignal::StrongBullish
                | CompositeSignal::Bullish
                | CompositeSignal::LeaningBullish
        )
    }

    pub fn is_bearish(&self) -> bool {
        matches!(
            self,
            CompositeSignal::ExplosiveBearish
                | CompositeSignal::SuperBearish
                | CompositeSignal::ExtremeBearish
                | CompositeSignal::StrongBearish
                | CompositeSignal::Bearish
                | CompositeSignal::LeaningBearish
        )
    }
}

/// # Summary
/// 单根 K 线上的全部分项信号与综合信号。
///
/// # Invariants
/// - 分项信号为 None 表示其输入指标未定义。
/// - `composite` 总是有值，缺省为 `Neutral`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalSet {
    pub ma_fast: Option<MaFastSignal>,
    pub ma: Option<MaSignal>,
    pub macd: Option<MacdSignal>,
    pub macd_zero_cross: Option<MacdZeroCross>,
    pub rsi: Option<RsiSignal>,
    pub bb: Option<BbSignal>,
    pub bb_breakout: Option<BbBreakoutStrength>,
    pub stoch: Option<StochSignal>,
    pub fib_key_zone: Option<FibKeyZone>,
    pub composite: CompositeSignal,
}

impl Default for SignalSet {
    fn default() -> Self {
        Self {
            ma_fast: None,
            ma: None,
            macd: None,
            macd_zero_cross: None,
            rsi: None,
            bb: None,
            bb_breakout: None,
            stoch: None,
            fib_key_zone: None,
            composite: CompositeSignal::Neutral,
        }
    }
}
