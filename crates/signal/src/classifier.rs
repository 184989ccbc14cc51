use crate::cascade::{CascadeInput, Rule, extended_rules, first_match, standard_rules};
use crate::classify;
use crate::snapshot::BarSnapshot;
use klinesight_core::config::{IndicatorProfile, SignalThresholds};
use klinesight_core::signal::entity::{CompositeSignal, SignalSet};
use tracing::debug;

/// 综合信号使用的规则链
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cascade {
    // 极强 → 强烈 → 普通
    Standard,
    // 爆发 → 超强 → 标准链
    Extended { long_rsi: bool },
}

/// # Summary
/// 信号分类器：把单根 K 线的指标快照映射为分项信号与综合信号。
///
/// # Invariants
/// - 纯函数：相同快照总是得到相同结果。
pub struct SignalClassifier {
    thresholds: SignalThresholds,
    cascade: Cascade,
    rules: Vec<Rule<CascadeInput, CompositeSignal>>,
}

impl SignalClassifier {
    pub fn new(thresholds: SignalThresholds, cascade: Cascade) -> Self {
        let rules = match cascade {
            Cascade::Standard => standard_rules(),
            Cascade::Extended { .. } => extended_rules(),
        };
        Self {
            thresholds,
            cascade,
            rules,
        }
    }

    /// # Summary
    /// 按参数档位选择规则链：配置了长周期指标时使用扩展链。
    pub fn for_profile(thresholds: SignalThresholds, profile: &IndicatorProfile) -> Self {
        let cascade = if profile.has_long_indicators() {
            Cascade::Extended {
                long_rsi: profile.rsi_long.is_some(),
            }
        } else {
            Cascade::Standard
        };
        debug!(?cascade, "Composite cascade selected");
        Self::new(thresholds, cascade)
    }

    pub fn cascade(&self) -> Cascade {
        self.cascade
    }

    /// # Summary
    /// 分类单根 K 线。
    ///
    /// # Logic
    /// 1. 逐项计算分项信号，输入缺失的分项为 None。
    /// 2. 以分项信号与快照为上下文自上而下匹配规则链，未命中为中性。
    pub fn classify(&self, snapshot: &BarSnapshot) -> SignalSet {
        let t = &self.thresholds;
        let mut signals = SignalSet {
            ma_fast: classify::ma_fast(snapshot),
            ma: classify::ma(snapshot),
            macd: classify::macd(snapshot),
            macd_zero_cross: classify::macd_zero_cross(snapshot),
            rsi: classify::rsi(snapshot, t),
            bb: classify::bb(snapshot),
            bb_breakout: classify::bb_breakout(snapshot, t),
            stoch: classify::stoch(snapshot),
            fib_key_zone: classify::fib_key_zone(snapshot),
            composite: CompositeSignal::Neutral,
        };
        let input = CascadeInput {
            signals,
            snapshot: *snapshot,
            volume_surge_ratio: t.volume_surge_ratio,
            long_rsi_configured: matches!(self.cascade, Cascade::Extended { long_rsi: true }),
        };
        signals.composite = first_match(&self.rules, &input).unwrap_or(CompositeSignal::Neutral);
        signals
    }
}
