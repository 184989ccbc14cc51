use klinesight_core::config::{IndicatorProfile, SignalThresholds};
use klinesight_core::common::TimeFrame;
use klinesight_core::signal::entity::{BbSignal, CompositeSignal, MaSignal, MacdSignal, RsiSignal};
use klinesight_signal::classifier::{Cascade, SignalClassifier};
use klinesight_signal::snapshot::BarSnapshot;

// 多头排列：MA 金叉、MACD 看涨、RSI 看涨区域、价格位于强势上轨区域
fn bullish_snapshot() -> BarSnapshot {
    BarSnapshot {
        close: 106.0,
        ma_fast: Some(105.0),
        ma_short: Some(103.0),
        ma_medium: Some(100.0),
        macd: Some(1.2),
        macd_signal: Some(0.8),
        macd_prev: Some(1.0),
        rsi: Some(62.0),
        rsi_long: Some(55.0),
        bb_upper: Some(110.0),
        bb_middle: Some(100.0),
        bb_lower: Some(90.0),
        bb_squeeze: Some(false),
        volume_ratio: Some(1.1),
        stoch_k: Some(70.0),
        stoch_d: Some(65.0),
        fib_position: Some(0.7),
    }
}

// 上述快照关于 100 的镜像
fn bearish_snapshot() -> BarSnapshot {
    BarSnapshot {
        close: 94.0,
        ma_fast: Some(95.0),
        ma_short: Some(97.0),
        ma_medium: Some(100.0),
        macd: Some(-1.2),
        macd_signal: Some(-0.8),
        macd_prev: Some(-1.0),
        rsi: Some(38.0),
        rsi_long: Some(45.0),
        stoch_k: Some(30.0),
        stoch_d: Some(35.0),
        fib_position: Some(0.3),
        ..bullish_snapshot()
    }
}

/// # Summary
/// 标准规则链按强度降级。
#[test]
fn test_standard_cascade_levels() {
    let classifier = SignalClassifier::new(SignalThresholds::default(), Cascade::Standard);

    let s = bullish_snapshot();
    let set = classifier.classify(&s);
    assert_eq!(set.ma, Some(MaSignal::GoldenCross));
    assert_eq!(set.rsi, Some(RsiSignal::BullishZone));
    assert_eq!(set.bb, Some(BbSignal::UpperZone));
    assert_eq!(set.composite, CompositeSignal::ExtremeBullish);

    // 价格回到中轨附近，降为强烈
    let s = BarSnapshot { close: 100.2, ..bullish_snapshot() };
    assert_eq!(classifier.classify(&s).composite, CompositeSignal::StrongBullish);

    // RSI 超买，降为普通看涨
    let s = BarSnapshot { rsi: Some(80.0), ..s };
    assert_eq!(classifier.classify(&s).composite, CompositeSignal::Bullish);

    // MACD 转弱，只剩均线金叉
    let s = BarSnapshot { macd: Some(0.5), ..s };
    assert_eq!(classifier.classify(&s).composite, CompositeSignal::LeaningBullish);

    // 均线持平，无规则命中
    let s = BarSnapshot { ma_short: Some(100.0), ..s };
    assert_eq!(classifier.classify(&s).composite, CompositeSignal::Neutral);

    assert_eq!(classifier.classify(&bearish_snapshot()).composite, CompositeSignal::ExtremeBearish);
}

/// # Summary
/// 分类是确定性的。
#[test]
fn test_classification_is_deterministic() {
    let classifier = SignalClassifier::new(SignalThresholds::default(), Cascade::Standard);
    let s = bullish_snapshot();
    let first = classifier.classify(&s);
    for _ in 0..10 {
        assert_eq!(classifier.classify(&s), first);
    }
}

/// # Summary
/// 指标未定义时分项为空，综合信号为中性。
#[test]
fn test_undefined_inputs_are_neutral() {
    let classifier = SignalClassifier::new(SignalThresholds::default(), Cascade::Standard);
    let set = classifier.classify(&BarSnapshot {
        close: 100.0,
        ..Default::default()
    });
    assert!(set.ma.is_none() && set.macd.is_none() && set.rsi.is_none() && set.bb.is_none());
    assert_eq!(set.composite, CompositeSignal::Neutral);
}

/// # Summary
/// 扩展规则链：爆发信号优先于超强，长期 RSI 过高时超强降级为极强。
#[test]
fn test_extended_cascade() {
    let profile = IndicatorProfile::preset(TimeFrame::Day1);
    let classifier = SignalClassifier::for_profile(SignalThresholds::default(), &profile);
    assert_eq!(classifier.cascade(), Cascade::Extended { long_rsi: true });

    assert_eq!(classifier.classify(&bullish_snapshot()).composite, CompositeSignal::SuperBullish);

    let hot = BarSnapshot { rsi_long: Some(72.0), ..bullish_snapshot() };
    assert_eq!(classifier.classify(&hot).composite, CompositeSignal::ExtremeBullish);

    // 长期 RSI 未定义时不满足超强条件
    let unknown = BarSnapshot { rsi_long: None, ..bullish_snapshot() };
    assert_eq!(classifier.classify(&unknown).composite, CompositeSignal::ExtremeBullish);

    // 快速金叉 + 零轴上穿 + 放量 + 关键支撑区
    let explosive = BarSnapshot {
        macd_prev: Some(-0.1),
        volume_ratio: Some(1.8),
        fib_position: Some(0.37),
        ..bullish_snapshot()
    };
    assert_eq!(classifier.classify(&explosive).composite, CompositeSignal::ExplosiveBullish);

    assert_eq!(classifier.classify(&bearish_snapshot()).composite, CompositeSignal::SuperBearish);
}

/// # Summary
/// 激进阈值改变 RSI 分档。
#[test]
fn test_aggressive_thresholds() {
    let thresholds = SignalThresholds {
        rsi_extreme_overbought: 80.0,
        rsi_extreme_oversold: 20.0,
        ..SignalThresholds::default()
    };
    let classifier = SignalClassifier::new(thresholds, Cascade::Standard);
    let s = BarSnapshot { rsi: Some(77.0), ..bullish_snapshot() };
    assert_eq!(classifier.classify(&s).rsi, Some(RsiSignal::StrongSell));

    let default = SignalClassifier::new(SignalThresholds::default(), Cascade::Standard);
    assert_eq!(default.classify(&s).rsi, Some(RsiSignal::ExtremeOverbought));
}

/// # Summary
/// 只有均线金叉、其余指标不配合时，综合信号为偏多。
#[test]
fn test_golden_cross_alone_leans_bullish() {
    let classifier = SignalClassifier::new(SignalThresholds::default(), Cascade::Standard);
    let s = BarSnapshot {
        macd: Some(0.8),
        macd_signal: Some(0.8),
        rsi: Some(85.0),
        ..bullish_snapshot()
    };
    let set = classifier.classify(&s);
    assert_eq!(set.ma, Some(MaSignal::GoldenCross));
    assert_eq!(set.macd, Some(MacdSignal::Neutral));
    assert_eq!(set.composite, CompositeSignal::LeaningBullish);
    assert!(set.composite.is_bullish());
    assert_eq!(set.composite.label(), "偏多");
}

/// # Summary
/// 只有均线死叉时，综合信号为偏空；扩展规则链同样以其收尾。
#[test]
fn test_death_cross_alone_leans_bearish() {
    let s = BarSnapshot {
        macd: Some(-0.8),
        macd_signal: Some(-0.8),
        rsi: Some(15.0),
        ..bearish_snapshot()
    };
    let standard = SignalClassifier::new(SignalThresholds::default(), Cascade::Standard);
    let set = standard.classify(&s);
    assert_eq!(set.ma, Some(MaSignal::DeathCross));
    assert_eq!(set.composite, CompositeSignal::LeaningBearish);
    assert!(set.composite.is_bearish());

    let extended =
        SignalClassifier::for_profile(SignalThresholds::default(), &IndicatorProfile::preset(TimeFrame::Day1));
    assert_eq!(extended.classify(&s).composite, CompositeSignal::LeaningBearish);
}

/// # Summary
/// MACD 与信号线只差浮点噪声时判为中性，不会翻转为看跌或看涨。
#[test]
fn test_macd_noise_is_neutral() {
    let classifier = SignalClassifier::new(SignalThresholds::default(), Cascade::Standard);
    for (line, signal) in [(2.5, 2.5 + 1.78e-15), (2.5, 2.5 - 9.99e-16), (0.0, 1e-12), (3000.0, 3000.0 + 1e-7)] {
        let s = BarSnapshot { macd: Some(line), macd_signal: Some(signal), ..bullish_snapshot() };
        assert_eq!(classifier.classify(&s).macd, Some(MacdSignal::Neutral), "{line} vs {signal}");
    }

    let s = BarSnapshot { macd: Some(2.5), macd_signal: Some(2.49), ..bullish_snapshot() };
    assert_eq!(classifier.classify(&s).macd, Some(MacdSignal::Bullish));
}
