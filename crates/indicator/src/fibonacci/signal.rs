use klinesight_core::config::SignalThresholds;
use klinesight_core::indicator::fibonacci::{
    FibSignal, FibSignalKind, FibTrend, FibonacciReading, FibonacciZone, KEY_RATIOS,
    VolumeConfirmation,
};
use klinesight_core::market::entity::PriceSeries;

/// # Summary
/// 计算单根 K 线的斐波那契读数。
///
/// # Logic
/// 1. 无区域时返回默认读数。
/// 2. 区域非退化时总是给出价格位置。
/// 3. 中性趋势不产生信号与支撑/阻力。
/// 4. 关键回调位低于收盘价为支撑、高于为阻力；上升趋势中上方扩展位计入阻力，
///    下降趋势中下方扩展位计入支撑。最近支撑取最大值，最近阻力取最小值。
/// 5. 按价格位置判定信号种类，非中性信号再按量比附加放量/缩量确认。
///
/// # Arguments
/// * `close`: 收盘价。
/// * `zone`: 该 K 线的（前向填充后）区域。
/// * `volume_ratio`: 量比。
/// * `thresholds`: 容差与量比阈值。
pub fn read_bar(
    close: f64,
    zone: Option<&FibonacciZone>,
    volume_ratio: Option<f64>,
    thresholds: &SignalThresholds,
) -> FibonacciReading {
    let Some(zone) = zone else {
        return FibonacciReading::default();
    };
    let position = zone.position(close);
    let mut reading = FibonacciReading {
        position,
        ..FibonacciReading::default()
    };
    if zone.trend == FibTrend::Neutral {
        return reading;
    }

    let mut supports = Vec::new();
    let mut resistances = Vec::new();
    for price in KEY_RATIOS.iter().filter_map(|&r| zone.retracement(r)) {
        if price < close {
            supports.push(price);
        } else if price > close {
            resistances.push(price);
        }
    }
    for level in &zone.extensions {
        match zone.trend {
            FibTrend::Uptrend if level.price > close => resistances.push(level.price),
            FibTrend::Downtrend if level.price < close => supports.push(level.price),
            _ => {}
        }
    }
    reading.support = supports.into_iter().reduce(f64::max);
    reading.resistance = resistances.into_iter().reduce(f64::min);

    if let Some(position) = position {
        let kind = classify(position, zone.trend, thresholds.fib_tolerance);
        let volume = match (kind, volume_ratio) {
            (FibSignalKind::Neutral, _) | (_, None) => None,
            (_, Some(r)) if r > thresholds.fib_heavy_volume_ratio => Some(VolumeConfirmation::Heavy),
            (_, Some(r)) if r < thresholds.fib_light_volume_ratio => Some(VolumeConfirmation::Light),
            _ => None,
        };
        reading.signal = FibSignal { kind, volume };
    }
    reading
}

fn classify(position: f64, trend: FibTrend, tolerance: f64) -> FibSignalKind {
    let up = trend == FibTrend::Uptrend;
    let near = |level: f64| (position - level).abs() < tolerance;
    if near(0.382) {
        if up { FibSignalKind::Bounce382 } else { FibSignalKind::Reject382 }
    } else if near(0.5) {
        if up { FibSignalKind::Bounce50 } else { FibSignalKind::Reject50 }
    } else if near(0.618) {
        if up { FibSignalKind::Bounce618 } else { FibSignalKind::Reject618 }
    } else if position > 1.0 {
        FibSignalKind::BreakoutUp
    } else if position < 0.0 {
        FibSignalKind::BreakoutDown
    } else if position > 0.618 && position < 0.786 {
        FibSignalKind::GoldenZone
    } else {
        FibSignalKind::Neutral
    }
}

/// 对整段序列逐根计算斐波那契读数
pub fn read_series(
    series: &PriceSeries,
    zones: &[Option<FibonacciZone>],
    volume_ratio: &[Option<f64>],
    thresholds: &SignalThresholds,
) -> Vec<FibonacciReading> {
    series
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            read_bar(
                bar.close,
                zones.get(i).and_then(|z| z.as_ref()),
                volume_ratio.get(i).copied().flatten(),
                thresholds,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fibonacci::zone::build_zone;

    #[test]
    fn test_bounce_with_volume() {
        let t = SignalThresholds::default();
        // 上升趋势区域 [100, 200]，收盘 161.8 附近：位置 ≈ 0.618
        let zone = build_zone(200.0, 100.0, 190.0).unwrap();
        let reading = read_bar(162.0, Some(&zone), Some(1.3), &t);
        assert_eq!(reading.signal.kind, FibSignalKind::Bounce618);
        assert_eq!(reading.signal.label(), "fib_618_bounce_带量");
        assert!((reading.position.unwrap() - 0.62).abs() < 1e-9);
        // 上升趋势 0.382 回调位为 161.8，低于 162 为支撑
        assert!((reading.support.unwrap() - 161.8).abs() < 1e-9);
        // 0.5 回调位 150、0.618 回调位 138.2 也在下方；上方只有扩展位
        assert!((reading.resistance.unwrap() - 227.2).abs() < 1e-9);
    }

    #[test]
    fn test_breakouts_and_golden_zone() {
        let t = SignalThresholds::default();
        let down = build_zone(200.0, 100.0, 110.0).unwrap();
        assert_eq!(read_bar(90.0, Some(&down), None, &t).signal.kind, FibSignalKind::BreakoutDown);
        assert_eq!(read_bar(150.0, Some(&down), Some(0.5), &t).signal.label(), "fib_50_reject_缩量");

        let up = build_zone(200.0, 100.0, 190.0).unwrap();
        assert_eq!(read_bar(210.0, Some(&up), Some(1.0), &t).signal.label(), "fib_breakout_up");
        assert_eq!(read_bar(170.0, Some(&up), None, &t).signal.kind, FibSignalKind::GoldenZone);
        assert_eq!(read_bar(190.0, Some(&up), Some(2.0), &t).signal, FibSignal::NEUTRAL);
    }

    #[test]
    fn test_neutral_trend_has_position_only() {
        let t = SignalThresholds::default();
        let zone = build_zone(200.0, 100.0, 150.0).unwrap();
        let reading = read_bar(150.0, Some(&zone), Some(2.0), &t);
        assert_eq!(reading.signal, FibSignal::NEUTRAL);
        assert_eq!(reading.position, Some(0.5));
        assert!(reading.support.is_none() && reading.resistance.is_none());
    }
}
