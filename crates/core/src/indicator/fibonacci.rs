use serde::{Deserialize, Serialize};

/// 回调比例
pub const RETRACEMENT_RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];
/// 扩展比例
pub const EXTENSION_RATIOS: [f64; 2] = [1.272, 1.414];
/// 参与支撑/阻力判断的关键回调比例
pub const KEY_RATIOS: [f64; 3] = [0.382, 0.5, 0.618];

/// # Summary
/// 局部趋势方向，由收盘价在窗口高低区间中的相对位置决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FibTrend {
    // 位置 > 0.6
    Uptrend,
    // 位置 < 0.4
    Downtrend,
    // 其余
    Neutral,
}

impl FibTrend {
    pub fn label(&self) -> &'static str {
        match self {
            FibTrend::Uptrend => "uptrend",
            FibTrend::Downtrend => "downtrend",
            FibTrend::Neutral => "neutral",
        }
    }
}

/// 单个斐波那契价位
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibLevel {
    pub ratio: f64,
    pub price: f64,
}

/// # Summary
/// 某根 K 线上的斐波那契区域：窗口高低点、趋势与各价位。
///
/// # Invariants
/// - `high > low`，零宽窗口不会生成区域。
/// - 回调价位顺序与 `RETRACEMENT_RATIOS` 一致，扩展价位顺序与 `EXTENSION_RATIOS` 一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibonacciZone {
    pub high: f64,
    pub low: f64,
    pub trend: FibTrend,
    pub retracements: Vec<FibLevel>,
    pub extensions: Vec<FibLevel>,
}

impl FibonacciZone {
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// 查找指定比例的回调价位
    pub fn retracement(&self, ratio: f64) -> Option<f64> {
        find_level(&self.retracements, ratio)
    }

    /// 查找指定比例的扩展价位
    pub fn extension(&self, ratio: f64) -> Option<f64> {
        find_level(&self.extensions, ratio)
    }

    /// 收盘价在区间内的相对位置，区间退化时为 None
    pub fn position(&self, close: f64) -> Option<f64> {
        let range = self.range();
        if range > 0.0 {
            Some((close - self.low) / range)
        } else {
            None
        }
    }
}

fn find_level(levels: &[FibLevel], ratio: f64) -> Option<f64> {
    levels
        .iter()
        .find(|l| (l.ratio - ratio).abs() < 1e-9)
        .map(|l| l.price)
}

/// 回调列名，例如 `Fib_Ret_0.382`
pub fn retracement_column(ratio: f64) -> String {
    format!("Fib_Ret_{:.3}", ratio)
}

/// 扩展列名，例如 `Fib_Ext_1.272`
pub fn extension_column(ratio: f64) -> String {
    format!("Fib_Ext_{:.3}", ratio)
}

/// # Summary
/// 斐波那契信号种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FibSignalKind {
    Bounce382,
    Reject382,
    Bounce50,
    Reject50,
    Bounce618,
    Reject618,
    BreakoutUp,
    BreakoutDown,
    GoldenZone,
    Neutral,
}

impl FibSignalKind {
    pub fn label(&self) -> &'static str {
        match self {
            FibSignalKind::Bounce382 => "fib_382_bounce",
            FibSignalKind::Reject382 => "fib_382_reject",
            FibSignalKind::Bounce50 => "fib_50_bounce",
            FibSignalKind::Reject50 => "fib_50_reject",
            FibSignalKind::Bounce618 => "fib_618_bounce",
            FibSignalKind::Reject618 => "fib_618_reject",
            FibSignalKind::BreakoutUp => "fib_breakout_up",
            FibSignalKind::BreakoutDown => "fib_breakout_down",
            FibSignalKind::GoldenZone => "fib_golden_zone",
            FibSignalKind::Neutral => "neutral",
        }
    }
}

/// 成交量确认
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeConfirmation {
    // 放量 (量比 > 1.2)
    Heavy,
    // 缩量 (量比 < 0.8)
    Light,
}

/// # Summary
/// 斐波那契信号：种类加可选的成交量确认。
///
/// # Invariants
/// - `Neutral` 信号不附带成交量确认。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FibSignal {
    pub kind: FibSignalKind,
    pub volume: Option<VolumeConfirmation>,
}

impl FibSignal {
    pub const NEUTRAL: FibSignal = FibSignal {
        kind: FibSignalKind::Neutral,
        volume: None,
    };

    pub fn label(&self) -> String {
        match self.volume {
            Some(VolumeConfirmation::Heavy) => format!("{}_带量", self.kind.label()),
            Some(VolumeConfirmation::Light) => format!("{}_缩量", self.kind.label()),
            None => self.kind.label().to_string(),
        }
    }
}

/// # Summary
/// 单根 K 线的斐波那契读数：信号、最近支撑/阻力与价格位置。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibonacciReading {
    pub signal: FibSignal,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    pub position: Option<f64>,
}

impl Default for FibonacciReading {
    fn default() -> Self {
        Self {
            signal: FibSignal::NEUTRAL,
            support: None,
            resistance: None,
            position: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_label_with_volume() {
        let signal = FibSignal {
            kind: FibSignalKind::Bounce618,
            volume: Some(VolumeConfirmation::Heavy),
        };
        assert_eq!(signal.label(), "fib_618_bounce_带量");
        assert_eq!(FibSignal::NEUTRAL.label(), "neutral");
    }

    #[test]
    fn test_column_names() {
        assert_eq!(retracement_column(0.5), "Fib_Ret_0.500");
        assert_eq!(extension_column(1.414), "Fib_Ext_1.414");
    }
}
