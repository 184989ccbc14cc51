use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub mod time;

/// # Summary
/// K 线时间周期枚举，决定抓取间隔与指标参数档位。
///
/// # Invariants
/// - 每个周期都对应一个交易所 interval 字符串与一个中文周期名。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeFrame {
    // 5分钟
    Minute5,
    // 15分钟
    Minute15,
    // 1小时
    Hour1,
    // 4小时
    Hour4,
    // 1日
    Day1,
}

impl TimeFrame {
    /// 所有支持的周期，按时间跨度升序。
    pub const ALL: [TimeFrame; 5] = [
        TimeFrame::Minute5,
        TimeFrame::Minute15,
        TimeFrame::Hour1,
        TimeFrame::Hour4,
        TimeFrame::Day1,
    ];

    /// # Summary
    /// 返回周期的中文名称，用于报告标题与输出文件名。
    pub fn display_name(&self) -> &'static str {
        match self {
            TimeFrame::Minute5 => "5分钟线",
            TimeFrame::Minute15 => "15分钟线",
            TimeFrame::Hour1 => "1小时线",
            TimeFrame::Hour4 => "4小时线",
            TimeFrame::Day1 => "日线",
        }
    }

    /// 单根 K 线覆盖的秒数
    pub fn seconds(&self) -> i64 {
        match self {
            TimeFrame::Minute5 => 300,
            TimeFrame::Minute15 => 900,
            TimeFrame::Hour1 => 3_600,
            TimeFrame::Hour4 => 14_400,
            TimeFrame::Day1 => 86_400,
        }
    }
}

impl FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "5m" | "minute5" | "5分钟线" => Ok(TimeFrame::Minute5),
            "15m" | "minute15" | "15分钟线" => Ok(TimeFrame::Minute15),
            "1h" | "hour1" | "1小时线" => Ok(TimeFrame::Hour1),
            "4h" | "hour4" | "4小时线" => Ok(TimeFrame::Hour4),
            "1d" | "day1" | "日线" => Ok(TimeFrame::Day1),
            _ => Err(format!("Unknown TimeFrame: {}", s)),
        }
    }
}

impl std::fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeFrame::Minute5 => write!(f, "5m"),
            TimeFrame::Minute15 => write!(f, "15m"),
            TimeFrame::Hour1 => write!(f, "1h"),
            TimeFrame::Hour4 => write!(f, "4h"),
            TimeFrame::Day1 => write!(f, "1d"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_parse_and_display() {
        for tf in TimeFrame::ALL {
            let parsed: TimeFrame = tf.to_string().parse().unwrap();
            assert_eq!(parsed, tf);
        }
        assert_eq!("日线".parse::<TimeFrame>().unwrap(), TimeFrame::Day1);
        assert_eq!("4H".parse::<TimeFrame>().unwrap(), TimeFrame::Hour4);
        assert!("3m".parse::<TimeFrame>().is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(TimeFrame::Minute15.display_name(), "15分钟线");
        assert_eq!(TimeFrame::Day1.display_name(), "日线");
    }
}
