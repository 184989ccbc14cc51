use chrono::{DateTime, Utc};

/// # Summary
/// 时间供给器接口，隔离物理系统时钟。
/// 输出文件的日期戳与报告生成时间都通过此接口获取，便于测试固定时间。
pub trait Clock: Send + Sync {
    /// 获取当前时间
    fn now(&self) -> DateTime<Utc>;

    /// 当前日期戳 (YYYYMMDD)
    fn date_stamp(&self) -> String {
        self.now().format("%Y%m%d").to_string()
    }
}

/// # Summary
/// 普通运行使用的真实时钟，直接返回操作系统当前时间。
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// # Summary
/// 固定时钟，始终返回构造时给定的时间。
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_date_stamp() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 7, 23, 59, 0).unwrap());
        assert_eq!(clock.date_stamp(), "20250307");
    }
}
