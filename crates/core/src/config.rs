use crate::common::TimeFrame;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// # Summary
/// 配置域错误枚举。
#[derive(Error, Debug)]
pub enum ConfigError {
    // 配置源读取或反序列化失败
    #[error("Config load error: {0}")]
    Load(String),
    // 配置值不满足约束
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub exchange: ExchangeConfig,
    pub storage: StorageConfig,
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    /// # Summary
    /// 校验配置取值。
    ///
    /// # Logic
    /// 1. 交易对、接口地址与数据目录不能为空。
    /// 2. 抓取数量与超时必须大于 0。
    /// 3. RSI 阈值保持 超卖极值 < 强买入 < 50 < 强卖出 < 超买极值，激进档同样有序。
    ///
    /// # Returns
    /// 第一个不满足的约束以 `ConfigError::Invalid` 返回。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));
        if self.exchange.symbol.trim().is_empty() {
            return invalid("exchange.symbol is empty");
        }
        if self.exchange.base_url.trim().is_empty() {
            return invalid("exchange.base_url is empty");
        }
        if self.exchange.limit == 0 {
            return invalid("exchange.limit must be positive");
        }
        if self.exchange.timeout_secs == 0 {
            return invalid("exchange.timeout_secs must be positive");
        }
        if self.storage.data_dir.trim().is_empty() {
            return invalid("storage.data_dir is empty");
        }

        let t = &self.analysis.thresholds;
        let ordered = |low: f64, buy: f64, sell: f64, high: f64| {
            low < buy && buy < 50.0 && 50.0 < sell && sell < high
        };
        if !ordered(
            t.rsi_extreme_oversold,
            t.rsi_strong_buy,
            t.rsi_strong_sell,
            t.rsi_extreme_overbought,
        ) {
            return invalid("rsi thresholds must be strictly ordered around 50");
        }
        if !ordered(
            t.rsi_aggressive_oversold,
            t.rsi_strong_buy,
            t.rsi_strong_sell,
            t.rsi_aggressive_overbought,
        ) {
            return invalid("aggressive rsi thresholds must be strictly ordered around 50");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    pub base_url: String,
    pub symbol: String,
    // 只读接口无需密钥，配置后随请求发送
    pub api_key: Option<String>,
    pub limit: usize,
    pub timeout_secs: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://fapi.binance.com".to_string(),
            symbol: "BTCUSDT".to_string(),
            api_key: None,
            limit: 200,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

/// # Summary
/// 信号分类阈值。
///
/// # Invariants
/// - `rsi_extreme_oversold < rsi_strong_buy < 50 < rsi_strong_sell < rsi_extreme_overbought`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    pub rsi_extreme_overbought: f64,
    pub rsi_extreme_oversold: f64,
    pub rsi_strong_sell: f64,
    pub rsi_strong_buy: f64,
    // 激进模式下的极值阈值
    pub rsi_aggressive_overbought: f64,
    pub rsi_aggressive_oversold: f64,
    // 量比超过该值视为放量突破
    pub volume_surge_ratio: f64,
    // 布林带宽低于均值的该倍数视为挤压
    pub bb_squeeze_factor: f64,
    // 斐波那契关键位容差
    pub fib_tolerance: f64,
    pub fib_heavy_volume_ratio: f64,
    pub fib_light_volume_ratio: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            rsi_extreme_overbought: 75.0,
            rsi_extreme_oversold: 25.0,
            rsi_strong_sell: 70.0,
            rsi_strong_buy: 30.0,
            rsi_aggressive_overbought: 80.0,
            rsi_aggressive_oversold: 20.0,
            volume_surge_ratio: 1.5,
            bb_squeeze_factor: 0.8,
            fib_tolerance: 0.02,
            fib_heavy_volume_ratio: 1.2,
            fib_light_volume_ratio: 0.8,
        }
    }
}

/// # Summary
/// 单个周期的指标窗口参数档位。
///
/// # Invariants
/// - 所有窗口长度应大于 0，否则对应指标计算失败并被单独记录。
/// - `ma_medium` 为 None 时取 `ma_long`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorProfile {
    pub ma_short: usize,
    pub ma_medium: Option<usize>,
    pub ma_long: usize,
    pub ma_extra_long: Option<usize>,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub macd_long_fast: Option<usize>,
    pub macd_long_slow: Option<usize>,
    pub macd_long_signal: Option<usize>,
    pub rsi_period: usize,
    pub rsi_secondary: Option<usize>,
    pub rsi_long: Option<usize>,
    pub rsi_extra_long: Option<usize>,
    pub bb_period: usize,
    pub bb_std_dev: f64,
    pub bb_long_period: Option<usize>,
    pub stoch_fastk: usize,
    pub stoch_slowk: usize,
    pub stoch_slowd: usize,
    pub atr_period: usize,
    pub atr_long_period: Option<usize>,
    pub adx_period: usize,
    pub volume_ma_period: usize,
    pub fib_lookback: usize,
}

impl Default for IndicatorProfile {
    fn default() -> Self {
        Self {
            ma_short: 20,
            ma_medium: None,
            ma_long: 50,
            ma_extra_long: None,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            macd_long_fast: None,
            macd_long_slow: None,
            macd_long_signal: None,
            rsi_period: 14,
            rsi_secondary: None,
            rsi_long: None,
            rsi_extra_long: None,
            bb_period: 20,
            bb_std_dev: 2.0,
            bb_long_period: None,
            stoch_fastk: 14,
            stoch_slowk: 3,
            stoch_slowd: 3,
            atr_period: 14,
            atr_long_period: None,
            adx_period: 14,
            volume_ma_period: 20,
            fib_lookback: 50,
        }
    }
}

impl IndicatorProfile {
    /// # Summary
    /// 各周期的内置参数档位：周期越短参数越敏感。
    pub fn preset(timeframe: TimeFrame) -> Self {
        let base = Self::default();
        match timeframe {
            TimeFrame::Minute5 => Self {
                ma_short: 5,
                ma_long: 13,
                macd_fast: 3,
                macd_slow: 8,
                macd_signal: 3,
                rsi_period: 5,
                bb_period: 10,
                bb_std_dev: 1.5,
                stoch_fastk: 5,
                atr_period: 5,
                adx_period: 5,
                fib_lookback: 30,
                ..base
            },
            TimeFrame::Minute15 => Self {
                ma_short: 10,
                ma_long: 30,
                macd_fast: 8,
                macd_slow: 17,
                rsi_period: 9,
                bb_period: 15,
                stoch_fastk: 9,
                atr_period: 10,
                adx_period: 10,
                ..base
            },
            TimeFrame::Hour1 => Self {
                ma_short: 12,
                ma_long: 26,
                macd_fast: 9,
                macd_slow: 21,
                macd_signal: 7,
                rsi_period: 11,
                bb_period: 16,
                stoch_fastk: 11,
                atr_period: 12,
                adx_period: 12,
                ..base
            },
            TimeFrame::Hour4 => Self {
                fib_lookback: 60,
                ..base
            },
            TimeFrame::Day1 => Self {
                ma_short: 21,
                ma_long: 55,
                ma_extra_long: Some(200),
                rsi_long: Some(50),
                bb_period: 21,
                bb_long_period: Some(89),
                atr_long_period: Some(50),
                fib_lookback: 80,
                ..base
            },
        }
    }

    pub fn ma_medium(&self) -> usize {
        self.ma_medium.unwrap_or(self.ma_long)
    }

    /// 是否配置了长周期指标，决定综合信号使用扩展规则链
    pub fn has_long_indicators(&self) -> bool {
        self.rsi_long.is_some() || (self.macd_long_fast.is_some() && self.macd_long_slow.is_some())
    }
}

/// 各周期参数档位，未配置的周期使用内置档位
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSet {
    pub m5: IndicatorProfile,
    pub m15: IndicatorProfile,
    pub h1: IndicatorProfile,
    pub h4: IndicatorProfile,
    pub d1: IndicatorProfile,
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self {
            m5: IndicatorProfile::preset(TimeFrame::Minute5),
            m15: IndicatorProfile::preset(TimeFrame::Minute15),
            h1: IndicatorProfile::preset(TimeFrame::Hour1),
            h4: IndicatorProfile::preset(TimeFrame::Hour4),
            d1: IndicatorProfile::preset(TimeFrame::Day1),
        }
    }
}

impl ProfileSet {
    pub fn get(&self, timeframe: TimeFrame) -> &IndicatorProfile {
        match timeframe {
            TimeFrame::Minute5 => &self.m5,
            TimeFrame::Minute15 => &self.m15,
            TimeFrame::Hour1 => &self.h1,
            TimeFrame::Hour4 => &self.h4,
            TimeFrame::Day1 => &self.d1,
        }
    }
}

/// # Summary
/// 分析流程的显式配置：参数档位、信号阈值与激进模式开关。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub aggressive: bool,
    pub thresholds: SignalThresholds,
    pub profiles: ProfileSet,
}

impl AnalysisConfig {
    /// # Summary
    /// 解析指定周期最终使用的指标参数。
    ///
    /// # Logic
    /// 1. 取该周期的参数档位。
    /// 2. 未开启激进模式时原样返回。
    /// 3. 开启时缩短部分窗口：MA 短期 ×0.7 (≥5)，MA 长期 ×0.8 (≥10)，
    ///    MACD 快线 ×0.7 (≥8)，MACD 慢线 ×0.7 (≥18)，RSI ×0.7 (≥7)；
    ///    原长期窗口保留为中期窗口，供均线交叉判断使用。
    ///
    /// # Arguments
    /// * `timeframe`: K 线周期。
    ///
    /// # Returns
    /// 解析后的参数档位。
    pub fn resolve(&self, timeframe: TimeFrame) -> IndicatorProfile {
        let mut profile = self.profiles.get(timeframe).clone();
        if !self.aggressive {
            return profile;
        }
        profile.ma_medium = Some(profile.ma_medium());
        profile.ma_short = scale(profile.ma_short, 7, 5);
        profile.ma_long = scale(profile.ma_long, 8, 10);
        profile.macd_fast = scale(profile.macd_fast, 7, 8);
        profile.macd_slow = scale(profile.macd_slow, 7, 18);
        profile.rsi_period = scale(profile.rsi_period, 7, 7);
        profile
    }

    /// # Summary
    /// 返回生效的信号阈值，激进模式下 RSI 极值阈值切换为激进档。
    pub fn effective_thresholds(&self) -> SignalThresholds {
        let mut thresholds = self.thresholds.clone();
        if self.aggressive {
            thresholds.rsi_extreme_overbought = thresholds.rsi_aggressive_overbought;
            thresholds.rsi_extreme_oversold = thresholds.rsi_aggressive_oversold;
        }
        thresholds
    }
}

// 按十分比缩放并设置下限，向下取整
fn scale(period: usize, tenths: usize, floor: usize) -> usize {
    (period * tenths / 10).max(floor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.exchange.base_url, "https://fapi.binance.com");
        assert_eq!(config.exchange.symbol, "BTCUSDT");
        assert_eq!(config.exchange.limit, 200);
        assert_eq!(config.storage.data_dir, "data");
        assert!(!config.analysis.aggressive);
    }

    #[test]
    fn test_validate() {
        assert!(AppConfig::default().validate().is_ok());

        let mut config = AppConfig::default();
        config.exchange.limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.analysis.thresholds.rsi_strong_buy = 60.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.analysis.thresholds.rsi_aggressive_overbought = 65.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_presets() {
        let m15 = IndicatorProfile::preset(TimeFrame::Minute15);
        assert_eq!((m15.ma_short, m15.ma_long), (10, 30));
        assert_eq!((m15.macd_fast, m15.macd_slow, m15.macd_signal), (8, 17, 9));

        let d1 = IndicatorProfile::preset(TimeFrame::Day1);
        assert_eq!((d1.ma_short, d1.ma_long), (21, 55));
        assert!(d1.has_long_indicators());
        assert!(!IndicatorProfile::preset(TimeFrame::Hour4).has_long_indicators());
    }

    #[test]
    fn test_resolve_without_aggressive_is_identity() {
        let config = AnalysisConfig::default();
        let resolved = config.resolve(TimeFrame::Hour4);
        assert_eq!(&resolved, config.profiles.get(TimeFrame::Hour4));
        assert_eq!(resolved.ma_medium(), 50);
    }

    #[test]
    fn test_resolve_aggressive_scales_periods() {
        let config = AnalysisConfig {
            aggressive: true,
            ..Default::default()
        };
        let p = config.resolve(TimeFrame::Hour4);
        // 20*0.7=14, 50*0.8=40, 12*0.7=8, 26*0.7=18, 14*0.7=9
        assert_eq!(p.ma_short, 14);
        assert_eq!(p.ma_long, 40);
        assert_eq!(p.ma_medium(), 50);
        assert_eq!(p.macd_fast, 8);
        assert_eq!(p.macd_slow, 18);
        assert_eq!(p.rsi_period, 9);
        assert_eq!(p.bb_std_dev, 2.0);

        // 下限生效
        let p5 = config.resolve(TimeFrame::Minute5);
        assert_eq!(p5.ma_short, 5);
        assert_eq!(p5.ma_long, 10);
        assert_eq!(p5.rsi_period, 7);

        let t = config.effective_thresholds();
        assert_eq!(t.rsi_extreme_overbought, 80.0);
        assert_eq!(t.rsi_extreme_oversold, 20.0);
    }

    #[test]
    fn test_partial_profile_deserialize() {
        let json = r#"{"aggressive": true, "profiles": {"h1": {"ma_short": 7}}}"#;
        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert!(config.aggressive);
        assert_eq!(config.profiles.h1.ma_short, 7);
        // 未给出的字段回落到 IndicatorProfile::default
        assert_eq!(config.profiles.h1.ma_long, 50);
        assert_eq!(config.profiles.d1.ma_short, 21);
    }
}
