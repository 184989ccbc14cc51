//! 指标列名。计算、信号分类与导出共用同一套名字。

pub const MA_FAST: &str = "MA3";
pub const MACD: &str = "MACD";
pub const MACD_SIGNAL: &str = "MACD_Signal";
pub const MACD_HIST: &str = "MACD_Hist";
pub const MACD_LONG: &str = "MACD_Long";
pub const MACD_LONG_SIGNAL: &str = "MACD_Long_Signal";
pub const MACD_LONG_HIST: &str = "MACD_Long_Hist";
pub const RSI: &str = "RSI";
pub const RSI_SECONDARY: &str = "RSI_Secondary";
pub const RSI_LONG: &str = "RSI_Long";
pub const RSI_EXTRA_LONG: &str = "RSI_Extra_Long";
pub const BB_UPPER: &str = "BB_Upper";
pub const BB_MIDDLE: &str = "BB_Middle";
pub const BB_LOWER: &str = "BB_Lower";
pub const BB_WIDTH: &str = "BB_Width";
pub const BB_SQUEEZE: &str = "BB_Squeeze";
pub const BB_LONG_UPPER: &str = "BB_Long_Upper";
pub const BB_LONG_MIDDLE: &str = "BB_Long_Middle";
pub const BB_LONG_LOWER: &str = "BB_Long_Lower";
pub const VOLUME_RATIO: &str = "Volume_Ratio";
pub const STOCH_SLOW_K: &str = "Stoch_SlowK";
pub const STOCH_SLOW_D: &str = "Stoch_SlowD";
pub const OBV: &str = "OBV";
pub const ATR: &str = "ATR";
pub const ATR_LONG: &str = "ATR_Long";
pub const ATR_RATIO: &str = "ATR_Ratio";
pub const ADX: &str = "ADX";
pub const PLUS_DI: &str = "PLUS_DI";
pub const MINUS_DI: &str = "MINUS_DI";

/// 均线列名，例如 `MA20`
pub fn ma(window: usize) -> String {
    format!("MA{}", window)
}

/// 成交量均线列名，例如 `Volume_MA20`
pub fn volume_ma(window: usize) -> String {
    format!("Volume_MA{}", window)
}
