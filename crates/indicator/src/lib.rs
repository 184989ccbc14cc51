pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod engine;
pub mod fibonacci;
pub mod ma;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod stochastic;
pub mod volume;
pub mod window;

/// 单列指标输出
pub type Series = Vec<Option<f64>>;
