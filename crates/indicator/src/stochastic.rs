use crate::Series;
use crate::ma::sma_opt;
use crate::window::{RollingWindow, check_window};
use klinesight_core::indicator::error::IndicatorError;

/// 慢速随机指标输出
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticOutput {
    pub slow_k: Series,
    pub slow_d: Series,
}

/// # Summary
/// 慢速随机指标。
///
/// # Logic
/// 1. %K = 100·(close − LL) / (HH − LL)，HH/LL 为 `fastk` 窗口内最高价/最低价；HH == LL 时未定义。
/// 2. slowK = MA(%K, slowk)，slowD = MA(slowK, slowd)。
/// 3. 结果截断到 [0, 100]，防御收盘价越出高低价的脏数据。
pub fn stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    fastk: usize,
    slowk: usize,
    slowd: usize,
) -> Result<StochasticOutput, IndicatorError> {
    check_window("STOCH", fastk)?;
    let mut hh = RollingWindow::new(fastk);
    let mut ll = RollingWindow::new(fastk);

    let raw_k: Series = closes
        .iter()
        .zip(highs.iter().zip(lows))
        .map(|(&c, (&h, &l))| {
            hh.push(h);
            ll.push(l);
            let (high, low) = (hh.max()?, ll.min()?);
            let range = high - low;
            (range > 0.0).then(|| (100.0 * (c - low) / range).clamp(0.0, 100.0))
        })
        .collect();

    let slow_k = sma_opt(&raw_k, slowk)?;
    let slow_d = sma_opt(&slow_k, slowd)?;
    Ok(StochasticOutput { slow_k, slow_d })
}
