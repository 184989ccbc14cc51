use crate::Series;
use crate::atr::ratio;
use crate::ma::sma;
use klinesight_core::indicator::error::IndicatorError;

/// 成交量均线与量比
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeOutput {
    pub ma: Series,
    pub ratio: Series,
}

/// # Summary
/// 成交量均线 MA(period) 与量比 = 成交量 / 成交量均线，均线为 0 时量比未定义。
pub fn volume_ratio(volumes: &[f64], period: usize) -> Result<VolumeOutput, IndicatorError> {
    let ma = sma(volumes, period)?;
    let current: Series = volumes.iter().copied().map(Some).collect();
    let ratio = ratio(&current, &ma);
    Ok(VolumeOutput { ma, ratio })
}
