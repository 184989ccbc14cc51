use crate::Series;
use crate::atr::true_range;
use crate::window::{check_window, len_f64};
use klinesight_core::indicator::error::IndicatorError;

/// ADX 及方向指标
#[derive(Debug, Clone, PartialEq)]
pub struct AdxOutput {
    pub adx: Series,
    pub plus_di: Series,
    pub minus_di: Series,
}

/// # Summary
/// 平均趋向指数 (Wilder)。
///
/// # Logic
/// 1. 由相邻 K 线计算 +DM、-DM 与 TR。
/// 2. 前 N 个值求和作为首个平滑值（下标 N），之后 sm = sm − sm/N + cur。
/// 3. +DI = sm(+DM)/sm(TR)·100，-DI 同理；DX = |+DI − -DI| / (+DI + -DI)·100。
/// 4. 首个 ADX 为前 N 个 DX 的均值（下标 2N − 1），之后 Wilder 平滑。
/// 5. 平滑 TR 为 0 时 DI 记为 0，DI 之和为 0 时 DX 记为 0。
pub fn adx(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Result<AdxOutput, IndicatorError> {
    check_window("ADX", period)?;
    let n = closes.len();
    let mut out = AdxOutput {
        adx: vec![None; n],
        plus_di: vec![None; n],
        minus_di: vec![None; n],
    };
    if n <= period {
        return Ok(out);
    }
    let p = len_f64(period);
    let (mut sm_plus, mut sm_minus, mut sm_tr) = (0.0, 0.0, 0.0);
    let mut dx_sum = 0.0;
    let mut adx_value: Option<f64> = None;

    for i in 1..n {
        let up = highs[i] - highs[i - 1];
        let down = lows[i - 1] - lows[i];
        let plus_dm = if up > down && up > 0.0 { up } else { 0.0 };
        let minus_dm = if down > up && down > 0.0 { down } else { 0.0 };
        let tr = true_range(highs[i], lows[i], closes[i - 1]);

        if i <= period {
            sm_plus += plus_dm;
            sm_minus += minus_dm;
            sm_tr += tr;
            if i < period {
                continue;
            }
        } else {
            sm_plus = sm_plus - sm_plus / p + plus_dm;
            sm_minus = sm_minus - sm_minus / p + minus_dm;
            sm_tr = sm_tr - sm_tr / p + tr;
        }

        let (di_plus, di_minus) = if sm_tr > 0.0 {
            (100.0 * sm_plus / sm_tr, 100.0 * sm_minus / sm_tr)
        } else {
            (0.0, 0.0)
        };
        let di_sum = di_plus + di_minus;
        let dx = if di_sum > 0.0 {
            100.0 * (di_plus - di_minus).abs() / di_sum
        } else {
            0.0
        };
        out.plus_di[i] = Some(di_plus);
        out.minus_di[i] = Some(di_minus);

        // DX 从下标 period 开始，第 period 个 DX 位于 2·period − 1
        adx_value = match adx_value {
            Some(prev) => Some((prev * (p - 1.0) + dx) / p),
            None => {
                dx_sum += dx;
                (i + 1 >= 2 * period).then(|| dx_sum / p)
            }
        };
        out.adx[i] = adx_value;
    }
    Ok(out)
}
