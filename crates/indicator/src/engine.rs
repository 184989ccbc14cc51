use crate::Series;
use crate::{adx, atr, bollinger, ma, macd, obv, rsi, stochastic, volume};
use klinesight_core::config::{IndicatorProfile, SignalThresholds};
use klinesight_core::indicator::columns as col;
use klinesight_core::indicator::entity::{IndicatorFailure, IndicatorFrame};
use klinesight_core::indicator::error::IndicatorError;
use klinesight_core::market::entity::PriceSeries;
use tracing::{debug, warn};

// 带宽挤压判断使用的均值窗口
const BB_WIDTH_LOOKBACK: usize = 20;
// 超短均线窗口
const MA_FAST_WINDOW: usize = 3;

/// # Summary
/// 指标引擎的输出：对齐的指标表与单独记录的失败指标。
#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub frame: IndicatorFrame,
    pub failures: Vec<IndicatorFailure>,
}

/// # Summary
/// 滚动指标引擎，按参数档位把行情序列转换为指标表。
///
/// # Invariants
/// - 每个指标独立计算，单个指标失败不会中断其余指标。
/// - 失败指标的列以 None 填充并记录到 `failures`。
pub struct IndicatorEngine<'a> {
    profile: &'a IndicatorProfile,
    thresholds: &'a SignalThresholds,
}

// 计算过程中的可变状态
struct Builder<'s> {
    series: &'s PriceSeries,
    frame: IndicatorFrame,
    failures: Vec<IndicatorFailure>,
}

impl Builder<'_> {
    /// # Summary
    /// 执行一个指标步骤并隔离其失败。
    ///
    /// # Logic
    /// 1. 运行计算闭包。
    /// 2. 成功则逐列写入指标表。
    /// 3. 失败则记录 `IndicatorFailure`，并把声明的列全部填为 None。
    fn step<F>(&mut self, indicator: &str, names: &[String], compute: F)
    where
        F: FnOnce(&PriceSeries) -> Result<Vec<Series>, IndicatorError>,
    {
        let result = compute(self.series).and_then(|columns| {
            for (name, values) in names.iter().zip(columns) {
                self.frame.push_column(name.as_str(), values)?;
            }
            Ok(())
        });
        if let Err(e) = result {
            warn!(indicator, error = %e, "indicator computation failed, filling with nulls");
            self.failures.push(IndicatorFailure {
                indicator: indicator.to_string(),
                reason: e.to_string(),
            });
            let n = self.frame.len();
            for name in names {
                if self.frame.push_column(name.as_str(), vec![None; n]).is_err() {
                    debug!(column = %name, "null column rejected");
                }
            }
        }
    }
}

impl<'a> IndicatorEngine<'a> {
    pub fn new(profile: &'a IndicatorProfile, thresholds: &'a SignalThresholds) -> Self {
        Self {
            profile,
            thresholds,
        }
    }

    /// # Summary
    /// 计算全部指标列。
    ///
    /// # Logic
    /// 1. 均线：MA3、短期、中期、长期及可选超长期。
    /// 2. MACD 及可选长周期 MACD。
    /// 3. RSI 及可选辅助/长期/超长期 RSI。
    /// 4. 布林带、带宽、挤压标记及可选长周期布林带。
    /// 5. 成交量均线与量比、随机指标、OBV、ATR（含可选长期 ATR 与比率）、ADX。
    ///
    /// # Arguments
    /// * `series`: 行情序列。
    ///
    /// # Returns
    /// 指标表与失败列表。历史不足的列为 None，不视为失败。
    pub fn compute(&self, series: &PriceSeries) -> EngineOutput {
        let p = self.profile;
        let mut b = Builder {
            series,
            frame: IndicatorFrame::new(series.index()),
            failures: Vec::new(),
        };

        let mut ma_windows = vec![MA_FAST_WINDOW, p.ma_short, p.ma_medium(), p.ma_long];
        ma_windows.extend(p.ma_extra_long);
        for window in ma_windows {
            let name = if window == MA_FAST_WINDOW {
                col::MA_FAST.to_string()
            } else {
                col::ma(window)
            };
            b.step("MA", &[name], |s| Ok(vec![ma::sma(&s.closes(), window)?]));
        }

        b.step("MACD", &names(&[col::MACD, col::MACD_SIGNAL, col::MACD_HIST]), |s| {
            let out = macd::macd(&s.closes(), p.macd_fast, p.macd_slow, p.macd_signal)?;
            Ok(vec![out.macd, out.signal, out.hist])
        });
        if let (Some(fast), Some(slow)) = (p.macd_long_fast, p.macd_long_slow) {
            let signal = p.macd_long_signal.unwrap_or(p.macd_signal);
            b.step(
                "MACD_Long",
                &names(&[col::MACD_LONG, col::MACD_LONG_SIGNAL, col::MACD_LONG_HIST]),
                |s| {
                    let out = macd::macd(&s.closes(), fast, slow, signal)?;
                    Ok(vec![out.macd, out.signal, out.hist])
                },
            );
        }

        b.step("RSI", &names(&[col::RSI]), |s| Ok(vec![rsi::rsi(&s.closes(), p.rsi_period)?]));
        for (name, period) in [
            (col::RSI_SECONDARY, p.rsi_secondary),
            (col::RSI_LONG, p.rsi_long),
            (col::RSI_EXTRA_LONG, p.rsi_extra_long),
        ] {
            if let Some(period) = period.filter(|&w| w != p.rsi_period) {
                b.step(name, &names(&[name]), |s| Ok(vec![rsi::rsi(&s.closes(), period)?]));
            }
        }

        let squeeze_factor = self.thresholds.bb_squeeze_factor;
        b.step(
            "BB",
            &names(&[col::BB_UPPER, col::BB_MIDDLE, col::BB_LOWER, col::BB_WIDTH, col::BB_SQUEEZE]),
            |s| {
                let bands = bollinger::bollinger(&s.closes(), p.bb_period, p.bb_std_dev)?;
                let width = bollinger::width(&bands);
                let squeeze = bollinger::squeeze(&width, BB_WIDTH_LOOKBACK, squeeze_factor)?;
                Ok(vec![bands.upper, bands.middle, bands.lower, width, squeeze])
            },
        );
        if let Some(period) = p.bb_long_period {
            b.step(
                "BB_Long",
                &names(&[col::BB_LONG_UPPER, col::BB_LONG_MIDDLE, col::BB_LONG_LOWER]),
                |s| {
                    let bands = bollinger::bollinger(&s.closes(), period, p.bb_std_dev)?;
                    Ok(vec![bands.upper, bands.middle, bands.lower])
                },
            );
        }

        b.step(
            "Volume",
            &[col::volume_ma(p.volume_ma_period), col::VOLUME_RATIO.to_string()],
            |s| {
                let out = volume::volume_ratio(&s.volumes(), p.volume_ma_period)?;
                Ok(vec![out.ma, out.ratio])
            },
        );

        b.step("STOCH", &names(&[col::STOCH_SLOW_K, col::STOCH_SLOW_D]), |s| {
            let out = stochastic::stochastic(
                &s.highs(),
                &s.lows(),
                &s.closes(),
                p.stoch_fastk,
                p.stoch_slowk,
                p.stoch_slowd,
            )?;
            Ok(vec![out.slow_k, out.slow_d])
        });

        b.step("OBV", &names(&[col::OBV]), |s| Ok(vec![obv::obv(&s.closes(), &s.volumes())]));

        b.step("ATR", &names(&[col::ATR]), |s| {
            Ok(vec![atr::atr(&s.highs(), &s.lows(), &s.closes(), p.atr_period)?])
        });
        if let Some(period) = p.atr_long_period.filter(|&w| w != p.atr_period) {
            b.step("ATR_Long", &names(&[col::ATR_LONG, col::ATR_RATIO]), |s| {
                let short = atr::atr(&s.highs(), &s.lows(), &s.closes(), p.atr_period)?;
                let long = atr::atr(&s.highs(), &s.lows(), &s.closes(), period)?;
                let ratio = atr::ratio(&short, &long);
                Ok(vec![long, ratio])
            });
        }

        b.step("ADX", &names(&[col::ADX, col::PLUS_DI, col::MINUS_DI]), |s| {
            let out = adx::adx(&s.highs(), &s.lows(), &s.closes(), p.adx_period)?;
            Ok(vec![out.adx, out.plus_di, out.minus_di])
        });

        debug!(
            bars = series.len(),
            columns = b.frame.columns().len(),
            failures = b.failures.len(),
            "indicator frame computed"
        );
        EngineOutput {
            frame: b.frame,
            failures: b.failures,
        }
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
