use klinesight_analysis::pipeline::AnalysisFrame;
use klinesight_core::indicator::columns as col;
use klinesight_core::indicator::fibonacci::{FibTrend, KEY_RATIOS};
use klinesight_core::signal::entity::{BbSignal, CompositeSignal, RsiSignal};
use std::fmt::{self, Write};

// 近期窗口长度（K 线根数）
const RECENT_BARS: usize = 5;
const RULE: &str = "--------------------------------------------------";
const NA: &str = "N/A";

fn header(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", RULE)
}

/// 千分位格式，保留两位小数
fn grouped(v: f64) -> String {
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if v < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac)
}

fn money(v: Option<f64>) -> String {
    v.map_or_else(|| NA.to_string(), |v| format!("${}", grouped(v)))
}

fn fixed(v: Option<f64>, precision: usize) -> String {
    v.map_or_else(|| NA.to_string(), |v| format!("{:.*}", precision, v))
}

fn label_or_na<T>(v: Option<T>, f: impl Fn(T) -> &'static str) -> &'static str {
    v.map_or(NA, f)
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn pct_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        None
    } else {
        Some((to - from) / from * 100.0)
    }
}

/// # Summary
/// 价格概览：最新价格及涨跌、近期高低区间、成交量相对均值。
pub(crate) fn price_overview(out: &mut String, a: &AnalysisFrame, last: usize) -> fmt::Result {
    header(out, "[价格概览] 1. 价格概览")?;
    let bars = a.series.bars();
    let Some(bar) = bars.get(last) else {
        return writeln!(out);
    };
    let prev_close = last.checked_sub(1).and_then(|p| bars.get(p)).map_or(bar.close, |b| b.close);
    let change = bar.close - prev_close;
    writeln!(
        out,
        "* 当前价格: {} ({:+.2}, {})",
        money(Some(bar.close)),
        change,
        pct_change(prev_close, bar.close).map_or_else(|| NA.to_string(), |p| format!("{:+.2}%", p))
    )?;

    let recent = &bars[bars.len().saturating_sub(RECENT_BARS)..];
    let high = recent.iter().map(|b| b.high).reduce(f64::max);
    let low = recent.iter().map(|b| b.low).reduce(f64::min);
    writeln!(out, "* 近{}根K线价格范围: {} - {}", recent.len(), money(low), money(high))?;

    let volumes: Vec<f64> = recent.iter().map(|b| b.volume).collect();
    let vs_mean = mean(&volumes)
        .and_then(|m| pct_change(m, bar.volume))
        .map_or_else(|| NA.to_string(), |p| format!("{:+.2}%", p));
    writeln!(out, "* 当前成交量: {} ({} 对比{}根均值)", grouped(bar.volume), vs_mean, recent.len())?;
    writeln!(out)
}

/// # Summary
/// 关键指标：均线、MACD、RSI、布林带、随机指标、ATR、ADX 与量比。
pub(crate) fn key_indicators(out: &mut String, a: &AnalysisFrame, last: usize) -> fmt::Result {
    header(out, "[指标分析] 2. 关键指标分析")?;
    let v = |name: &str| a.value(name, last);
    let s = &a.signals[last];

    let (short_name, medium_name) = (a.ma_short_column(), a.ma_medium_column());
    writeln!(out, "* 移动平均线:")?;
    writeln!(out, "  - {}: {}", short_name, money(v(short_name.as_str())))?;
    writeln!(out, "  - {}: {}", medium_name, money(v(medium_name.as_str())))?;
    writeln!(out, "  - 均线信号: {}", label_or_na(s.ma, |x| x.label()))?;
    if let Some(extra) = a.profile.ma_extra_long {
        let name = col::ma(extra);
        writeln!(out, "  - {}: {}", name, money(v(name.as_str())))?;
    }

    writeln!(out, "* MACD指标:")?;
    writeln!(out, "  - MACD线: {}", fixed(v(col::MACD), 4))?;
    writeln!(out, "  - 信号线: {}", fixed(v(col::MACD_SIGNAL), 4))?;
    writeln!(out, "  - 柱状图: {}", fixed(v(col::MACD_HIST), 4))?;
    writeln!(out, "  - 信号: {}", label_or_na(s.macd, |x| x.label()))?;
    if let Some(cross) = s.macd_zero_cross {
        writeln!(out, "  - 零轴: {}", cross.label())?;
    }

    writeln!(
        out,
        "* RSI指标: {} ({})",
        fixed(v(col::RSI), 2),
        label_or_na(s.rsi, |x| x.label())
    )?;
    if a.frame.has_column(col::RSI_LONG) {
        writeln!(out, "  - 长期RSI: {}", fixed(v(col::RSI_LONG), 2))?;
    }

    writeln!(out, "* 布林带:")?;
    writeln!(out, "  - 上轨: {}", money(v(col::BB_UPPER)))?;
    writeln!(out, "  - 中轨: {}", money(v(col::BB_MIDDLE)))?;
    writeln!(out, "  - 下轨: {}", money(v(col::BB_LOWER)))?;
    writeln!(out, "  - 带宽: {}", fixed(v(col::BB_WIDTH), 4))?;
    writeln!(out, "  - 状态: {}", label_or_na(s.bb, |x| x.label()))?;
    if let Some(breakout) = s.bb_breakout {
        writeln!(out, "  - 量能: {}", breakout.label())?;
    }

    writeln!(
        out,
        "* 随机指标: K={} D={} ({})",
        fixed(v(col::STOCH_SLOW_K), 2),
        fixed(v(col::STOCH_SLOW_D), 2),
        label_or_na(s.stoch, |x| x.label())
    )?;
    writeln!(out, "* ATR: {}", fixed(v(col::ATR), 2))?;
    if a.frame.has_column(col::ATR_RATIO) {
        writeln!(out, "  - ATR比率: {}", fixed(v(col::ATR_RATIO), 3))?;
    }
    writeln!(
        out,
        "* ADX: {} (+DI {} / -DI {})",
        fixed(v(col::ADX), 2),
        fixed(v(col::PLUS_DI), 2),
        fixed(v(col::MINUS_DI), 2)
    )?;
    writeln!(out, "* 量比: {}", fixed(v(col::VOLUME_RATIO), 2))?;
    writeln!(out)
}

/// # Summary
/// 近期信号变化，最新在前。
pub(crate) fn recent_signals(out: &mut String, a: &AnalysisFrame) -> fmt::Result {
    header(out, "[信号变化] 3. 近期信号变化")?;
    let bars = a.series.bars();
    let start = bars.len().saturating_sub(RECENT_BARS);
    for i in (start..bars.len()).rev() {
        let s = &a.signals[i];
        writeln!(out, "* {}:", bars[i].open_time.format("%Y-%m-%d %H:%M"))?;
        writeln!(
            out,
            "  - MA信号: {}, MACD: {}, RSI: {}, 综合信号: {}",
            label_or_na(s.ma, |x| x.label()),
            label_or_na(s.macd, |x| x.label()),
            label_or_na(s.rsi, |x| x.label()),
            s.composite.label()
        )?;
    }
    writeln!(out)
}

fn composite_summary(signal: CompositeSignal) -> [&'static str; 2] {
    match signal {
        CompositeSignal::ExplosiveBullish => [
            "[爆发上涨] 快速均线金叉、MACD 零轴上穿与放量同时出现，价格位于斐波那契关键支撑区。",
            "* 短期动能集中释放，注意追高风险与回踩确认。",
        ],
        CompositeSignal::ExplosiveBearish => [
            "[爆发下跌] 快速均线死叉、MACD 零轴下穿与放量同时出现，价格位于斐波那契强势区。",
            "* 短期抛压集中释放，注意杀跌风险与反抽确认。",
        ],
        CompositeSignal::SuperBullish => [
            "[超强上涨] 多指标共振看涨，长周期 RSI 尚未超买。",
            "* 中长期趋势与短期动能方向一致。",
        ],
        CompositeSignal::SuperBearish => [
            "[超强下跌] 多指标共振看跌，长周期 RSI 尚未超卖。",
            "* 中长期趋势与短期动能方向一致。",
        ],
        CompositeSignal::ExtremeBullish => [
            "[强势上涨] 均线、MACD、RSI 与布林带一致看涨。",
            "* 买方力量主导市场，价格动能强劲。",
        ],
        CompositeSignal::ExtremeBearish => [
            "[强势下跌] 均线、MACD、RSI 与布林带一致看跌。",
            "* 卖方力量主导市场，下行压力较大。",
        ],
        CompositeSignal::StrongBullish => [
            "[上涨趋势] 均线、MACD 与 RSI 一致看涨。",
            "* 买方力量占优。",
        ],
        CompositeSignal::StrongBearish => [
            "[下跌趋势] 均线、MACD 与 RSI 一致看跌。",
            "* 卖方力量占优。",
        ],
        CompositeSignal::Bullish => [
            "[看涨] 均线金叉且 MACD 位于信号线上方。",
            "* 主要趋势指标偏向积极。",
        ],
        CompositeSignal::Bearish => [
            "[看跌] 均线死叉且 MACD 位于信号线下方。",
            "* 主要趋势指标偏向消极。",
        ],
        CompositeSignal::LeaningBullish => [
            "[偏多] 仅均线金叉，其余指标尚未确认。",
            "* 趋势初步转强，等待 MACD 配合。",
        ],
        CompositeSignal::LeaningBearish => [
            "[偏空] 仅均线死叉，其余指标尚未确认。",
            "* 趋势初步转弱，等待 MACD 配合。",
        ],
        CompositeSignal::Neutral => [
            "[中性] 技术指标未形成一致方向。",
            "* 价格可能处于盘整阶段，等待方向选择。",
        ],
    }
}

/// # Summary
/// 综合分析：按综合信号给出结论，并附 RSI 与 MACD 的补充说明。
pub(crate) fn comprehensive(out: &mut String, a: &AnalysisFrame, last: usize) -> fmt::Result {
    header(out, "[综合分析] 4. 综合分析")?;
    let s = &a.signals[last];
    writeln!(out, "* 综合信号: {}", s.composite.label())?;
    for line in composite_summary(s.composite) {
        writeln!(out, "{}", line)?;
    }

    let t = &a.thresholds;
    match s.rsi {
        Some(RsiSignal::ExtremeOverbought) => writeln!(
            out,
            "* RSI进入极度超买区域(>={})，回调风险加大。",
            t.rsi_extreme_overbought
        )?,
        Some(RsiSignal::StrongSell) => writeln!(
            out,
            "* RSI进入强卖出区域({}-{})。",
            t.rsi_strong_sell, t.rsi_extreme_overbought
        )?,
        Some(RsiSignal::ExtremeOversold) => writeln!(
            out,
            "* RSI进入极度超卖区域(<={})，反弹概率上升。",
            t.rsi_extreme_oversold
        )?,
        Some(RsiSignal::StrongBuy) => writeln!(
            out,
            "* RSI进入强买入区域({}-{})。",
            t.rsi_extreme_oversold, t.rsi_strong_buy
        )?,
        _ => {}
    }

    if let (Some(macd), Some(signal)) = (a.value(col::MACD, last), a.value(col::MACD_SIGNAL, last)) {
        if macd > signal {
            writeln!(out, "* MACD柱状图为正值，上涨动能占优。")?;
        } else if macd < signal {
            writeln!(out, "* MACD柱状图为负值，下跌动能占优。")?;
        }
    }
    writeln!(out)
}

/// # Summary
/// 基于 ATR 的交易建议。
///
/// # Logic
/// 1. 强势及以上信号：止损 ATR×1.5，目标 ATR×3.5。
/// 2. 普通看涨/看跌：止损 ATR×2，目标 ATR×2.5。
/// 3. 中性：观望。
/// 4. 附加 RSI 极端信号与布林带挤压突破提示。
pub(crate) fn recommendation(out: &mut String, a: &AnalysisFrame, last: usize) -> fmt::Result {
    header(out, "[交易建议] 5. 交易建议")?;
    let s = &a.signals[last];
    let close = a.series.bars()[last].close;
    let atr = a.value(col::ATR, last).filter(|v| *v > 0.0);

    // (方向, 止损倍数, 目标倍数)
    let plan = match s.composite {
        CompositeSignal::Bullish | CompositeSignal::LeaningBullish => Some((1.0_f64, 2.0, 2.5)),
        CompositeSignal::Bearish | CompositeSignal::LeaningBearish => Some((-1.0, 2.0, 2.5)),
        c if c.is_bullish() => Some((1.0, 1.5, 3.5)),
        c if c.is_bearish() => Some((-1.0, 1.5, 3.5)),
        _ => None,
    };

    match plan {
        Some((dir, stop_mult, target_mult)) => {
            let side = if dir > 0.0 { "做多" } else { "做空" };
            writeln!(out, "* 方向: {} (参考价 {})", side, money(Some(close)))?;
            match atr {
                Some(atr) => {
                    writeln!(
                        out,
                        "* 止损位: {} (ATR×{})",
                        money(Some(close - dir * atr * stop_mult)),
                        stop_mult
                    )?;
                    writeln!(
                        out,
                        "* 目标位: {} (ATR×{}, 盈亏比{:.1}:1)",
                        money(Some(close + dir * atr * target_mult)),
                        target_mult,
                        target_mult / stop_mult
                    )?;
                }
                None => writeln!(out, "* ATR 不可用，无法给出止损与目标位")?,
            }
        }
        None => {
            writeln!(out, "* 方向: 观望")?;
            writeln!(out, "* 等待综合信号转向后再入场")?;
        }
    }

    match s.rsi {
        Some(RsiSignal::ExtremeOverbought | RsiSignal::StrongSell) => {
            writeln!(out, "[警告] RSI 处于超买端，注意减仓或对冲")?;
        }
        Some(RsiSignal::ExtremeOversold | RsiSignal::StrongBuy) => {
            writeln!(out, "[机会] RSI 处于超卖端，关注反弹机会")?;
        }
        _ => {}
    }
    if matches!(
        s.bb,
        Some(BbSignal::SqueezeBreakoutUpper | BbSignal::SqueezeBreakoutLower)
    ) {
        writeln!(out, "[突破] 布林带挤压后突破，波动率可能快速放大")?;
    }
    writeln!(out, "* 单笔交易风险建议控制在总资金的 1-3%")?;
    writeln!(out)
}

/// # Summary
/// 斐波那契分析：当前区域、关键价位、价格位置、支撑阻力与信号。
pub(crate) fn fibonacci(out: &mut String, a: &AnalysisFrame, last: usize) -> fmt::Result {
    header(out, "[斐波那契] 6. 斐波那契分析")?;
    let Some(zone) = a.zones.get(last).and_then(|z| z.as_ref()) else {
        writeln!(
            out,
            "* 历史不足 {} 根K线，尚未形成斐波那契区域",
            2 * a.profile.fib_lookback + 1
        )?;
        return writeln!(out);
    };
    let reading = &a.readings[last];
    let trend = match zone.trend {
        FibTrend::Uptrend => "上升趋势",
        FibTrend::Downtrend => "下降趋势",
        FibTrend::Neutral => "震荡",
    };
    writeln!(out, "* 区域: {} - {} ({})", money(Some(zone.low)), money(Some(zone.high)), trend)?;
    for ratio in KEY_RATIOS {
        writeln!(out, "  - 回调 {:.3}: {}", ratio, money(zone.retracement(ratio)))?;
    }
    for level in &zone.extensions {
        writeln!(out, "  - 扩展 {:.3}: {}", level.ratio, money(Some(level.price)))?;
    }
    writeln!(out, "* 价格位置: {}", fixed(reading.position, 3))?;
    writeln!(out, "* 最近支撑: {}", money(reading.support))?;
    writeln!(out, "* 最近阻力: {}", money(reading.resistance))?;
    writeln!(out, "* 斐波那契信号: {}", reading.signal.label())?;
    if let Some(zone) = a.signals[last].fib_key_zone {
        writeln!(out, "* 关键区域: {}", zone.label())?;
    }
    writeln!(out)
}

/// # Summary
/// 数据说明：数据来源、样本数量、参数档位与计算失败的指标。
pub(crate) fn data_notes(out: &mut String, a: &AnalysisFrame, symbol: &str) -> fmt::Result {
    header(out, "[数据说明] 7. 数据说明")?;
    let p = &a.profile;
    writeln!(
        out,
        "* 数据来源: Binance {} {}数据，共 {} 根K线",
        symbol,
        a.timeframe.display_name(),
        a.len()
    )?;
    writeln!(out, "* 参数档位:")?;
    writeln!(out, "  - 均线: MA{}/MA{}/MA{}", p.ma_short, p.ma_medium(), p.ma_long)?;
    writeln!(out, "  - MACD: {}/{}/{}", p.macd_fast, p.macd_slow, p.macd_signal)?;
    writeln!(out, "  - RSI: {}", p.rsi_period)?;
    writeln!(out, "  - 布林带: {}周期, {}倍标准差", p.bb_period, p.bb_std_dev)?;
    writeln!(out, "  - 随机指标: {}/{}/{}", p.stoch_fastk, p.stoch_slowk, p.stoch_slowd)?;
    writeln!(out, "  - ATR/ADX: {}/{}", p.atr_period, p.adx_period)?;
    writeln!(out, "  - 斐波那契回看: {}", p.fib_lookback)?;
    if a.failures.is_empty() {
        writeln!(out, "* 全部指标计算成功")?;
    } else {
        writeln!(out, "* 以下指标计算失败，相关列为空:")?;
        for failure in &a.failures {
            writeln!(out, "  - {}: {}", failure.indicator, failure.reason)?;
        }
    }
    Ok(())
}
