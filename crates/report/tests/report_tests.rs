use chrono::{Duration, TimeZone, Utc};
use klinesight_analysis::pipeline::{AnalysisFrame, analyze};
use klinesight_core::common::TimeFrame;
use klinesight_core::common::time::FixedClock;
use klinesight_core::config::AnalysisConfig;
use klinesight_core::market::entity::{PriceBar, PriceSeries};
use klinesight_report::error::ReportError;
use klinesight_report::render::ReportRenderer;
use std::sync::Arc;

fn analysis(n: usize, timeframe: TimeFrame, config: &AnalysisConfig) -> AnalysisFrame {
    let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let bars = (0..n)
        .map(|i| {
            let c = 94000.0 + (i as f64 * 0.25).sin() * 1500.0 + i as f64 * 10.0;
            PriceBar {
                open_time: t0 + Duration::seconds(timeframe.seconds() * i as i64),
                open: c - 20.0,
                high: c + 150.0,
                low: c - 150.0,
                close: c,
                volume: 1200.0 + (i % 5) as f64 * 80.0,
            }
        })
        .collect();
    analyze(PriceSeries::new(bars).unwrap(), config, timeframe).unwrap()
}

fn renderer() -> ReportRenderer {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap());
    ReportRenderer::new("BTCUSDT", Arc::new(clock))
}

/// # Summary
/// 报告包含标题行（使用注入时钟）与全部七个章节。
#[test]
fn test_report_sections() -> anyhow::Result<()> {
    let analysis = analysis(200, TimeFrame::Hour4, &AnalysisConfig::default());
    let report = renderer().render(&analysis)?;

    assert!(report.starts_with("===== BTCUSDT 4小时线 技术分析报告 2025-03-01 08:30:00 ====="));
    for title in [
        "1. 价格概览",
        "2. 关键指标分析",
        "3. 近期信号变化",
        "4. 综合分析",
        "5. 交易建议",
        "6. 斐波那契分析",
        "7. 数据说明",
    ] {
        assert!(report.contains(title), "missing section {title}");
    }

    let last = analysis.last_row().unwrap();
    let composite = analysis.signals[last].composite.label();
    assert!(report.contains(&format!("* 综合信号: {}", composite)));
    assert!(report.contains("MA20"));
    assert!(report.contains("全部指标计算成功"));
    Ok(())
}

/// # Summary
/// 近期信号只列出最后五根 K 线，最新在前。
#[test]
fn test_recent_signals_newest_first() -> anyhow::Result<()> {
    let analysis = analysis(120, TimeFrame::Hour1, &AnalysisConfig::default());
    let report = renderer().render(&analysis)?;

    let bars = analysis.series.bars();
    let newest = bars[119].open_time.format("%Y-%m-%d %H:%M").to_string();
    let fifth = bars[115].open_time.format("%Y-%m-%d %H:%M").to_string();
    let sixth = bars[114].open_time.format("%Y-%m-%d %H:%M").to_string();

    let newest_at = report.find(&format!("* {}:", newest)).unwrap();
    let fifth_at = report.find(&format!("* {}:", fifth)).unwrap();
    assert!(newest_at < fifth_at);
    assert!(!report.contains(&format!("* {}:", sixth)));
    Ok(())
}

/// # Summary
/// 历史不足时斐波那契章节给出说明，失败的指标列在数据说明中。
#[test]
fn test_short_history_and_failures() -> anyhow::Result<()> {
    let mut config = AnalysisConfig::default();
    config.profiles.m15.stoch_fastk = 0;
    let analysis = analysis(30, TimeFrame::Minute15, &config);
    let report = renderer().render(&analysis)?;

    assert!(report.contains("尚未形成斐波那契区域"));
    assert!(report.contains("以下指标计算失败"));
    assert!(report.contains("  - STOCH: "));
    assert!(report.contains("N/A"));
    Ok(())
}

/// # Summary
/// 空分析结果无法生成报告。
#[test]
fn test_empty_analysis_rejected() {
    let mut analysis = analysis(60, TimeFrame::Hour4, &AnalysisConfig::default());
    analysis.series = PriceSeries::default();

    let err = renderer().render(&analysis).unwrap_err();
    assert!(matches!(err, ReportError::EmptyAnalysis));
}
