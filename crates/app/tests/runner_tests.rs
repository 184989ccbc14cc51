use chrono::{Duration, TimeZone, Utc};
use klinesight_app::error::AppError;
use klinesight_app::runner::AnalysisRunner;
use klinesight_core::common::TimeFrame;
use klinesight_core::common::time::FixedClock;
use klinesight_core::config::AppConfig;
use klinesight_core::market::entity::PriceBar;
use klinesight_core::market::error::MarketError;
use klinesight_core::market::mock::StaticProvider;
use klinesight_core::store::port::ArtifactStore;
use klinesight_store::csv_store::CsvArtifactStore;
use std::sync::Arc;

fn bars(n: usize) -> Vec<PriceBar> {
    let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let c = 95000.0 + (i as f64 * 0.2).cos() * 1200.0 + i as f64 * 8.0;
            PriceBar {
                open_time: t0 + Duration::hours(i as i64),
                open: c - 30.0,
                high: c + 120.0,
                low: c - 120.0,
                close: c,
                volume: 900.0 + (i % 6) as f64 * 70.0,
            }
        })
        .collect()
}

fn runner(
    provider: StaticProvider,
    store: Arc<CsvArtifactStore>,
    config: AppConfig,
) -> AnalysisRunner {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap());
    AnalysisRunner::new(config, Arc::new(provider), store, Arc::new(clock))
}

/// # Summary
/// 在线模式：抓取 → 保存原始数据 → 分析 → 写出指标表、组合表与报告。
#[tokio::test]
async fn test_fetch_run_writes_all_artifacts() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = Arc::new(CsvArtifactStore::with_dir(dir.path().to_path_buf())?);
    let mut config = AppConfig::default();
    config.exchange.limit = 150;

    let summary = runner(StaticProvider::new(bars(200)), store.clone(), config)
        .run(TimeFrame::Hour1, None)
        .await?;

    assert_eq!(summary.bars, 150);
    let names: Vec<String> = summary
        .files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "BTCUSDT_1小时线原始数据_20250201.csv",
            "BTCUSDT_1小时线技术指标分析_20250201.csv",
            "BTCUSDT_1小时线组合数据_20250201.csv",
            "BTCUSDT_1小时线交易分析报告_20250201.txt",
        ]
    );
    for path in &summary.files {
        assert!(path.exists());
    }

    let indicators = store.load_table(&summary.files[1])?;
    assert_eq!(indicators.rows.len(), 150);
    let report = std::fs::read_to_string(&summary.files[3])?;
    assert!(report.contains(summary.composite.label()));
    Ok(())
}

/// # Summary
/// 离线模式：从上一次保存的原始数据重新分析，不访问行情源，也不重写原始数据。
#[tokio::test]
async fn test_offline_run_uses_local_csv() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = Arc::new(CsvArtifactStore::with_dir(dir.path().to_path_buf())?);

    let online = runner(StaticProvider::new(bars(120)), store.clone(), AppConfig::default())
        .run(TimeFrame::Hour4, None)
        .await?;
    let raw_path = online.files[0].clone();

    // 空行情源：若被调用将返回 NotFound
    let offline = runner(StaticProvider::new(Vec::new()), store, AppConfig::default())
        .run(TimeFrame::Hour4, Some(&raw_path))
        .await?;

    assert_eq!(offline.bars, 120);
    assert_eq!(offline.files.len(), 3);
    assert_eq!(offline.composite, online.composite);
    Ok(())
}

/// # Summary
/// 行情源无数据时返回市场错误，不写出任何文件。
#[tokio::test]
async fn test_empty_feed_fails() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = Arc::new(CsvArtifactStore::with_dir(dir.path().to_path_buf())?);

    let err = runner(StaticProvider::new(Vec::new()), store, AppConfig::default())
        .run(TimeFrame::Day1, None)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Market(MarketError::NotFound)));
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}
