use crate::error::AppError;
use klinesight_analysis::export;
use klinesight_analysis::pipeline::{self, AnalysisFrame};
use klinesight_core::common::TimeFrame;
use klinesight_core::common::time::Clock;
use klinesight_core::config::AppConfig;
use klinesight_core::market::entity::PriceSeries;
use klinesight_core::market::port::MarketDataProvider;
use klinesight_core::signal::entity::CompositeSignal;
use klinesight_core::store::port::{ArtifactKind, ArtifactStore};
use klinesight_report::render::ReportRenderer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// # Summary
/// 一次运行写出的产物与最新综合信号。
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub bars: usize,
    pub composite: CompositeSignal,
    pub files: Vec<PathBuf>,
}

/// # Summary
/// 单次分析运行的编排者，依赖全部通过 trait 对象注入。
///
/// # Invariants
/// - 不感知具体的行情源与存储实现。
pub struct AnalysisRunner {
    config: AppConfig,
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<dyn ArtifactStore>,
    clock: Arc<dyn Clock>,
}

impl AnalysisRunner {
    pub fn new(
        config: AppConfig,
        provider: Arc<dyn MarketDataProvider>,
        store: Arc<dyn ArtifactStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            provider,
            store,
            clock,
        }
    }

    /// # Summary
    /// 取得行情、完成分析并写出全部产物。
    ///
    /// # Logic
    /// 1. 指定 `input` 时从本地 CSV 读取，否则从行情源抓取并保存原始数据。
    /// 2. 运行分析流程。
    /// 3. 写出技术指标表、组合表与文本报告。
    ///
    /// # Arguments
    /// * `timeframe`: K 线周期。
    /// * `input`: 可选的本地行情文件。
    ///
    /// # Returns
    /// 成功返回运行摘要。
    pub async fn run(
        &self,
        timeframe: TimeFrame,
        input: Option<&Path>,
    ) -> Result<RunSummary, AppError> {
        let symbol = self.config.exchange.symbol.as_str();
        let stamp = self.clock.date_stamp();
        let mut files = Vec::new();

        let series = match input {
            Some(path) => {
                let table = self.store.load_table(path)?;
                info!(path = %path.display(), rows = table.rows.len(), "local klines loaded");
                PriceSeries::from_table(&table)?
            }
            None => {
                let bars = self
                    .provider
                    .fetch_klines(symbol, timeframe, self.config.exchange.limit)
                    .await?;
                let series = PriceSeries::new(bars)?;
                let raw = export::raw_table(&series);
                files.push(
                    self.store
                        .save_table(&ArtifactKind::Raw.file_name(symbol, timeframe, &stamp), &raw)?,
                );
                series
            }
        };

        let analysis = pipeline::analyze(series, &self.config.analysis, timeframe)?;
        for failure in &analysis.failures {
            warn!(indicator = %failure.indicator, reason = %failure.reason, "indicator skipped");
        }
        files.extend(self.write_artifacts(&analysis, symbol, &stamp)?);

        let composite = analysis
            .last_row()
            .map_or(CompositeSignal::Neutral, |last| analysis.signals[last].composite);
        info!(symbol, timeframe = %timeframe, signal = composite.label(), "run finished");
        Ok(RunSummary {
            bars: analysis.len(),
            composite,
            files,
        })
    }

    fn write_artifacts(
        &self,
        analysis: &AnalysisFrame,
        symbol: &str,
        stamp: &str,
    ) -> Result<Vec<PathBuf>, AppError> {
        let tf = analysis.timeframe;
        let indicators = export::indicator_table(analysis, self.clock.now());
        let combined = export::combined_table(analysis);
        let report = ReportRenderer::new(symbol, self.clock.clone()).render(analysis)?;

        Ok(vec![
            self.store.save_table(
                &ArtifactKind::Indicators.file_name(symbol, tf, stamp),
                &indicators,
            )?,
            self.store
                .save_table(&ArtifactKind::Combined.file_name(symbol, tf, stamp), &combined)?,
            self.store
                .save_text(&ArtifactKind::Report.file_name(symbol, tf, stamp), &report)?,
        ])
    }
}
