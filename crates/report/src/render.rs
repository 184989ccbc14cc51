use crate::error::ReportError;
use crate::sections;
use klinesight_analysis::pipeline::AnalysisFrame;
use klinesight_core::common::time::Clock;
use std::fmt::Write;
use std::sync::Arc;
use tracing::debug;

/// # Summary
/// 文本交易分析报告渲染器。
///
/// # Invariants
/// - 报告生成时间只通过注入的 `Clock` 获取。
pub struct ReportRenderer {
    symbol: String,
    clock: Arc<dyn Clock>,
}

impl ReportRenderer {
    pub fn new(symbol: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            symbol: symbol.into(),
            clock,
        }
    }

    /// # Summary
    /// 渲染完整报告。
    ///
    /// # Logic
    /// 1. 写入标题行（交易对、周期、生成时间）。
    /// 2. 依次写入价格概览、关键指标、近期信号、综合分析、交易建议、斐波那契分析与数据说明。
    ///
    /// # Arguments
    /// * `analysis`: 分析结果，以最后一根 K 线为当前状态。
    ///
    /// # Returns
    /// 报告文本；分析结果为空时返回 `ReportError::EmptyAnalysis`。
    pub fn render(&self, analysis: &AnalysisFrame) -> Result<String, ReportError> {
        let last = analysis.last_row().ok_or(ReportError::EmptyAnalysis)?;
        let mut out = String::new();
        writeln!(
            out,
            "===== {} {} 技术分析报告 {} =====",
            self.symbol,
            analysis.timeframe.display_name(),
            self.clock.now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(out)?;

        sections::price_overview(&mut out, analysis, last)?;
        sections::key_indicators(&mut out, analysis, last)?;
        sections::recent_signals(&mut out, analysis)?;
        sections::comprehensive(&mut out, analysis, last)?;
        sections::recommendation(&mut out, analysis, last)?;
        sections::fibonacci(&mut out, analysis, last)?;
        sections::data_notes(&mut out, analysis, &self.symbol)?;

        debug!(symbol = %self.symbol, chars = out.len(), "report rendered");
        Ok(out)
    }
}
