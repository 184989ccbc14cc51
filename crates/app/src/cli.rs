use clap::Parser;
use klinesight_core::common::TimeFrame;
use klinesight_core::config::AppConfig;
use std::path::PathBuf;

/// BTCUSDT 技术指标分析
#[derive(Parser, Debug)]
#[command(name = "klinesight", version, about = "Kline technical indicator analysis")]
pub struct Cli {
    /// Config file (TOML); defaults to ./klinesight.toml when present
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Kline timeframe: 5m, 15m, 1h, 4h or 1d
    #[arg(short, long, default_value = "4h")]
    pub timeframe: TimeFrame,

    /// Number of klines to fetch
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Analyze a local CSV file instead of fetching from the exchange
    #[arg(short, long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Use shortened windows and wider RSI extremes
    #[arg(long)]
    pub aggressive: bool,
}

impl Cli {
    /// # Summary
    /// 命令行参数覆盖配置文件中的对应项。
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(limit) = self.limit {
            config.exchange.limit = limit;
        }
        if self.aggressive {
            config.analysis.aggressive = true;
        }
    }
}
