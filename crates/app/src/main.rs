use clap::Parser;
use klinesight_app::cli::Cli;
use klinesight_app::runner::AnalysisRunner;
use klinesight_app::settings::load_config;
use klinesight_core::common::time::SystemClock;
use klinesight_feed::binance::BinanceProvider;
use klinesight_store::config::set_root_dir;
use klinesight_store::csv_store::CsvArtifactStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

// 日志文件前缀，位于数据目录的 logs 子目录下
const LOG_FILE: &str = "klinesight.log";

/// # Summary
/// 初始化全局日志：控制台输出 + 按天滚动的文件输出。
///
/// # Returns
/// 文件写入线程的守卫，需在 main 结束前保持存活。
fn init_logging(data_dir: &str) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(PathBuf::from(data_dir).join("logs"), LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
    guard
}

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化具体实现组件并通过 Arc<dyn Trait> 注入到 AnalysisRunner。
///
/// # Logic
/// 1. 解析命令行并分层加载配置。
/// 2. 初始化全局日志。
/// 3. 实例化基础设施层（Feed、Store、Clock）。
/// 4. 执行一次分析运行并输出产物路径。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 配置
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    cli.apply(&mut config);

    // 2. 日志
    let _guard = init_logging(&config.storage.data_dir);
    info!(symbol = %config.exchange.symbol, timeframe = %cli.timeframe, "KlineSight starting...");

    // 3. 基础设施层
    set_root_dir(PathBuf::from(&config.storage.data_dir));
    let store = Arc::new(CsvArtifactStore::new()?);
    let provider = Arc::new(BinanceProvider::new(
        &config.exchange.base_url,
        config.exchange.api_key.as_deref(),
        Duration::from_secs(config.exchange.timeout_secs),
    )?);
    let clock = Arc::new(SystemClock);

    // 4. 运行
    let runner = AnalysisRunner::new(config, provider, store, clock);
    let summary = runner.run(cli.timeframe, cli.input.as_deref()).await?;

    println!("{} 根K线，综合信号: {}", summary.bars, summary.composite.label());
    for file in &summary.files {
        println!("  {}", file.display());
    }
    Ok(())
}
