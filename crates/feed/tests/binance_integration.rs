use klinesight_core::common::TimeFrame;
use klinesight_core::market::error::MarketError;
use klinesight_core::market::port::MarketDataProvider;
use klinesight_feed::binance::BinanceProvider;
use std::time::Duration;

/// # Summary
/// Binance 真实行情获取的集成测试，需要网络，默认忽略。
///
/// # Logic
/// 1. 初始化 BinanceProvider。
/// 2. 抓取 BTCUSDT 最近 50 根 4 小时线。
/// 3. 断言数量、时间顺序与价格关系。
#[tokio::test]
#[ignore]
async fn test_binance_real_fetch() -> anyhow::Result<()> {
    let provider = BinanceProvider::new("https://fapi.binance.com", None, Duration::from_secs(10))?;
    let bars = provider.fetch_klines("BTCUSDT", TimeFrame::Hour4, 50).await?;

    assert_eq!(bars.len(), 50);
    assert!(bars.windows(2).all(|w| w[0].open_time < w[1].open_time));
    for bar in &bars {
        assert!(bar.high >= bar.low);
        assert!(bar.volume >= 0.0);
    }
    println!("Fetched {} klines, last close = {}", bars.len(), bars[49].close);
    Ok(())
}

/// # Summary
/// 无效交易对返回错误而非空列表，需要网络，默认忽略。
#[tokio::test]
#[ignore]
async fn test_binance_invalid_symbol() -> anyhow::Result<()> {
    let provider = BinanceProvider::new("https://fapi.binance.com", None, Duration::from_secs(10))?;
    let result = provider.fetch_klines("NOTASYMBOL", TimeFrame::Day1, 10).await;
    assert!(matches!(result, Err(MarketError::Unknown(_) | MarketError::Network(_))));
    Ok(())
}

/// # Summary
/// 非法的 API Key 请求头在构造时即被拒绝。
#[test]
fn test_invalid_api_key_header() {
    let result = BinanceProvider::new("https://fapi.binance.com", Some("bad\nkey"), Duration::from_secs(1));
    assert!(matches!(result, Err(MarketError::Network(_))));
}

/// # Summary
/// 不可达地址映射为网络错误。
#[tokio::test]
async fn test_unreachable_host_is_network_error() -> anyhow::Result<()> {
    let provider = BinanceProvider::new("http://127.0.0.1:9", None, Duration::from_secs(2))?;
    let result = provider.fetch_klines("BTCUSDT", TimeFrame::Hour1, 10).await;
    assert!(matches!(result, Err(MarketError::Network(_))));
    Ok(())
}
