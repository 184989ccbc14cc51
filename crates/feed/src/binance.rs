use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use klinesight_core::common::TimeFrame;
use klinesight_core::market::entity::PriceBar;
use klinesight_core::market::error::MarketError;
use klinesight_core::market::port::MarketDataProvider;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

// 单次请求允许的最大 K 线数量
const MAX_LIMIT: usize = 1500;
const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// # Summary
/// Binance U 本位合约行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯。
/// - 只访问公开 K 线接口，API Key 仅作为请求头附带。
#[derive(Clone)]
pub struct BinanceProvider {
    // 内部使用的 HTTP 客户端
    client: Client,
    // 接口根地址，例如 https://fapi.binance.com
    base_url: String,
}

impl BinanceProvider {
    /// # Summary
    /// 创建一个新的 BinanceProvider 实例。
    ///
    /// # Logic
    /// 1. 确保进程内已安装 rustls 加密后端。
    /// 2. 配置了 API Key 时写入默认请求头。
    /// 3. 按超时时间初始化 reqwest 客户端。
    ///
    /// # Arguments
    /// * `base_url`: 接口根地址。
    /// * `api_key`: 可选的 API Key。
    /// * `timeout`: 请求超时。
    ///
    /// # Returns
    /// 成功返回 BinanceProvider，请求头非法或客户端构建失败返回 `MarketError::Network`。
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, MarketError> {
        install_crypto_provider();

        let mut headers = HeaderMap::new();
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key)
                .map_err(|e| MarketError::Network(format!("invalid api key header: {}", e)))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| MarketError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

fn install_crypto_provider() {
    if rustls::crypto::CryptoProvider::get_default().is_none()
        && rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
    {
        debug!("rustls crypto provider already installed by another caller");
    }
}

/// 将周期映射为 Binance 的 interval 参数
fn interval(timeframe: TimeFrame) -> &'static str {
    match timeframe {
        TimeFrame::Minute5 => "5m",
        TimeFrame::Minute15 => "15m",
        TimeFrame::Hour1 => "1h",
        TimeFrame::Hour4 => "4h",
        TimeFrame::Day1 => "1d",
    }
}

/// # Summary
/// Binance 错误响应体。
#[derive(Deserialize, Debug)]
struct BinanceError {
    code: i64,
    msg: String,
}

fn number(row: &[Value], idx: usize) -> Result<f64, MarketError> {
    let cell = row
        .get(idx)
        .ok_or_else(|| MarketError::Parse(format!("kline field {} missing", idx)))?;
    match cell {
        Value::String(s) => s
            .parse::<f64>()
            .map_err(|e| MarketError::Parse(format!("kline field {}: {}", idx, e))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| MarketError::Parse(format!("kline field {} out of range", idx))),
        other => Err(MarketError::Parse(format!("kline field {}: unexpected {}", idx, other))),
    }
}

fn open_time(row: &[Value]) -> Result<DateTime<Utc>, MarketError> {
    let ms = row
        .first()
        .and_then(Value::as_i64)
        .ok_or_else(|| MarketError::Parse("kline open time missing".into()))?;
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| MarketError::Parse(format!("invalid open time {}", ms)))
}

/// # Summary
/// 解析 K 线数组。
///
/// # Logic
/// 1. 每行前六个字段依次为开盘时间（毫秒）、开高低收与成交量，价格与成交量为字符串。
/// 2. 其余字段（收盘时间、成交额、笔数等）忽略。
/// 3. 结果按开盘时间升序排列。
///
/// # Returns
/// 任一字段缺失或无法识别时返回 `MarketError::Parse`。
pub fn parse_klines(rows: &[Vec<Value>]) -> Result<Vec<PriceBar>, MarketError> {
    let mut bars = rows
        .iter()
        .map(|row| {
            Ok(PriceBar {
                open_time: open_time(row)?,
                open: number(row, 1)?,
                high: number(row, 2)?,
                low: number(row, 3)?,
                close: number(row, 4)?,
                volume: number(row, 5)?,
            })
        })
        .collect::<Result<Vec<_>, MarketError>>()?;
    bars.sort_by_key(|b| b.open_time);
    Ok(bars)
}

#[async_trait]
impl MarketDataProvider for BinanceProvider {
    /// # Summary
    /// 从 Binance 抓取最近的 K 线。
    ///
    /// # Logic
    /// 1. 映射周期为 interval，数量限制在 [1, 1500]。
    /// 2. 请求 `/fapi/v1/klines`。
    /// 3. 非成功状态码时尽量解析错误体。
    /// 4. 解析数组为 `PriceBar` 列表，空结果视为未找到。
    ///
    /// # Arguments
    /// * `symbol`: 交易对，例如 BTCUSDT。
    /// * `timeframe`: 周期。
    /// * `limit`: 数量。
    ///
    /// # Returns
    /// 成功返回按时间升序的 K 线列表，失败返回 MarketError。
    async fn fetch_klines(
        &self,
        symbol: &str,
        timeframe: TimeFrame,
        limit: usize,
    ) -> Result<Vec<PriceBar>, MarketError> {
        let url = format!("{}/fapi/v1/klines", self.base_url);
        let limit = limit.clamp(1, MAX_LIMIT).to_string();
        debug!(symbol, interval = interval(timeframe), %limit, "requesting klines");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", interval(timeframe)),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return match resp.json::<BinanceError>().await {
                Ok(err) => Err(MarketError::Unknown(format!("[{}] {}", err.code, err.msg))),
                Err(_) => Err(MarketError::Network(format!("HTTP {}", status))),
            };
        }

        let rows: Vec<Vec<Value>> = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;
        if rows.is_empty() {
            return Err(MarketError::NotFound);
        }

        let bars = parse_klines(&rows)?;
        info!(symbol, timeframe = %timeframe, bars = bars.len(), "klines fetched");
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_klines() {
        let body = r#"[
            [1735693200000, "94000.10", "94500.00", "93800.50", "94200.00", "1234.567", 1735696799999, "116000000.0", 52000, "600.1", "56500000.0", "0"],
            [1735689600000, "93500.00", "94100.00", "93400.00", "94000.10", "987.654", 1735693199999, "92000000.0", 48000, "500.2", "47000000.0", "0"]
        ]"#;
        let rows: Vec<Vec<Value>> = serde_json::from_str(body).unwrap();
        let bars = parse_klines(&rows).unwrap();

        assert_eq!(bars.len(), 2);
        // 乱序输入按开盘时间排序
        assert_eq!(bars[0].open_time.timestamp_millis(), 1735689600000);
        assert_eq!(bars[1].close, 94200.0);
        assert_eq!(bars[1].volume, 1234.567);
    }

    #[test]
    fn test_parse_klines_rejects_bad_field() {
        let rows: Vec<Vec<Value>> =
            serde_json::from_str(r#"[[1735689600000, "abc", "1", "1", "1", "1"]]"#).unwrap();
        assert!(matches!(parse_klines(&rows), Err(MarketError::Parse(_))));

        let rows: Vec<Vec<Value>> = serde_json::from_str(r#"[[1735689600000, "1", "1"]]"#).unwrap();
        assert!(matches!(parse_klines(&rows), Err(MarketError::Parse(_))));
    }

    #[test]
    fn test_interval_mapping() {
        assert_eq!(interval(TimeFrame::Minute15), "15m");
        assert_eq!(interval(TimeFrame::Hour4), "4h");
        assert_eq!(interval(TimeFrame::Day1), "1d");
    }
}
