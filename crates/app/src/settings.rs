use config::{Config, Environment, File};
use klinesight_core::config::{AppConfig, ConfigError};
use std::path::Path;
use tracing::debug;

// 未指定配置文件时尝试读取的默认文件（可不存在）
const DEFAULT_FILE: &str = "klinesight";
const ENV_PREFIX: &str = "KLINESIGHT";
const ENV_SEPARATOR: &str = "__";

/// # Summary
/// 分层加载应用配置。
///
/// # Logic
/// 1. 以 `AppConfig::default()` 为底层。
/// 2. 叠加配置文件：显式指定时必须存在，否则尝试 `klinesight.toml`。
/// 3. 叠加 `KLINESIGHT__` 前缀的环境变量，层级以 `__` 分隔。
/// 4. 反序列化并校验。
///
/// # Arguments
/// * `path`: 可选的配置文件路径。
///
/// # Returns
/// 成功返回配置，读取失败返回 `ConfigError::Load`，校验失败返回 `ConfigError::Invalid`。
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let defaults =
        Config::try_from(&AppConfig::default()).map_err(|e| ConfigError::Load(e.to_string()))?;
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_FILE).required(false),
    };

    let config: AppConfig = Config::builder()
        .add_source(defaults)
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        )
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    config.validate()?;
    debug!(symbol = %config.exchange.symbol, aggressive = config.analysis.aggressive, "config loaded");
    Ok(config)
}
