use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::reporting::console::{DEFAULT_TIMESTAMP_FORMAT, validate_timestamp_format};

/// The file name `run`, `list` and `watch` look for when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "SuiteRunner.toml";

/// Represents the runner configuration, loaded from a TOML file.
/// Every field has a default, so an empty file is a valid configuration.
///
/// 代表从 TOML 文件加载的运行器配置。
/// 每个字段都有默认值，因此空文件也是有效的配置。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// The language for the runner's human-facing messages (e.g., "en", "zh-CN").
    /// Report lines are never translated.
    ///
    /// 运行器面向用户的消息语言（例如 "en", "zh-CN"）。报告行永不翻译。
    #[serde(default = "default_language")]
    pub language: String,

    /// A regular expression restricting which suites run.
    /// 限制运行哪些套件的正则表达式。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// The launch argument consulted when no filter is supplied.
    /// 未提供过滤模式时查询的启动参数。
    #[serde(default = "default_filter_arg")]
    pub filter_arg: String,

    /// Seconds between runs in watch mode. Zero or negative disables repetition.
    /// 监视模式下两次运行之间的秒数。零或负数表示不重复。
    #[serde(default)]
    pub interval_secs: f64,

    /// When `false`, watch mode runs once and never repeats.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub color: bool,

    /// Clear the terminal at the start of every run.
    #[serde(default)]
    pub clear_screen: bool,

    /// chrono `strftime` format of the timestamp line.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_filter_arg() -> String {
    "filterTests".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            filter: None,
            filter_arg: default_filter_arg(),
            interval_secs: 0.0,
            enabled: true,
            color: true,
            clear_screen: false,
            timestamp_format: default_timestamp_format(),
        }
    }
}

impl RunnerConfig {
    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        validate_timestamp_format(&config.timestamp_format).with_context(|| {
            format!("Invalid timestamp_format in config file: {}", path.display())
        })?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not exist and
    /// was not explicitly requested.
    ///
    /// 加载 `path`；当文件不存在且未被显式指定时，回退到默认值。
    pub fn load_or_default(path: &Path, explicit: bool) -> Result<Self> {
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// The watch interval. Negative or non-finite values mean "no repetition".
    pub fn interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.interval_secs).unwrap_or(Duration::ZERO)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: RunnerConfig = toml::from_str("").unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert_eq!(config.filter_arg, "filterTests");
        assert!(config.interval().is_zero());
    }

    #[test]
    fn test_interval_rejects_nonsense() {
        let mut config = RunnerConfig::default();
        config.interval_secs = 2.5;
        assert_eq!(config.interval(), Duration::from_millis(2500));
        config.interval_secs = -1.0;
        assert!(config.interval().is_zero());
        config.interval_secs = f64::NAN;
        assert!(config.interval().is_zero());
    }
}
