//! # Console Reporting Module / 控制台报告模块
//!
//! Formats the lines of a run. The format is line-oriented and stable so that
//! external tools can parse the stream between the two sentinel lines:
//!
//! 格式化一次运行输出的各行。该格式面向行且保持稳定，
//! 以便外部工具可以解析两条哨兵行之间的输出流：
//!
//! ```text
//! START TESTS
//! Filtering tests to: Alpha
//! 2024-05-01 12:00:00
//! - Test: app::Alpha: 3/3
//! ! Test: app::Beta: 1/2
//! expected 2, got 3
//! caused by: ...
//! END TESTS
//! ```

use anyhow::{Result, bail};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use std::fmt::Write;

use crate::core::models::{CapturedError, FailureDetail, SuiteReport};

pub const START_SENTINEL: &str = "START TESTS";
pub const END_SENTINEL: &str = "END TESTS";
/// Prefix of a suite whose checks all passed.
pub const PASS_MARKER: &str = "-";
/// Prefix of a suite with at least one failed check.
pub const FAIL_MARKER: &str = "!";
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn filter_line(pattern: &str) -> String {
    format!("Filtering tests to: {pattern}")
}

/// Formats the run's start time. A format chrono rejects falls back to
/// [`DEFAULT_TIMESTAMP_FORMAT`].
pub fn timestamp_line(time: &DateTime<Local>, format: &str) -> String {
    let mut line = String::new();
    if write!(line, "{}", time.format(format)).is_err() {
        line = time.format(DEFAULT_TIMESTAMP_FORMAT).to_string();
    }
    line
}

/// Checks that `format` is a chrono `strftime` format.
///
/// 检查 `format` 是否为合法的 chrono `strftime` 格式。
pub fn validate_timestamp_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        bail!("'{format}' is not a valid strftime format");
    }
    Ok(())
}

/// `<marker> Test: <name>: <passed>/<total>`
pub fn summary_line(suite: &SuiteReport) -> String {
    let marker = if suite.is_passed() {
        PASS_MARKER
    } else {
        FAIL_MARKER
    };
    format!(
        "{marker} Test: {}: {}/{}",
        suite.name, suite.passed, suite.total
    )
}

/// The message line followed by one line per trace entry.
pub fn failure_lines(failure: &FailureDetail) -> Vec<String> {
    error_lines(&failure.error)
}

pub fn error_lines(error: &CapturedError) -> Vec<String> {
    std::iter::once(error.message.clone())
        .chain(error.trace.iter().cloned())
        .collect()
}
