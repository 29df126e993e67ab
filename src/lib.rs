//! # Suite Runner Library / Suite Runner 库
//!
//! This library discovers the test suites registered in the running process,
//! optionally filters them by a name pattern, runs each of them in isolation
//! from the others' failures and reports pass/fail counts plus failure
//! diagnostics as a parseable stream of lines.
//!
//! 此库发现在运行进程中注册的测试套件，可选地按名称模式过滤，
//! 在彼此失败隔离的情况下运行每个套件，并以可解析的行流形式
//! 报告通过/失败计数以及失败诊断信息。
//!
//! ## Modules / 模块
//!
//! - `core` - Suite abstraction, discovery, configuration and the execution engine
//! - `infra` - Log sinks and launch-argument lookup
//! - `reporting` - Line formatting of a run's output
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 套件抽象、发现、配置和执行引擎
//! - `infra` - 日志输出器和启动参数查找
//! - `reporting` - 运行输出的行格式化
//! - `cli` - 命令行接口和命令
//!
//! ## Example / 示例
//!
//! ```ignore
//! use suite_runner::{checks, register_suite};
//! use suite_runner::core::{Check, SuiteContext, TestSuite};
//!
//! #[derive(Default)]
//! struct Arithmetic;
//!
//! impl Arithmetic {
//!     fn adds(&mut self, _ctx: &SuiteContext<'_>) -> anyhow::Result<()> {
//!         anyhow::ensure!(1 + 1 == 2, "addition is broken");
//!         Ok(())
//!     }
//! }
//!
//! impl TestSuite for Arithmetic {
//!     fn checks() -> Vec<Check<Self>> {
//!         checks![adds]
//!     }
//! }
//!
//! register_suite!(Arithmetic);
//! ```

pub mod core;
pub mod infra;
pub mod reporting;
pub mod cli;

// Re-export commonly used items
pub use crate::core::config;
pub use crate::core::execution;
pub use crate::core::models;

#[doc(hidden)]
pub use inventory;

/// Sets the UI language. Tries the full locale (e.g. "zh-CN"), then the
/// language code (e.g. "zh"), and finally falls back to "en".
pub fn set_language(locale: &str) {
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.contains(&locale) {
        locale
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
