//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for Suite Runner:
//! the log sink the run writes to, the launch-argument lookup and panic capture.
//!
//! 此模块为 Suite Runner 提供基础设施服务：
//! 运行写入的日志输出器、启动参数查找以及 panic 捕获。

pub mod args;
pub mod log;
pub mod panics;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
