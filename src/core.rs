//! # Core Module / 核心模块
//!
//! This module contains the core functionality of Suite Runner:
//! data models, the suite abstraction, discovery, configuration,
//! scheduling support and the execution engine.
//!
//! 此模块包含 Suite Runner 的核心功能：
//! 数据模型、套件抽象、发现、配置、调度支持以及执行引擎。

pub mod config;
pub mod discovery;
pub mod execution;
pub mod models;
pub mod schedule;
pub mod suite;

// Re-exports
pub use config::RunnerConfig;
pub use discovery::{FilterPattern, Registry, SuiteDescriptor};
pub use execution::Runner;
pub use models::Report;
pub use suite::{Check, SuiteContext, TestSuite};
