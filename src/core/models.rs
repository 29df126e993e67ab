//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout the suite runner.
//! It includes the record of a single check's outcome, the error captured from a
//! failing check, the per-suite bookkeeping and the aggregate report of a run.
//!
//! 此模块定义了整个套件运行器中使用的核心数据结构。
//! 它包括单个检查结果的记录、从失败检查中捕获的错误、
//! 每个套件的统计信息以及一次运行的汇总报告。

use chrono::{DateTime, Local};
use std::any::Any;
use std::backtrace::BacktraceStatus;
use std::fmt;

use crate::infra::panics::PanicSite;

/// An error captured from a failing check, kept in a printable form.
/// The message is a single line; the trace may span any number of lines.
///
/// 从失败检查中捕获的错误，以可打印的形式保存。
/// 消息为单行；跟踪信息可以跨越任意多行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedError {
    /// Human-readable message / 人类可读的消息
    pub message: String,
    /// Trace lines, possibly empty / 跟踪行，可能为空
    pub trace: Vec<String>,
}

impl CapturedError {
    /// Creates a captured error from a message and a multi-line trace text.
    /// An empty trace text produces zero trace lines. Only the first line of
    /// `message` is kept as the message; the rest leads the trace.
    pub fn new(message: impl Into<String>, trace: &str) -> Self {
        let (message, mut lines) = split_message(&message.into());
        lines.extend(split_trace(trace));
        Self {
            message,
            trace: lines,
        }
    }

    /// Creates a captured error without any trace information.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self::new(message, "")
    }

    /// Captures an `anyhow::Error`. The trace holds the cause chain followed by
    /// the backtrace frames, if a backtrace was captured.
    ///
    /// 捕获 `anyhow::Error`。跟踪信息包含错误原因链，
    /// 如果捕获了回溯，则随后是回溯帧。
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let (message, mut trace) = split_message(&err.to_string());
        for cause in err.chain().skip(1) {
            trace.extend(split_trace(&format!("caused by: {cause}")));
        }

        let backtrace = err.backtrace();
        if backtrace.status() == BacktraceStatus::Captured {
            trace.extend(split_trace(&backtrace.to_string()));
        }

        Self { message, trace }
    }

    /// Captures the payload of a caught panic, plus where it happened when the
    /// panic was raised under [`crate::infra::panics::capture`].
    ///
    /// 捕获已捕获 panic 的载荷；若 panic 发生在捕获作用域内，还包括其发生位置。
    pub fn from_panic(payload: &(dyn Any + Send), site: Option<PanicSite>) -> Self {
        let (message, mut trace) = split_message(&panic_message(payload));
        if let Some(site) = site {
            trace.extend(site.lines());
        }
        Self { message, trace }
    }

    /// Prepends `prefix` to the message line.
    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.message = format!("{prefix}{}", self.message);
        self
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Extracts the message carried by a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked with a non-string payload".to_string()
    }
}

/// First line as the message, remaining non-empty lines as trace.
fn split_message(text: &str) -> (String, Vec<String>) {
    let mut lines = text.lines();
    let message = lines.next().unwrap_or_default().trim_end().to_string();
    (message, split_trace(&lines.collect::<Vec<_>>().join("\n")))
}

fn split_trace(trace: &str) -> Vec<String> {
    trace
        .lines()
        .map(|line| line.trim_end().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// The outcome of a single check.
/// 单个检查的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The check completed without raising a failure signal.
    /// 检查完成且未发出失败信号。
    Passed,
    /// The check raised a failure signal.
    /// 检查发出了失败信号。
    Failed(CapturedError),
}

/// Represents one invocation of a single check within a suite.
/// Immutable once recorded.
///
/// 表示套件中单个检查的一次调用。
/// 一旦记录即不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    name: String,
    outcome: Outcome,
}

impl TestCase {
    /// Creates a passed case.
    pub fn passed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Passed,
        }
    }

    /// Creates a failed case carrying the captured error.
    pub fn failed(name: impl Into<String>, error: CapturedError) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Failed(error),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn is_passed(&self) -> bool {
        matches!(self.outcome, Outcome::Passed)
    }

    /// Gets the captured error. Returns `None` for passed cases.
    /// 获取捕获的错误。对于通过的用例返回 `None`。
    pub fn error(&self) -> Option<&CapturedError> {
        match &self.outcome {
            Outcome::Passed => None,
            Outcome::Failed(error) => Some(error),
        }
    }
}

/// The bookkeeping a suite owns for one run: how many checks were attempted,
/// and the ordered partition of recorded cases into passed and failed.
///
/// 套件在一次运行中拥有的统计信息：尝试了多少个检查，
/// 以及已记录用例按顺序划分为通过和失败两部分。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteResults {
    total: usize,
    passed: Vec<TestCase>,
    failed: Vec<TestCase>,
}

impl SuiteResults {
    /// Clears all counts. Called at the start of every run.
    pub fn reset(&mut self) {
        self.total = 0;
        self.passed.clear();
        self.failed.clear();
    }

    /// Records a case, keeping `total == passed + failed`.
    pub fn record(&mut self, case: TestCase) {
        self.total += 1;
        if case.is_passed() {
            self.passed.push(case);
        } else {
            self.failed.push(case);
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn passed(&self) -> &[TestCase] {
        &self.passed
    }

    pub fn failed(&self) -> &[TestCase] {
        &self.failed
    }

    /// A suite is green when every attempted check passed.
    pub fn all_passed(&self) -> bool {
        self.passed.len() == self.total
    }
}

/// One failed case as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetail {
    /// Display name of the suite the case belongs to / 用例所属套件的显示名称
    pub suite: String,
    /// Name of the failed check / 失败检查的名称
    pub case: String,
    /// The captured error / 捕获的错误
    pub error: CapturedError,
}

/// The state a single suite reached during a run.
/// 单个套件在一次运行中达到的状态。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteReport {
    pub name: String,
    pub passed: usize,
    pub total: usize,
    pub failures: Vec<FailureDetail>,
}

impl SuiteReport {
    /// Snapshots a suite's results under its display name.
    pub fn from_results(name: &str, results: &SuiteResults) -> Self {
        let failures = results
            .failed()
            .iter()
            .filter_map(|case| {
                case.error().map(|error| FailureDetail {
                    suite: name.to_string(),
                    case: case.name().to_string(),
                    error: error.clone(),
                })
            })
            .collect();

        Self {
            name: name.to_string(),
            passed: results.passed().len(),
            total: results.total(),
            failures,
        }
    }

    pub fn is_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// The aggregate of one `run_all` invocation. Built fresh per run and
/// discarded once logged.
///
/// 一次 `run_all` 调用的汇总。每次运行都会重新构建，记录后即丢弃。
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Wall-clock time the suites started running, if the run got that far.
    pub started_at: Option<DateTime<Local>>,
    /// The effective filter pattern / 生效的过滤模式
    pub filter: Option<String>,
    /// Suites in discovery order / 按发现顺序排列的套件
    pub suites: Vec<SuiteReport>,
    /// Errors caught at the suite or outermost boundary / 在套件或最外层边界捕获的错误
    pub errors: Vec<String>,
    /// Total checks attempted across all suites / 所有套件中尝试的检查总数
    pub attempted: usize,
}

impl Report {
    /// All failures across all suites, in discovery then recorded order.
    pub fn failures(&self) -> impl Iterator<Item = &FailureDetail> {
        self.suites.iter().flat_map(|suite| suite.failures.iter())
    }

    /// `true` when every suite passed and no error was caught.
    pub fn all_passed(&self) -> bool {
        self.errors.is_empty() && self.suites.iter().all(SuiteReport::is_passed)
    }
}
