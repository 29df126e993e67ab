//! # Test Execution Engine Module / 测试执行引擎模块
//!
//! This module drives a complete run: resolve the filter, discover suites, run
//! them one after another, then log a summary line per suite and the details of
//! every failed check between the `START TESTS` and `END TESTS` sentinels.
//!
//! Failures are contained at three nested boundaries. A failing check is
//! recorded by its suite (see [`crate::core::suite`]). An error or panic
//! escaping a whole suite is logged and the next suite still runs. Anything
//! escaping the run itself is logged at the outermost level, so
//! [`Runner::run_all`] never returns an error and never panics.
//!
//! 此模块驱动一次完整的运行：解析过滤模式、发现套件、逐个运行，
//! 然后在 `START TESTS` 和 `END TESTS` 哨兵行之间记录每个套件的摘要行
//! 以及每个失败检查的详情。
//!
//! 失败被限制在三层嵌套边界内。失败的检查由其套件记录。
//! 逃逸出整个套件的错误或 panic 会被记录，下一个套件仍会运行。
//! 逃逸出运行本身的任何错误都在最外层被记录，因此
//! [`Runner::run_all`] 永远不会返回错误，也不会 panic。

use anyhow::Result;
use chrono::Local;
use std::panic::{self, AssertUnwindSafe};

use crate::core::config::RunnerConfig;
use crate::core::discovery::{FilterPattern, Registry, discover};
use crate::core::models::{CapturedError, Report, SuiteReport};
use crate::core::suite::{Suite, SuiteContext};
use crate::infra::args::ArgumentSource;
use crate::infra::log::LogSink;
use crate::infra::panics;
use crate::reporting::console::{
    END_SENTINEL, START_SENTINEL, error_lines, failure_lines, filter_line, summary_line,
    timestamp_line,
};

/// Knobs of a run that come from configuration.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Launch argument consulted when no filter is supplied.
    pub filter_arg: String,
    /// chrono `strftime` format of the timestamp line.
    pub timestamp_format: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from(&RunnerConfig::default())
    }
}

impl From<&RunnerConfig> for RunOptions {
    fn from(config: &RunnerConfig) -> Self {
        Self {
            filter_arg: config.filter_arg.clone(),
            timestamp_format: config.timestamp_format.clone(),
        }
    }
}

/// Runs every discovered suite and reports through a log sink.
///
/// 运行每个已发现的套件并通过日志输出器报告。
pub struct Runner<'a> {
    registry: &'a Registry,
    args: &'a dyn ArgumentSource,
    sink: &'a mut dyn LogSink,
    options: RunOptions,
}

impl<'a> Runner<'a> {
    pub fn new(
        registry: &'a Registry,
        args: &'a dyn ArgumentSource,
        sink: &'a mut dyn LogSink,
    ) -> Self {
        Self {
            registry,
            args,
            sink,
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs all suites matching `filter`, or the launch-argument filter when
    /// `filter` is absent or empty.
    ///
    /// All output goes to the sink. The returned report mirrors what was
    /// logged; errors never propagate to the caller.
    pub fn run_all(&mut self, filter: Option<&str>) -> Report {
        let _capture = panics::capture();
        let mut report = Report::default();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.run_sequence(filter, &mut report)
        }));
        let error = match outcome {
            Ok(Ok(())) => return report,
            Ok(Err(err)) => CapturedError::from_anyhow(&err),
            Err(payload) => CapturedError::from_panic(payload.as_ref(), panics::take_last()),
        }
        .prefixed("Test run aborted: ");

        report.errors.push(error.message.clone());
        let lines = error_lines(&error);
        let sink = &mut *self.sink;
        let logged = panic::catch_unwind(AssertUnwindSafe(|| {
            for line in &lines {
                sink.error(line);
            }
            sink.log(END_SENTINEL);
        }));
        if logged.is_err() {
            for line in &lines {
                eprintln!("{line}");
            }
        }
        report
    }

    fn run_sequence(&mut self, filter: Option<&str>, report: &mut Report) -> Result<()> {
        self.sink.clear();
        self.sink.log(START_SENTINEL);

        let filter = self.resolve_filter(filter);
        if let Some(pattern) = &filter {
            self.sink.log(&filter_line(pattern));
        }
        report.filter = filter.clone();

        let pattern = FilterPattern::parse(filter.as_deref())?;
        let discovery = discover(self.registry, &pattern);

        let started_at = Local::now();
        report.started_at = Some(started_at);
        self.sink
            .log(&timestamp_line(&started_at, &self.options.timestamp_format));

        for failure in &discovery.failures {
            let error = CapturedError::from_anyhow(&failure.error)
                .prefixed(&format!("Failed to instantiate suite {}: ", failure.name));
            self.record_error(error, report);
        }

        let mut suites = discovery.suites;
        for suite in suites.iter_mut() {
            if let Err(error) = self.run_isolated(suite.as_mut()) {
                self.record_error(error, report);
            }
            report.attempted += suite.results().total();
        }

        report.suites = suites
            .iter()
            .map(|suite| SuiteReport::from_results(&suite.name(), suite.results()))
            .collect();

        for suite in &report.suites {
            self.sink.log(&summary_line(suite));
        }

        for failure in report.failures() {
            for line in failure_lines(failure) {
                self.sink.error(&line);
            }
        }

        self.sink.log(END_SENTINEL);
        Ok(())
    }

    /// Explicit filter first, then the launch argument. Empty means none.
    fn resolve_filter(&self, filter: Option<&str>) -> Option<String> {
        filter
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .or_else(|| self.args.named(&self.options.filter_arg))
            .filter(|f| !f.is_empty())
    }

    /// Runs one suite with debug output forced off. Errors and panics escaping
    /// the suite come back as a captured error naming the suite.
    fn run_isolated(&mut self, suite: &mut dyn Suite) -> Result<(), CapturedError> {
        let ctx = SuiteContext::new(&mut *self.sink, false);
        let error = match panic::catch_unwind(AssertUnwindSafe(|| suite.run(&ctx))) {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(err)) => CapturedError::from_anyhow(&err),
            Err(payload) => CapturedError::from_panic(payload.as_ref(), panics::take_last()),
        };
        Err(error.prefixed(&format!("Suite {} failed: ", suite.name())))
    }

    /// Logs the message and trace lines, and keeps the message in the report.
    fn record_error(&mut self, error: CapturedError, report: &mut Report) {
        for line in error_lines(&error) {
            self.sink.error(&line);
        }
        report.errors.push(error.message);
    }
}
