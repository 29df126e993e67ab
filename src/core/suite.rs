//! # Test Suite Module / 测试套件模块
//!
//! A suite is a named group of checks. Implementors list their checks in
//! declaration order through [`TestSuite::checks`]; the runner wraps the suite
//! in a [`SuiteRun`], which owns the pass/fail bookkeeping and isolates every
//! check from the others: a check that returns an error or panics is recorded
//! as failed and the next check still runs.
//!
//! 套件是一组具名的检查。实现者通过 [`TestSuite::checks`] 按声明顺序列出其检查；
//! 运行器将套件包装在 [`SuiteRun`] 中，由它负责通过/失败的统计，
//! 并将每个检查彼此隔离：返回错误或发生 panic 的检查被记录为失败，
//! 下一个检查仍然会运行。

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};

use crate::core::models::{CapturedError, SuiteResults, TestCase};
use crate::infra::log::LogSink;
use crate::infra::panics;

/// Signature of a single check.
pub type CheckFn<S> = fn(&mut S, &SuiteContext<'_>) -> Result<()>;

/// A named check belonging to suite type `S`.
pub struct Check<S> {
    pub name: &'static str,
    pub func: CheckFn<S>,
}

impl<S> Check<S> {
    pub const fn new(name: &'static str, func: CheckFn<S>) -> Self {
        Self { name, func }
    }
}

/// Builds the `Vec<Check<Self>>` for a suite from a list of its method names.
///
/// ```ignore
/// impl TestSuite for Arithmetic {
///     fn checks() -> Vec<Check<Self>> {
///         checks![adds, subtracts]
///     }
/// }
/// ```
#[macro_export]
macro_rules! checks {
    ($($name:ident),* $(,)?) => {
        vec![$($crate::core::suite::Check::new(stringify!($name), Self::$name)),*]
    };
}

/// What a suite sees of the run while its checks execute.
///
/// The `debug` flag replaces a process-wide verbosity switch: batch runs always
/// hand suites a context with `debug` off.
///
/// 套件在其检查执行期间看到的运行信息。
/// `debug` 标志取代了进程级的详细程度开关：批量运行始终向套件传递关闭 `debug` 的上下文。
pub struct SuiteContext<'a> {
    sink: RefCell<&'a mut dyn LogSink>,
    debug: bool,
}

impl<'a> SuiteContext<'a> {
    pub fn new(sink: &'a mut dyn LogSink, debug: bool) -> Self {
        Self {
            sink: RefCell::new(sink),
            debug,
        }
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Emits a line only when debug output is on.
    pub fn debug(&self, line: &str) {
        if self.debug {
            self.sink.borrow_mut().log(line);
        }
    }

    pub fn log(&self, line: &str) {
        self.sink.borrow_mut().log(line);
    }

    pub fn error(&self, line: &str) {
        self.sink.borrow_mut().error(line);
    }
}

/// The trait a concrete suite implements.
///
/// Only [`TestSuite::checks`] is required. The display name defaults to the
/// fully-qualified type name.
pub trait TestSuite: Sized + Send + 'static {
    /// The suite's checks in declaration order.
    fn checks() -> Vec<Check<Self>>;

    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// Runs once before the first check. An error here escapes the suite run.
    fn set_up(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Runs once after the last check. An error here escapes the suite run.
    fn tear_down(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// The object-safe face of a suite instance, as the runner drives it.
/// 套件实例的对象安全接口，供运行器驱动。
pub trait Suite: Send {
    /// Display name used in summary lines.
    fn name(&self) -> String;

    /// Resets the results, then runs every check in order.
    ///
    /// Check failures are recorded, never returned. An `Err` means something
    /// outside the checks (set-up or tear-down) failed.
    fn run(&mut self, ctx: &SuiteContext<'_>) -> Result<()>;

    /// Results of the most recent run, possibly partial.
    fn results(&self) -> &SuiteResults;
}

/// Pairs a suite with the results of its current run.
pub struct SuiteRun<S: TestSuite> {
    suite: S,
    results: SuiteResults,
}

impl<S: TestSuite> SuiteRun<S> {
    pub fn new(suite: S) -> Self {
        Self {
            suite,
            results: SuiteResults::default(),
        }
    }

    pub fn suite(&self) -> &S {
        &self.suite
    }
}

impl<S: TestSuite> Suite for SuiteRun<S> {
    fn name(&self) -> String {
        self.suite.name()
    }

    fn run(&mut self, ctx: &SuiteContext<'_>) -> Result<()> {
        self.results.reset();

        self.suite
            .set_up(ctx)
            .with_context(|| format!("Set-up of {} failed", self.suite.name()))?;

        for check in S::checks() {
            let case = run_check(&mut self.suite, &check, ctx);
            match case.error() {
                None => ctx.debug(&format!("{}::{} passed", self.suite.name(), case.name())),
                Some(error) => ctx.debug(&format!(
                    "{}::{} failed: {}",
                    self.suite.name(),
                    case.name(),
                    error
                )),
            }
            self.results.record(case);
        }

        self.suite
            .tear_down(ctx)
            .with_context(|| format!("Tear-down of {} failed", self.suite.name()))
    }

    fn results(&self) -> &SuiteResults {
        &self.results
    }
}

/// Runs a single check inside its own isolation boundary.
///
/// 在其自身的隔离边界内运行单个检查。
pub fn run_check<S>(suite: &mut S, check: &Check<S>, ctx: &SuiteContext<'_>) -> TestCase {
    match panic::catch_unwind(AssertUnwindSafe(|| (check.func)(suite, ctx))) {
        Ok(Ok(())) => TestCase::passed(check.name),
        Ok(Err(err)) => TestCase::failed(check.name, CapturedError::from_anyhow(&err)),
        Err(payload) => TestCase::failed(
            check.name,
            CapturedError::from_panic(payload.as_ref(), panics::take_last()),
        ),
    }
}

/// Default-constructs a suite and boxes it for the runner.
pub fn instantiate<S: TestSuite + Default>() -> Result<Box<dyn Suite>> {
    Ok(Box::new(SuiteRun::new(S::default())))
}
