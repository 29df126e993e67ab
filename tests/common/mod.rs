// Shared suites and helpers for integration tests
#![allow(dead_code)]

use anyhow::{Result, anyhow, bail, ensure};
use suite_runner::checks;
use suite_runner::core::discovery::{Registry, SuiteDescriptor};
use suite_runner::core::execution::Runner;
use suite_runner::core::models::Report;
use suite_runner::core::suite::{Check, Suite, SuiteContext, TestSuite, instantiate};
use suite_runner::infra::args::NoArguments;
use suite_runner::infra::log::MemorySink;

/// Three passing checks.
#[derive(Default)]
pub struct Alpha;

impl Alpha {
    fn one(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        Ok(())
    }
    fn two(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        Ok(())
    }
    fn three(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        Ok(())
    }
}

impl TestSuite for Alpha {
    fn checks() -> Vec<Check<Self>> {
        checks![one, two, three]
    }

    fn name(&self) -> String {
        "Alpha".to_string()
    }
}

/// One passing and one failing check.
#[derive(Default)]
pub struct Beta;

impl Beta {
    fn passes(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        Ok(())
    }
    fn fails(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        let got = 3;
        ensure!(got == 2, "expected 2, got {got}");
        Ok(())
    }
}

impl TestSuite for Beta {
    fn checks() -> Vec<Check<Self>> {
        checks![passes, fails]
    }

    fn name(&self) -> String {
        "Beta".to_string()
    }
}

/// pass, fail, pass
#[derive(Default)]
pub struct Sandwich;

impl Sandwich {
    fn before(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        Ok(())
    }
    fn middle(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        panic!("middle check blew up");
    }
    fn after(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        Ok(())
    }
}

impl TestSuite for Sandwich {
    fn checks() -> Vec<Check<Self>> {
        checks![before, middle, after]
    }

    fn name(&self) -> String {
        "Sandwich".to_string()
    }
}

/// Panics in set-up, outside any check.
#[derive(Default)]
pub struct CrashingSetUp;

impl CrashingSetUp {
    fn unreachable(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        Ok(())
    }
}

impl TestSuite for CrashingSetUp {
    fn checks() -> Vec<Check<Self>> {
        checks![unreachable]
    }

    fn name(&self) -> String {
        "CrashingSetUp".to_string()
    }

    fn set_up(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        panic!("fixture exploded");
    }
}

/// Runs its only check, then fails in tear-down.
#[derive(Default)]
pub struct FailingTearDown;

impl FailingTearDown {
    fn runs(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        Ok(())
    }
}

impl TestSuite for FailingTearDown {
    fn checks() -> Vec<Check<Self>> {
        checks![runs]
    }

    fn name(&self) -> String {
        "FailingTearDown".to_string()
    }

    fn tear_down(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        bail!("could not release fixture")
    }
}

/// Fails through a plain `assert_eq!`.
#[derive(Default)]
pub struct Mismatch;

impl Mismatch {
    fn compares(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        let sum = 1 + 1;
        assert_eq!(sum, 3);
        Ok(())
    }
}

impl TestSuite for Mismatch {
    fn checks() -> Vec<Check<Self>> {
        checks![compares]
    }

    fn name(&self) -> String {
        "Mismatch".to_string()
    }
}

/// Fails with a two-level error chain.
#[derive(Default)]
pub struct Layered;

impl Layered {
    fn passes(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        Ok(())
    }
    fn wraps(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        Err(anyhow!("root").context("outer"))
    }
}

impl TestSuite for Layered {
    fn checks() -> Vec<Check<Self>> {
        checks![passes, wraps]
    }

    fn name(&self) -> String {
        "Layered".to_string()
    }
}

pub fn unconstructible() -> Result<Box<dyn Suite>> {
    bail!("suite has no default constructor")
}

pub fn descriptor<S: TestSuite + Default>(name: &'static str) -> SuiteDescriptor {
    SuiteDescriptor::new(name, instantiate::<S>)
}

/// The `{Alpha, Beta}` registry.
pub fn alpha_beta() -> Registry {
    Registry::new(vec![
        descriptor::<Alpha>("Alpha"),
        descriptor::<Beta>("Beta"),
    ])
}

/// Runs `registry` against a fresh memory sink without launch arguments.
pub fn run_registry(registry: &Registry, filter: Option<&str>) -> (MemorySink, Report) {
    let mut sink = MemorySink::new();
    let report = Runner::new(registry, &NoArguments, &mut sink).run_all(filter);
    (sink, report)
}

/// Buffered lines as owned strings.
pub fn texts(sink: &MemorySink) -> Vec<String> {
    sink.texts().into_iter().map(str::to_string).collect()
}
