//! Self-check suites shipped with the binary, so `suite-runner run` has
//! something to discover out of the box.

use anyhow::{Result, ensure};
use std::time::Duration;
use suite_runner::core::discovery::{FilterPattern, Registry, SuiteDescriptor};
use suite_runner::core::execution::Runner;
use suite_runner::core::schedule::{RunGuard, Schedule};
use suite_runner::core::suite::{Check, SuiteContext, TestSuite, instantiate};
use suite_runner::infra::args::NoArguments;
use suite_runner::infra::log::MemorySink;
use suite_runner::{checks, register_suite};

#[derive(Default)]
pub struct FilterSmoke;

impl FilterSmoke {
    fn empty_pattern_matches_all(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        let filter = FilterPattern::parse(Some(""))?;
        ensure!(filter.matches("anything::at::all"), "empty filter rejected a name");
        Ok(())
    }

    fn pattern_is_unanchored(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        let filter = FilterPattern::parse(Some("Smoke"))?;
        ensure!(filter.matches("suite_runner::smoke::FilterSmoke"), "partial match failed");
        ensure!(!filter.matches("suite_runner::Other"), "unexpected match");
        Ok(())
    }

    fn invalid_pattern_is_rejected(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        ensure!(FilterPattern::parse(Some("(")).is_err(), "'(' compiled");
        Ok(())
    }
}

impl TestSuite for FilterSmoke {
    fn checks() -> Vec<Check<Self>> {
        checks![
            empty_pattern_matches_all,
            pattern_is_unanchored,
            invalid_pattern_is_rejected
        ]
    }
}

register_suite!(FilterSmoke);

/// A suite that fails on purpose; only ever run inside [`ReportSmoke`].
#[derive(Default)]
struct HalfBroken;

impl HalfBroken {
    fn passes(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        Ok(())
    }

    fn fails(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        anyhow::bail!("deliberate failure")
    }

    fn mismatches(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        let sum = 1 + 1;
        assert_eq!(sum, 3);
        Ok(())
    }
}

impl TestSuite for HalfBroken {
    fn checks() -> Vec<Check<Self>> {
        checks![passes, fails, mismatches]
    }

    fn name(&self) -> String {
        "HalfBroken".to_string()
    }
}

#[derive(Default)]
pub struct ReportSmoke;

impl ReportSmoke {
    fn nested_run_reports_partial_failure(&mut self, ctx: &SuiteContext<'_>) -> Result<()> {
        let registry = Registry::new(vec![SuiteDescriptor::new(
            "HalfBroken",
            instantiate::<HalfBroken>,
        )]);
        let mut sink = MemorySink::new();

        let report = Runner::new(&registry, &NoArguments, &mut sink).run_all(None);
        ctx.debug(&format!("nested run produced {} lines", sink.lines().len()));

        let texts = sink.texts();
        ensure!(texts.first() == Some(&"START TESTS"), "missing start sentinel");
        ensure!(texts.last() == Some(&"END TESTS"), "missing end sentinel");
        ensure!(texts.contains(&"! Test: HalfBroken: 1/3"), "missing summary line");

        let errors = sink.errors();
        ensure!(errors.first() == Some(&"deliberate failure"), "missing failure line");
        ensure!(
            errors.contains(&"panicked: assertion `left == right` failed"),
            "missing panic message line"
        );
        ensure!(
            errors.iter().all(|line| !line.contains('\n')),
            "an error line spans several lines"
        );
        ensure!(report.attempted == 3, "attempted {} checks", report.attempted);
        Ok(())
    }
}

impl TestSuite for ReportSmoke {
    fn checks() -> Vec<Check<Self>> {
        checks![nested_run_reports_partial_failure]
    }
}

register_suite!(ReportSmoke);

#[derive(Default)]
pub struct ScheduleSmoke;

impl ScheduleSmoke {
    fn interval_must_be_exceeded(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        let mut schedule = Schedule::new(Duration::from_secs(1));
        ensure!(!schedule.advance(Duration::from_secs(1)), "fired at exactly the interval");
        ensure!(schedule.advance(Duration::from_millis(1)), "did not fire past the interval");
        Ok(())
    }

    fn guard_is_exclusive(&mut self, _ctx: &SuiteContext<'_>) -> Result<()> {
        let guard = RunGuard::default();
        let _permit = guard.try_begin();
        ensure!(guard.try_begin().is_none(), "second permit granted");
        Ok(())
    }
}

impl TestSuite for ScheduleSmoke {
    fn checks() -> Vec<Check<Self>> {
        checks![interval_must_be_exceeded, guard_is_exclusive]
    }
}

register_suite!(ScheduleSmoke);
