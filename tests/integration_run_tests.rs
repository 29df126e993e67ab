//! # Run Integration Tests / 运行集成测试
//!
//! End-to-end behaviour of `Runner::run_all` against in-memory registries:
//! output layout, filtering and the three isolation boundaries.
//!
//! 针对内存注册表的 `Runner::run_all` 端到端行为：
//! 输出布局、过滤以及三层隔离边界。

mod common;

use chrono::NaiveDateTime;
use common::*;
use std::collections::HashMap;
use suite_runner::core::discovery::Registry;
use suite_runner::core::execution::Runner;
use suite_runner::infra::log::{LogSink, MemorySink};

#[test]
fn test_alpha_beta_summary_and_failure_block() {
    let (sink, report) = run_registry(&alpha_beta(), None);
    let lines = texts(&sink);

    assert_eq!(lines[0], "START TESTS");
    assert!(
        NaiveDateTime::parse_from_str(&lines[1], "%Y-%m-%d %H:%M:%S").is_ok(),
        "timestamp line was {:?}",
        lines[1]
    );
    assert_eq!(lines[2], "- Test: Alpha: 3/3");
    assert_eq!(lines[3], "! Test: Beta: 1/2");
    assert_eq!(lines[4], "expected 2, got 3");
    assert_eq!(lines.last().map(String::as_str), Some("END TESTS"));

    assert_eq!(report.suites.len(), 2);
    assert_eq!(report.failures().count(), 1);
    let failure = report.failures().next().unwrap();
    assert_eq!(failure.suite, "Beta");
    assert_eq!(failure.case, "fails");
    assert_eq!(report.attempted, 5);
    assert!(report.errors.is_empty());
    assert!(!report.all_passed());
}

#[test]
fn test_failure_trace_lines_follow_the_summaries() {
    let registry = Registry::new(vec![
        descriptor::<Alpha>("Alpha"),
        descriptor::<Layered>("Layered"),
    ]);
    let (sink, report) = run_registry(&registry, None);
    let lines = texts(&sink);

    assert_eq!(sink.errors(), vec!["outer", "caused by: root"]);
    assert_eq!(
        lines[2..],
        [
            "- Test: Alpha: 3/3",
            "! Test: Layered: 1/2",
            "outer",
            "caused by: root",
            "END TESTS",
        ]
    );
    assert_eq!(report.failures().next().unwrap().case, "wraps");
}

#[test]
fn test_assertion_panic_becomes_one_line_per_sink_entry() {
    let registry = Registry::new(vec![descriptor::<Mismatch>("Mismatch")]);
    let (sink, report) = run_registry(&registry, None);
    let errors = sink.errors();

    assert_eq!(errors[0], "panicked: assertion `left == right` failed");
    assert_eq!(errors[1], "  left: 2");
    assert_eq!(errors[2], " right: 3");
    assert!(
        errors[3].starts_with("at tests/common/mod.rs:"),
        "location line was {:?}",
        errors[3]
    );
    assert!(errors.iter().all(|line| !line.contains('\n')));

    let failure = report.failures().next().unwrap();
    assert_eq!(failure.error.message, errors[0]);
    assert_eq!(failure.error.trace.len(), errors.len() - 1);
}

#[test]
fn test_filter_alpha_discovers_only_alpha() {
    let (sink, report) = run_registry(&alpha_beta(), Some("Alpha"));
    let lines = texts(&sink);

    assert_eq!(lines[1], "Filtering tests to: Alpha");
    assert_eq!(report.suites.len(), 1);
    assert_eq!(report.suites[0].name, "Alpha");
    assert!(lines.iter().all(|line| !line.contains("Beta")));
    assert!(report.all_passed());
}

#[test]
fn test_filter_without_match_still_emits_sentinels_and_timestamp() {
    let (sink, report) = run_registry(&alpha_beta(), Some("NoMatch"));
    let lines = texts(&sink);

    assert_eq!(
        lines,
        vec![
            "START TESTS".to_string(),
            "Filtering tests to: NoMatch".to_string(),
            lines[2].clone(),
            "END TESTS".to_string(),
        ]
    );
    assert!(report.started_at.is_some());
    assert!(report.suites.is_empty());
    assert!(report.all_passed());
}

#[test]
fn test_failing_check_in_the_middle_does_not_stop_the_suite() {
    let registry = Registry::new(vec![descriptor::<Sandwich>("Sandwich")]);
    let (sink, report) = run_registry(&registry, None);

    let suite = &report.suites[0];
    assert_eq!((suite.passed, suite.total), (2, 3));
    assert_eq!(suite.failures[0].case, "middle");
    assert!(texts(&sink).contains(&"! Test: Sandwich: 2/3".to_string()));
    assert_eq!(sink.errors()[0], "panicked: middle check blew up");
}

#[test]
fn test_crashing_suite_does_not_stop_the_next_one() {
    let registry = Registry::new(vec![
        descriptor::<CrashingSetUp>("CrashingSetUp"),
        descriptor::<Alpha>("Alpha"),
    ]);
    let (sink, report) = run_registry(&registry, None);
    let lines = texts(&sink);

    assert_eq!(report.errors.len(), 1);
    assert_eq!(
        report.errors[0],
        "Suite CrashingSetUp failed: panicked: fixture exploded"
    );
    assert!(sink.errors().contains(&report.errors[0].as_str()));
    assert!(lines.contains(&"- Test: CrashingSetUp: 0/0".to_string()));
    assert!(lines.contains(&"- Test: Alpha: 3/3".to_string()));
    assert_eq!(lines.last().map(String::as_str), Some("END TESTS"));
    assert!(!report.all_passed());
}

#[test]
fn test_tear_down_failure_keeps_partial_results() {
    let registry = Registry::new(vec![descriptor::<FailingTearDown>("FailingTearDown")]);
    let (sink, report) = run_registry(&registry, None);

    assert_eq!((report.suites[0].passed, report.suites[0].total), (1, 1));
    assert_eq!(
        report.errors[0],
        "Suite FailingTearDown failed: Tear-down of FailingTearDown failed"
    );
    assert_eq!(
        &sink.errors()[..2],
        &[
            "Suite FailingTearDown failed: Tear-down of FailingTearDown failed",
            "caused by: could not release fixture",
        ]
    );
    assert!(texts(&sink).contains(&"- Test: FailingTearDown: 1/1".to_string()));
}

#[test]
fn test_instantiation_failure_is_surfaced_and_others_run() {
    let registry = Registry::new(vec![
        suite_runner::core::discovery::SuiteDescriptor::new("Ghost", unconstructible),
        descriptor::<Beta>("Beta"),
    ]);
    let (sink, report) = run_registry(&registry, None);

    assert_eq!(
        report.errors,
        vec!["Failed to instantiate suite Ghost: suite has no default constructor".to_string()]
    );
    assert_eq!(report.suites.len(), 1);
    assert!(texts(&sink).contains(&"! Test: Beta: 1/2".to_string()));
}

#[test]
fn test_every_suite_exactly_once_without_filter() {
    let registry = Registry::new(vec![
        descriptor::<Alpha>("Alpha"),
        descriptor::<Beta>("Beta"),
        descriptor::<Sandwich>("Sandwich"),
    ]);
    let (_, report) = run_registry(&registry, Some(""));

    let names: Vec<&str> = report.suites.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Beta", "Sandwich"]);
    for suite in &report.suites {
        assert_eq!(suite.total, suite.passed + suite.failures.len());
    }
}

#[test]
fn test_launch_argument_supplies_default_filter() {
    let registry = alpha_beta();
    let args: HashMap<String, String> =
        HashMap::from([("filterTests".to_string(), "^Beta$".to_string())]);
    let mut sink = MemorySink::new();

    let report = Runner::new(&registry, &args, &mut sink).run_all(None);

    assert_eq!(report.filter.as_deref(), Some("^Beta$"));
    assert_eq!(report.suites.len(), 1);
    assert_eq!(sink.texts()[1], "Filtering tests to: ^Beta$");
}

/// A sink that panics on every info line after the first few.
struct FlakySink {
    inner: MemorySink,
    budget: usize,
}

impl LogSink for FlakySink {
    fn clear(&mut self) {
        self.inner.clear();
    }

    fn log(&mut self, line: &str) {
        if self.budget == 0 {
            panic!("sink is full");
        }
        self.budget -= 1;
        self.inner.log(line);
    }

    fn error(&mut self, line: &str) {
        self.inner.error(line);
    }
}

#[test]
fn test_misbehaving_sink_never_crashes_the_caller() {
    let registry = alpha_beta();
    let mut sink = FlakySink {
        inner: MemorySink::new(),
        budget: 2,
    };

    let report = Runner::new(&registry, &suite_runner::infra::args::NoArguments, &mut sink)
        .run_all(None);

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0], "Test run aborted: panicked: sink is full");
    let errors = sink.inner.errors();
    assert_eq!(errors[0], "Test run aborted: panicked: sink is full");
    assert!(errors[1].starts_with("at tests/integration_run_tests.rs:"));
}

#[test]
fn test_repeated_runs_start_from_a_clean_slate() {
    let registry = alpha_beta();
    let mut sink = MemorySink::new();
    let first = Runner::new(&registry, &suite_runner::infra::args::NoArguments, &mut sink)
        .run_all(None);
    let second = Runner::new(&registry, &suite_runner::infra::args::NoArguments, &mut sink)
        .run_all(None);

    assert_eq!(first.suites, second.suites);
    assert_eq!(sink.texts().iter().filter(|l| **l == "START TESTS").count(), 1);
}
