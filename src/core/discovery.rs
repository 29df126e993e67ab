//! # Suite Discovery Module / 套件发现模块
//!
//! Suites make themselves discoverable by registering a [`SuiteDescriptor`]:
//! statically with [`register_suite!`](crate::register_suite), which goes
//! through `inventory`, or at runtime with [`register`]. Discovery filters the
//! registered descriptors by name and instantiates one fresh suite per match.
//!
//! 套件通过注册 [`SuiteDescriptor`] 使自己可被发现：
//! 使用 [`register_suite!`](crate::register_suite) 静态注册（通过 `inventory`），
//! 或使用 [`register`] 在运行时注册。发现过程按名称过滤已注册的描述符，
//! 并为每个匹配项实例化一个新的套件。

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::sync::{Mutex, PoisonError};

use crate::core::suite::{self, Suite, TestSuite};

/// Builds a fresh, not-yet-run suite instance.
pub type SuiteFactory = fn() -> Result<Box<dyn Suite>>;

/// A discoverable suite: its fully-qualified name and how to build it.
/// 一个可被发现的套件：其完全限定名称以及构建方式。
#[derive(Clone)]
pub struct SuiteDescriptor {
    name: Cow<'static, str>,
    factory: SuiteFactory,
}

impl SuiteDescriptor {
    pub const fn new(name: &'static str, factory: SuiteFactory) -> Self {
        Self {
            name: Cow::Borrowed(name),
            factory,
        }
    }

    /// A descriptor named after the suite's type, built through `Default`.
    pub fn of<S: TestSuite + Default>() -> Self {
        Self::new(std::any::type_name::<S>(), suite::instantiate::<S>)
    }

    /// A descriptor with an owned name, for suites registered at runtime.
    pub fn named(name: impl Into<String>, factory: SuiteFactory) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            factory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instantiate(&self) -> Result<Box<dyn Suite>> {
        (self.factory)()
    }
}

impl std::fmt::Debug for SuiteDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

inventory::collect!(SuiteDescriptor);

/// Registers a `TestSuite + Default` type for discovery at link time.
///
/// The descriptor is named `module_path!()::Type`.
#[macro_export]
macro_rules! register_suite {
    ($suite:ident) => {
        $crate::inventory::submit! {
            $crate::core::discovery::SuiteDescriptor::new(
                concat!(module_path!(), "::", stringify!($suite)),
                $crate::core::suite::instantiate::<$suite>,
            )
        }
    };
}

static RUNTIME_SUITES: Lazy<Mutex<Vec<SuiteDescriptor>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Registers a descriptor at runtime. It shows up in every later
/// [`Registry::global`] snapshot.
pub fn register(descriptor: SuiteDescriptor) {
    RUNTIME_SUITES
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(descriptor);
}

/// The set of suite descriptors discovery draws from.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    descriptors: Vec<SuiteDescriptor>,
}

impl Registry {
    /// A registry holding exactly `descriptors`, in the given order.
    pub fn new(descriptors: Vec<SuiteDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Snapshot of every statically and runtime-registered suite, sorted by
    /// name, each name appearing once.
    ///
    /// 所有静态注册和运行时注册的套件的快照，按名称排序，每个名称只出现一次。
    pub fn global() -> Self {
        let mut descriptors: Vec<SuiteDescriptor> =
            inventory::iter::<SuiteDescriptor>.into_iter().cloned().collect();
        descriptors.extend(
            RUNTIME_SUITES
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .cloned(),
        );
        descriptors.sort_by(|a, b| a.name().cmp(b.name()));
        descriptors.dedup_by(|a, b| a.name() == b.name());
        Self { descriptors }
    }

    pub fn descriptors(&self) -> &[SuiteDescriptor] {
        &self.descriptors
    }

    /// Descriptors whose name the filter accepts, in registry order.
    pub fn matching<'a>(
        &'a self,
        filter: &'a FilterPattern,
    ) -> impl Iterator<Item = &'a SuiteDescriptor> + 'a {
        self.descriptors
            .iter()
            .filter(move |descriptor| filter.matches(descriptor.name()))
    }
}

/// An optional regular expression over fully-qualified suite names.
/// Absent or empty means every suite matches.
///
/// 针对完全限定套件名称的可选正则表达式。缺失或为空表示所有套件都匹配。
#[derive(Debug, Clone, Default)]
pub struct FilterPattern {
    regex: Option<Regex>,
}

impl FilterPattern {
    /// Matches everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn parse(pattern: Option<&str>) -> Result<Self> {
        let regex = match pattern {
            Some(p) if !p.is_empty() => Some(
                Regex::new(p).with_context(|| format!("Invalid filter pattern '{p}'"))?,
            ),
            _ => None,
        };
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> Option<&str> {
        self.regex.as_ref().map(Regex::as_str)
    }

    /// Unanchored match, so `Alpha` accepts `my_crate::suites::Alpha`.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.as_ref().is_none_or(|regex| regex.is_match(name))
    }
}

/// A descriptor whose factory failed.
#[derive(Debug)]
pub struct InstantiationFailure {
    pub name: String,
    pub error: anyhow::Error,
}

/// The outcome of discovery: suites ready to run, in registry order, plus
/// any suites that matched but could not be built.
#[derive(Default)]
pub struct Discovery {
    pub suites: Vec<Box<dyn Suite>>,
    pub failures: Vec<InstantiationFailure>,
}

/// Instantiates one fresh suite per matching descriptor.
///
/// 为每个匹配的描述符实例化一个新的套件。
pub fn discover(registry: &Registry, filter: &FilterPattern) -> Discovery {
    let mut discovery = Discovery::default();
    for descriptor in registry.matching(filter) {
        match descriptor.instantiate() {
            Ok(suite) => discovery.suites.push(suite),
            Err(error) => discovery.failures.push(InstantiationFailure {
                name: descriptor.name().to_string(),
                error,
            }),
        }
    }
    discovery
}
