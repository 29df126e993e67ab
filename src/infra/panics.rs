//! # Panic Capture Module / Panic 捕获模块
//!
//! While a [`CaptureScope`] is alive on a thread, panics raised on that thread
//! are not printed by the panic hook. Their location and backtrace are kept
//! instead, so the runner can report them through its log sink next to the
//! panic message. Threads without a live scope keep the previous hook.
//!
//! 当某个线程上存在 [`CaptureScope`] 时，该线程上的 panic 不会由 panic 钩子打印，
//! 而是保存其位置和回溯，以便运行器通过日志输出器将其与 panic 消息一并报告。
//! 没有活动作用域的线程保持原有的钩子。

use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::panic::{self, PanicHookInfo};
use std::sync::Once;

static INSTALL_HOOK: Once = Once::new();

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    static LAST_SITE: RefCell<Option<PanicSite>> = const { RefCell::new(None) };
}

/// Where a captured panic happened.
/// 捕获的 panic 发生的位置。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanicSite {
    /// `file:line:column`
    pub location: Option<String>,
    /// Backtrace lines; empty unless `RUST_BACKTRACE` enables capture.
    pub backtrace: Vec<String>,
}

impl PanicSite {
    /// `at <location>` followed by the backtrace lines.
    pub fn lines(&self) -> Vec<String> {
        self.location
            .iter()
            .map(|location| format!("at {location}"))
            .chain(self.backtrace.iter().cloned())
            .collect()
    }
}

/// Keeps panic capture enabled on the current thread until dropped.
/// Scopes nest.
pub struct CaptureScope {
    // Must be dropped on the thread that created it.
    _not_send: PhantomData<*const ()>,
}

/// Enables panic capture on the current thread.
///
/// 在当前线程上启用 panic 捕获。
pub fn capture() -> CaptureScope {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if is_capturing() {
                record(info);
            } else {
                previous(info);
            }
        }));
    });

    DEPTH.with(|depth| {
        if depth.get() == 0 {
            LAST_SITE.with_borrow_mut(|site| *site = None);
        }
        depth.set(depth.get() + 1);
    });
    CaptureScope {
        _not_send: PhantomData,
    }
}

impl Drop for CaptureScope {
    fn drop(&mut self) {
        DEPTH.with(|depth| {
            depth.set(depth.get().saturating_sub(1));
            if depth.get() == 0 {
                LAST_SITE.with_borrow_mut(|site| *site = None);
            }
        });
    }
}

pub fn is_capturing() -> bool {
    DEPTH.with(Cell::get) > 0
}

/// Takes the site of the most recent captured panic on this thread.
pub fn take_last() -> Option<PanicSite> {
    LAST_SITE.with_borrow_mut(Option::take)
}

fn record(info: &PanicHookInfo<'_>) {
    let backtrace = Backtrace::capture();
    let site = PanicSite {
        location: info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column())),
        backtrace: if backtrace.status() == BacktraceStatus::Captured {
            backtrace
                .to_string()
                .lines()
                .map(|line| line.trim_end().to_string())
                .filter(|line| !line.is_empty())
                .collect()
        } else {
            Vec::new()
        },
    };
    LAST_SITE.with_borrow_mut(|last| *last = Some(site));
}
