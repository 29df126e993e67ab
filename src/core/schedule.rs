//! # Scheduling Module / 调度模块
//!
//! Support for hosts that re-run the suites periodically. [`Schedule`] turns
//! elapsed-time ticks into "run now" decisions; [`RunGuard`] makes sure two
//! runs never overlap.
//!
//! 为定期重新运行套件的宿主提供支持。[`Schedule`] 将经过时间的滴答转换为
//! “立即运行”的决定；[`RunGuard`] 确保两次运行永不重叠。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Accumulates elapsed time and reports when the interval has been exceeded.
#[derive(Debug, Clone)]
pub struct Schedule {
    interval: Duration,
    enabled: bool,
    elapsed: Duration,
}

impl Schedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            enabled: true,
            elapsed: Duration::ZERO,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// `true` when `advance` can ever report a run as due.
    pub fn is_repeating(&self) -> bool {
        self.enabled && !self.interval.is_zero()
    }

    /// Adds `delta` to the elapsed time. Returns `true` once the elapsed time
    /// exceeds the interval, and starts counting from zero again.
    pub fn advance(&mut self, delta: Duration) -> bool {
        if !self.is_repeating() {
            return false;
        }
        self.elapsed += delta;
        if self.elapsed > self.interval {
            self.elapsed = Duration::ZERO;
            true
        } else {
            false
        }
    }
}

/// A shared "run in progress" flag.
///
/// 共享的“运行进行中”标志。
#[derive(Debug, Clone, Default)]
pub struct RunGuard {
    running: Arc<AtomicBool>,
}

impl RunGuard {
    /// Claims the guard. Returns `None` while another permit is alive.
    pub fn try_begin(&self) -> Option<RunPermit> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunPermit {
                running: Arc::clone(&self.running),
            })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Releases the guard when dropped.
#[derive(Debug)]
pub struct RunPermit {
    running: Arc<AtomicBool>,
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_fires_after_interval_is_exceeded() {
        let mut schedule = Schedule::new(Duration::from_secs(1));
        assert!(!schedule.advance(Duration::from_millis(600)));
        assert!(!schedule.advance(Duration::from_millis(400)));
        assert!(schedule.advance(Duration::from_millis(1)));
        // elapsed restarted from zero
        assert!(!schedule.advance(Duration::from_millis(999)));
    }

    #[test]
    fn test_schedule_without_interval_or_disabled_never_fires() {
        let mut schedule = Schedule::new(Duration::ZERO);
        assert!(!schedule.is_repeating());
        assert!(!schedule.advance(Duration::from_secs(100)));

        let mut schedule = Schedule::new(Duration::from_millis(10));
        schedule.set_enabled(false);
        assert!(!schedule.advance(Duration::from_secs(100)));
        schedule.set_enabled(true);
        assert!(schedule.advance(Duration::from_secs(100)));
    }

    #[test]
    fn test_guard_excludes_overlapping_runs() {
        let guard = RunGuard::default();
        let permit = guard.try_begin().unwrap();
        assert!(guard.is_running());
        assert!(guard.clone().try_begin().is_none());

        drop(permit);
        assert!(!guard.is_running());
        assert!(guard.try_begin().is_some());
    }
}
