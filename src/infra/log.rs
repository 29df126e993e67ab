//! # Log Sink Module / 日志输出模块
//!
//! Every line a run produces goes through a [`LogSink`]. The console sink writes
//! to stdout/stderr with optional colouring; the memory sink buffers lines for
//! hosts that want to inspect the output after the fact.
//!
//! 一次运行产生的每一行都经过 [`LogSink`]。控制台输出器写入 stdout/stderr，
//! 可选着色；内存输出器缓存各行，供需要事后检查输出的宿主使用。

use colored::*;
use std::io::Write;

use crate::reporting::console::{END_SENTINEL, FAIL_MARKER, PASS_MARKER, START_SENTINEL};

/// Severity of a logged line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

/// An append-only, line-oriented output.
/// 仅追加的、面向行的输出。
pub trait LogSink {
    /// Drops whatever the sink buffered so far.
    fn clear(&mut self);
    /// Emits an informational line.
    fn log(&mut self, line: &str);
    /// Emits an error line.
    fn error(&mut self, line: &str);
}

impl<T: LogSink + ?Sized> LogSink for Box<T> {
    fn clear(&mut self) {
        (**self).clear()
    }

    fn log(&mut self, line: &str) {
        (**self).log(line)
    }

    fn error(&mut self, line: &str) {
        (**self).error(line)
    }
}

/// Writes info lines to stdout and error lines to stderr.
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink {
    color: bool,
    clear_screen: bool,
}

impl ConsoleSink {
    pub fn new(color: bool, clear_screen: bool) -> Self {
        Self {
            color,
            clear_screen,
        }
    }

    fn paint(&self, line: &str) -> String {
        if !self.color {
            return line.to_string();
        }
        if line.starts_with(&format!("{PASS_MARKER} ")) {
            line.green().to_string()
        } else if line.starts_with(&format!("{FAIL_MARKER} ")) {
            line.red().bold().to_string()
        } else if line == START_SENTINEL || line == END_SENTINEL {
            line.bold().to_string()
        } else {
            line.to_string()
        }
    }
}

impl LogSink for ConsoleSink {
    fn clear(&mut self) {
        if self.clear_screen {
            // ANSI: erase display, cursor home
            print!("\x1B[2J\x1B[1;1H");
            let _ = std::io::stdout().flush();
        }
    }

    fn log(&mut self, line: &str) {
        println!("{}", self.paint(line));
    }

    fn error(&mut self, line: &str) {
        if self.color {
            eprintln!("{}", line.red());
        } else {
            eprintln!("{line}");
        }
    }
}

/// Buffers every line in memory, in emission order.
/// 按输出顺序将每一行缓存在内存中。
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Vec<(Level, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All buffered lines with their level.
    pub fn lines(&self) -> &[(Level, String)] {
        &self.lines
    }

    /// Buffered line texts regardless of level.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|(_, line)| line.as_str()).collect()
    }

    /// Buffered error line texts.
    pub fn errors(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(level, _)| *level == Level::Error)
            .map(|(_, line)| line.as_str())
            .collect()
    }
}

impl LogSink for MemorySink {
    fn clear(&mut self) {
        self.lines.clear();
    }

    fn log(&mut self, line: &str) {
        self.lines.push((Level::Info, line.to_string()));
    }

    fn error(&mut self, line: &str) {
        self.lines.push((Level::Error, line.to_string()));
    }
}
