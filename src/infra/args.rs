//! # Argument Source Module / 参数来源模块
//!
//! Looks up named values in the process launch arguments. The runner uses this
//! to pick up a default filter pattern when none is supplied programmatically.
//!
//! 在进程启动参数中查找命名值。当没有以编程方式提供过滤模式时，
//! 运行器使用它来获取默认的过滤模式。

use std::collections::HashMap;
use std::env;

/// Something that can resolve a named launch argument.
pub trait ArgumentSource {
    /// Returns the value bound to `key`, or `None` if absent.
    fn named(&self, key: &str) -> Option<String>;
}

/// An argument source with nothing in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoArguments;

impl ArgumentSource for NoArguments {
    fn named(&self, _key: &str) -> Option<String> {
        None
    }
}

impl ArgumentSource for HashMap<String, String> {
    fn named(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Parses `--key value`, `--key=value` and `-key value` forms out of a raw
/// argument list. The first occurrence of a key wins.
///
/// 从原始参数列表中解析 `--key value`、`--key=value` 和 `-key value` 形式。
/// 键的第一次出现优先。
#[derive(Debug, Clone, Default)]
pub struct ProcessArguments {
    args: Vec<String>,
}

impl ProcessArguments {
    /// Captures the arguments the current process was launched with.
    pub fn from_env() -> Self {
        Self {
            args: env::args().skip(1).collect(),
        }
    }

    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

fn strip_dashes(arg: &str) -> Option<&str> {
    arg.strip_prefix("--").or_else(|| arg.strip_prefix('-'))
}

impl ArgumentSource for ProcessArguments {
    fn named(&self, key: &str) -> Option<String> {
        let mut iter = self.args.iter().peekable();
        while let Some(arg) = iter.next() {
            let Some(flag) = strip_dashes(arg) else {
                continue;
            };

            if let Some((name, value)) = flag.split_once('=') {
                if name == key {
                    return Some(value.to_string());
                }
                continue;
            }

            if flag == key {
                return match iter.peek() {
                    Some(next) if !next.starts_with('-') => Some((*next).clone()),
                    _ => None,
                };
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_forms() {
        let args = ProcessArguments::from_args(["run", "--filterTests", "Alpha.*"]);
        assert_eq!(args.named("filterTests").as_deref(), Some("Alpha.*"));

        let args = ProcessArguments::from_args(["--filterTests=Beta"]);
        assert_eq!(args.named("filterTests").as_deref(), Some("Beta"));

        let args = ProcessArguments::from_args(["-filterTests", "Gamma"]);
        assert_eq!(args.named("filterTests").as_deref(), Some("Gamma"));
    }

    #[test]
    fn test_missing_or_valueless_key() {
        let args = ProcessArguments::from_args(["--other", "x"]);
        assert_eq!(args.named("filterTests"), None);

        let args = ProcessArguments::from_args(["--filterTests", "--other"]);
        assert_eq!(args.named("filterTests"), None);

        let args = ProcessArguments::from_args(["--filterTests"]);
        assert_eq!(args.named("filterTests"), None);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let args = ProcessArguments::from_args(["--filterTests=One", "--filterTests", "Two"]);
        assert_eq!(args.named("filterTests").as_deref(), Some("One"));
    }
}
