//! # Reporting Module / 报告模块
//!
//! This module turns suite results into the line-oriented text a run emits:
//! sentinels, one summary line per suite and one block per failed check.
//!
//! 此模块将套件结果转换为运行输出的面向行的文本：
//! 哨兵行、每个套件一行摘要，以及每个失败检查一个信息块。

pub mod console;

pub use console::{failure_lines, summary_line};
