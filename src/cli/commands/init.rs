//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command for the Suite Runner CLI,
//! which creates a new runner configuration file.
//!
//! 此模块实现了 Suite Runner CLI 的 `init` 命令，
//! 用于创建新的运行器配置文件。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, theme::ColorfulTheme};
use std::{fs, path::Path};

use crate::infra::t;

const DEFAULT_CONFIG: &str = r#"# Suite Runner Configuration / 套件运行器配置

# Language for messages / 消息语言
language = "en"

# Only run suites whose fully-qualified name matches this regex
# 仅运行完全限定名称匹配此正则表达式的套件
# filter = "my_crate::.*"

# Launch argument consulted when no filter is set / 未设置过滤模式时查询的启动参数
filter_arg = "filterTests"

# Seconds between runs in `watch` mode, 0 disables repetition
# `watch` 模式下两次运行之间的秒数，0 表示不重复
interval_secs = 0.0
enabled = true

color = true
clear_screen = false

# chrono strftime format of the timestamp line / 时间戳行的 chrono strftime 格式
timestamp_format = "%Y-%m-%d %H:%M:%S"
"#;

/// Executes the init command with the provided arguments.
///
/// # Arguments
/// * `output` - Path for the new configuration file
/// * `force` - Whether to overwrite an existing file without asking
/// * `locale` - Language for messages
pub fn execute(output: &Path, force: bool, locale: &str) -> Result<()> {
    if output.exists() && !force {
        let confirmation = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("init_overwrite_prompt", locale = locale, path = output.display()))
            .default(false)
            .interact()
            .context(t!("init_confirmation_failed", locale = locale).to_string())?;
        if !confirmation {
            println!("{}", t!("init_aborted", locale = locale));
            return Ok(());
        }
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    fs::write(output, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write config file: {}", output.display()))?;

    println!(
        "{}",
        t!("init_created", locale = locale, path = output.display()).green()
    );
    Ok(())
}
