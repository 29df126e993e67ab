//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command for the Suite Runner CLI,
//! which runs every matching suite once and exits non-zero on any failure.
//!
//! 此模块实现了 Suite Runner CLI 的 `run` 命令，
//! 运行每个匹配的套件一次，出现任何失败时以非零状态退出。

use anyhow::Result;
use std::env;

use crate::{
    cli::{RunArgs, lang_from_args},
    core::{
        config::RunnerConfig,
        discovery::Registry,
        execution::{RunOptions, Runner},
        models::Report,
    },
    infra::{args::ProcessArguments, log::ConsoleSink, t},
};

/// Loads the configuration and applies command-line overrides.
///
/// A language set in a configuration file applies unless `--lang` was given.
/// Returns the configuration and the locale to use for messages.
///
/// 加载配置并应用命令行覆盖。
/// 除非给出了 `--lang`，否则配置文件中设置的语言生效。
pub fn load_config(args: &RunArgs, locale: &str) -> Result<(RunnerConfig, String)> {
    let file_present = args.explicit_config || args.config.exists();
    let mut config = RunnerConfig::load_or_default(&args.config, args.explicit_config)?;

    if args.filter.is_some() {
        config.filter = args.filter.clone();
    }
    if args.no_color {
        config.color = false;
    }

    let lang_on_command_line = lang_from_args(&env::args().collect::<Vec<_>>()).is_some();
    let locale = if file_present && !lang_on_command_line {
        crate::set_language(&config.language);
        config.language.clone()
    } else {
        locale.to_string()
    };

    Ok((config, locale))
}

/// Runs every matching suite once against the process-wide registry,
/// logging to the console.
///
/// 针对进程级注册表运行每个匹配的套件一次，输出到控制台。
pub fn run_once(config: &RunnerConfig) -> Report {
    let registry = Registry::global();
    let launch_args = ProcessArguments::from_env();
    let mut sink = ConsoleSink::new(config.color, config.clear_screen);

    Runner::new(&registry, &launch_args, &mut sink)
        .with_options(RunOptions::from(config))
        .run_all(config.filter.as_deref())
}

/// Executes the run command with the provided arguments.
///
/// # Returns
/// An error when the report contains a failed check or a caught run error.
pub fn execute(args: RunArgs, locale: &str) -> Result<()> {
    let (config, locale) = load_config(&args, locale)?;

    let report = run_once(&config);

    if !report.all_passed() {
        anyhow::bail!(t!("run_failed", locale = &locale));
    }
    Ok(())
}
