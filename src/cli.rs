// src/cli.rs
use anyhow::Result;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::core::config::DEFAULT_CONFIG_FILE;
use crate::infra::t;

pub mod commands;

/// Options shared by the `run`, `list` and `watch` subcommands.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub config: PathBuf,
    /// `true` when `--config` was given on the command line.
    pub explicit_config: bool,
    pub filter: Option<String>,
    pub no_color: bool,
}

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
fn pre_parse_language() -> String {
    let args: Vec<String> = env::args().collect();
    lang_from_args(&args)
        // Fallback to system language detection
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string())
}

/// The value of `--lang <VALUE>` or `--lang=<VALUE>`, if present.
pub(crate) fn lang_from_args(args: &[String]) -> Option<String> {
    args.iter().enumerate().find_map(|(pos, arg)| {
        if arg == "--lang" {
            args.get(pos + 1).cloned()
        } else {
            arg.strip_prefix("--lang=").map(str::to_string)
        }
    })
}

fn filter_arg(locale: &str) -> Arg {
    Arg::new("filter")
        .short('f')
        .long("filter")
        .help(t!("arg_filter", locale = locale).to_string())
        .value_name("PATTERN")
        .action(ArgAction::Set)
}

fn no_color_arg(locale: &str) -> Arg {
    Arg::new("no-color")
        .long("no-color")
        .help(t!("arg_no_color", locale = locale).to_string())
        .action(ArgAction::SetTrue)
}

pub fn build_cli(locale: &str) -> Command {
    Command::new("suite-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help(t!("arg_config", locale = locale).to_string())
                .value_name("CONFIG")
                .default_value(DEFAULT_CONFIG_FILE)
                .value_parser(clap::value_parser!(PathBuf))
                .global(true)
                .action(ArgAction::Set),
        )
        // Read back through `ProcessArguments`; declared so clap accepts it.
        .arg(
            Arg::new("filterTests")
                .long("filterTests")
                .value_name("PATTERN")
                .hide(true)
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cmd_run_about", locale = locale).to_string())
                .arg(filter_arg(locale))
                .arg(no_color_arg(locale)),
        )
        .subcommand(
            Command::new("list")
                .about(t!("cmd_list_about", locale = locale).to_string())
                .arg(filter_arg(locale)),
        )
        .subcommand(
            Command::new("watch")
                .about(t!("cmd_watch_about", locale = locale).to_string())
                .arg(filter_arg(locale))
                .arg(no_color_arg(locale))
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .help(t!("arg_interval", locale = locale).to_string())
                        .value_name("SECONDS")
                        .value_parser(clap::value_parser!(f64))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help(t!("arg_force", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn run_args(matches: &ArgMatches) -> RunArgs {
    let config = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let explicit_config = matches.value_source("config") == Some(ValueSource::CommandLine);
    let filter = matches.get_one::<String>("filter").cloned();
    let no_color = matches
        .try_get_one::<bool>("no-color")
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false);

    RunArgs {
        config,
        explicit_config,
        filter,
        no_color,
    }
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let language = pre_parse_language();
    crate::set_language(&language);

    let matches = build_cli(&language).get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            commands::run::execute(run_args(run_matches), &language)?;
        }
        Some(("list", list_matches)) => {
            commands::list::execute(run_args(list_matches), &language)?;
        }
        Some(("watch", watch_matches)) => {
            let interval = watch_matches.get_one::<f64>("interval").copied();
            commands::watch::execute(run_args(watch_matches), interval, &language).await?;
        }
        Some(("init", init_matches)) => {
            let force = init_matches.get_flag("force");
            let config = init_matches
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            commands::init::execute(&config, force, &language)?;
        }
        _ => {
            // subcommand_required: clap has already printed help and exited.
        }
    }
    Ok(())
}
