use anyhow::Result;
use colored::*;

use crate::{
    cli::RunArgs,
    cli::commands::run::load_config,
    core::discovery::{FilterPattern, Registry},
    infra::t,
};

/// Prints the fully-qualified name of every suite the filter accepts,
/// without instantiating or running any of them.
pub fn execute(args: RunArgs, locale: &str) -> Result<()> {
    let (config, locale) = load_config(&args, locale)?;
    let filter = FilterPattern::parse(config.filter.as_deref())?;
    let registry = Registry::global();

    let names: Vec<&str> = registry
        .matching(&filter)
        .map(|descriptor| descriptor.name())
        .collect();

    if names.is_empty() {
        println!("{}", t!("list_empty", locale = &locale).yellow());
        return Ok(());
    }

    for name in &names {
        println!("  - {name}");
    }
    println!(
        "{}",
        t!("list_total", locale = &locale, count = names.len()).bold()
    );
    Ok(())
}
