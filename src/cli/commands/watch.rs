//! # Watch Command Module / 监视命令模块
//!
//! Runs the suites once at start-up, then again every time the configured
//! interval elapses, until Ctrl-C. Each run happens on a blocking thread; a
//! tick that arrives while a run is still in progress is skipped.
//!
//! 启动时运行一次套件，之后每当配置的间隔过去就再次运行，直到按下 Ctrl-C。
//! 每次运行都在阻塞线程上进行；运行仍在进行时到达的触发会被跳过。

use anyhow::Result;
use colored::*;
use std::time::{Duration, Instant};
use tokio::{signal, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    cli::RunArgs,
    cli::commands::run::{load_config, run_once},
    core::{
        config::RunnerConfig,
        models::Report,
        schedule::{RunGuard, Schedule},
    },
    infra::t,
};

/// How often elapsed time is fed into the schedule.
const TICK: Duration = Duration::from_millis(100);

pub async fn execute(args: RunArgs, interval: Option<f64>, locale: &str) -> Result<()> {
    let (mut config, locale) = load_config(&args, locale)?;
    if let Some(secs) = interval {
        config.interval_secs = secs;
    }

    let mut schedule = Schedule::new(config.interval());
    schedule.set_enabled(config.enabled);
    let guard = RunGuard::default();

    let mut in_flight = spawn_run(&guard, &config);

    if !schedule.is_repeating() {
        wait_for(in_flight.take(), &locale).await;
        println!("{}", t!("watch_no_interval", locale = &locale).dimmed());
        return Ok(());
    }

    println!(
        "{}",
        t!("watch_started", locale = &locale, secs = config.interval_secs).cyan()
    );

    let stop_token = setup_signal_handler(&locale)?;
    let mut ticker = tokio::time::interval(TICK);
    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            biased;
            _ = stop_token.cancelled() => break,
            _ = ticker.tick() => {
                let now = Instant::now();
                let due = schedule.advance(now - last_tick);
                last_tick = now;

                if in_flight.as_ref().is_some_and(JoinHandle::is_finished) {
                    wait_for(in_flight.take(), &locale).await;
                }
                if due {
                    match spawn_run(&guard, &config) {
                        Some(handle) => in_flight = Some(handle),
                        None => println!("{}", t!("watch_skipped", locale = &locale).yellow()),
                    }
                }
            }
        }
    }

    wait_for(in_flight, &locale).await;
    Ok(())
}

/// Starts a run on a blocking thread unless one is already in progress.
fn spawn_run(guard: &RunGuard, config: &RunnerConfig) -> Option<JoinHandle<Report>> {
    let permit = guard.try_begin()?;
    let config = config.clone();
    Some(tokio::task::spawn_blocking(move || {
        let _permit = permit;
        run_once(&config)
    }))
}

async fn wait_for(handle: Option<JoinHandle<Report>>, locale: &str) {
    if let Some(handle) = handle {
        if let Err(e) = handle.await {
            eprintln!(
                "{}",
                t!("watch_run_crashed", locale = locale, error = e.to_string()).red()
            );
        }
    }
}

fn setup_signal_handler(locale: &str) -> Result<CancellationToken> {
    let token = CancellationToken::new();
    let token_clone = token.clone();
    let locale = locale.to_string();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("shutdown_signal", locale = &locale).yellow());
        }
        token_clone.cancel();
    });

    Ok(token)
}
