//! # Headless Driver
//!
//! Runs an [`Orchestrator`] from the command line without any rendering.
//! Each loop iteration is one tick; with `--fps` set the loop sleeps out the
//! rest of each frame so the simulation plays back at the requested rate,
//! otherwise it runs flat out.

use crate::config::SandboxConfig;
use crate::mode::ControlMode;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use clap::Parser;
use std::time::{Duration, Instant};
use tracing::info;

/// Cart-pole balancing sandbox with online policy-gradient learning
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Controller driving the cart
    #[arg(long, value_enum, default_value_t = ControlMode::Neural)]
    pub mode: ControlMode,
    /// Seed for every random draw
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Stop after this many completed episodes
    #[arg(long)]
    pub episodes: Option<u64>,
    /// Hard cap on the number of ticks
    #[arg(long, default_value_t = 200_000)]
    pub max_ticks: u64,
    /// Ticks per second; 0 runs unpaced
    #[arg(long, default_value_t = 0)]
    pub fps: u32,
    /// Log progress every this many ticks; 0 disables
    #[arg(long, default_value_t = 10_000)]
    pub log_every: u64,
}

/// Where a run ended up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub ticks: u64,
    pub episodes: u64,
    pub best: u64,
    pub last: u64,
    pub smoothed_return: f64,
}

/// Run the sandbox until the episode or tick budget is spent.
///
/// # Errors
///
/// Returns an error if the sandbox configuration is rejected.
pub fn run(cli: &Cli) -> Result<Summary> {
    let config = SandboxConfig {
        mode: cli.mode,
        seed: cli.seed,
        ..SandboxConfig::default()
    };
    let mut sandbox = Orchestrator::new(config)?;
    sandbox.resume();

    let frame_duration = match cli.fps {
        0 => None,
        fps => Some(Duration::from_secs_f64(1.0 / f64::from(fps))),
    };
    let episodes_left = |s: &Orchestrator| cli.episodes.is_none_or(|n| s.metrics().episodes < n);

    info!(mode = %cli.mode, seed = cli.seed, "starting simulation loop");
    let mut ticks = 0;
    while ticks < cli.max_ticks && episodes_left(&sandbox) {
        let frame_start = Instant::now();

        if let Some(end) = sandbox.tick().and_then(|report| report.episode) {
            let training = sandbox.training();
            info!(
                episode = sandbox.metrics().episodes,
                length = end.length,
                best = sandbox.metrics().best,
                smoothed = training.smoothed_return,
                "episode finished"
            );
        }
        ticks += 1;

        if cli.log_every > 0 && ticks % cli.log_every == 0 {
            let m = sandbox.metrics();
            info!(
                ticks,
                episodes = m.episodes,
                current = m.steps,
                best = m.best,
                "progress"
            );
        }

        if let Some(frame) = frame_duration {
            let elapsed = frame_start.elapsed();
            if elapsed < frame {
                std::thread::sleep(frame - elapsed);
            }
        }
    }

    let m = sandbox.metrics();
    let summary = Summary {
        ticks,
        episodes: m.episodes,
        best: m.best,
        last: m.last,
        smoothed_return: sandbox.training().smoothed_return,
    };
    info!(
        ticks,
        episodes = summary.episodes,
        best = summary.best,
        last = summary.last,
        smoothed = summary.smoothed_return,
        "simulation loop finished"
    );
    Ok(summary)
}
