#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]
//! # Balancing Sandbox Runtime
//!
//! Ties the [`physics`] integrator and the [`ml`] policy learner together
//! into a single-threaded, tick-driven loop.
//!
//! -   [`Orchestrator`]: the state machine a UI or headless driver pokes at:
//!     tick, pause/resume, mode switches, resets, network reinitialization,
//!     and read-only views of state, metrics and parameters.
//! -   [`SandboxConfig`]: physics, trainer and loop settings in one place.
//! -   [`app`]: the command-line driver behind the `runtime_main` binary.

pub mod app;
pub mod config;
pub mod error;
pub mod metrics;
pub mod mode;
pub mod orchestrator;

pub use config::SandboxConfig;
pub use error::RuntimeError;
pub use metrics::{EpisodeMetrics, TrainingStats};
pub use mode::{heuristic, ControlMode, RunState};
pub use orchestrator::{EpisodeEnd, Orchestrator, TickReport};
