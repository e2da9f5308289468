//! # Tick-driven sandbox
//!
//! [`Orchestrator`] advances the cart-pole one step per [`Orchestrator::tick`],
//! choosing each push according to the current [`ControlMode`]. In neural
//! mode every step is recorded and the finished episode is handed to the
//! [`Trainer`], whose new parameters are in force from the next tick on.
//!
//! Nothing here blocks or spawns: the host calls `tick` from whatever
//! per-frame callback it has, and pausing only ever takes effect between
//! two calls.

use crate::config::SandboxConfig;
use crate::error::RuntimeError;
use crate::metrics::{EpisodeMetrics, TrainingStats};
use crate::mode::{heuristic, ControlMode, RunState};
use ml::{sample, Activations, NetworkParameters, PolicyStep, TrainError, TrainReport, Trainer};
use ml::{Trajectory, SURVIVAL_REWARD};
use physics::{CartPole, Push, State};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How an episode ended.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeEnd {
    /// Steps survived, excluding the step that ended the episode.
    pub length: u64,
    pub mode: ControlMode,
    /// Strictly longer than every earlier episode; a tie is not a new best.
    pub new_best: bool,
    /// Set for neural episodes only.
    pub training: Option<Result<TrainReport, TrainError>>,
}

/// What a single step did.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub action: Push,
    /// The state the step produced, before any reset.
    pub state: State,
    pub episode: Option<EpisodeEnd>,
}

pub struct Orchestrator {
    cartpole: CartPole,
    trainer: Trainer,
    rng: fastrand::Rng,
    state: State,
    mode: ControlMode,
    run_state: RunState,
    trajectory: Trajectory,
    metrics: EpisodeMetrics,
    training: TrainingStats,
    ema_factor: f64,
    last_activations: Option<Activations>,
}

impl Orchestrator {
    /// Builds a paused sandbox with fresh parameters and a random start.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] if `config` fails validation.
    pub fn new(config: SandboxConfig) -> Result<Self, RuntimeError> {
        config.validate()?;
        let mut rng = fastrand::Rng::with_seed(config.seed);
        let cartpole = CartPole::new(config.cartpole)?;
        let trainer = Trainer::new(config.trainer, &mut rng);
        let state = cartpole.random_state(&mut rng);
        info!(mode = %config.mode, seed = config.seed, "sandbox created");
        Ok(Self {
            cartpole,
            trainer,
            rng,
            state,
            mode: config.mode,
            run_state: RunState::Paused,
            trajectory: Trajectory::new(),
            metrics: EpisodeMetrics::default(),
            training: TrainingStats::default(),
            ema_factor: config.ema_factor,
            last_activations: None,
        })
    }

    /// One step if running, nothing if paused.
    pub fn tick(&mut self) -> Option<TickReport> {
        match self.run_state {
            RunState::Running => Some(self.step_once()),
            RunState::Paused => None,
        }
    }

    /// One step regardless of the run flag.
    pub fn step_once(&mut self) -> TickReport {
        let current = self.state;
        let (action, record) = match self.mode {
            ControlMode::Heuristic => (heuristic(&current), None),
            ControlMode::Random => {
                let push = if self.rng.bool() {
                    Push::Right
                } else {
                    Push::Left
                };
                (push, None)
            }
            ControlMode::Neural => {
                let params = self.trainer.parameters();
                let observation = *current.as_array();
                let activations = params.forward(&observation);
                let index = sample(&activations.probs, &mut self.rng);
                self.last_activations = Some(activations.clone());
                let step = PolicyStep::survived(observation, activations, index);
                (Push::from_index(index), Some(step))
            }
        };

        let transition = self.cartpole.step(&current, action);
        if let Some(step) = record {
            if transition.state.is_finite() {
                self.trajectory.push(step);
            } else {
                warn!(?current, "physics produced a non-finite state; step not recorded");
            }
        }

        let episode = if transition.terminal {
            let end = self.finish_episode();
            self.state = self.cartpole.random_state(&mut self.rng);
            Some(end)
        } else {
            self.state = transition.state;
            self.metrics.record_step(SURVIVAL_REWARD);
            None
        };

        TickReport {
            action,
            state: transition.state,
            episode,
        }
    }

    fn finish_episode(&mut self) -> EpisodeEnd {
        let previous_best = self.metrics.best;
        let length = self.metrics.complete_episode();
        let new_best = length > previous_best;
        let training = (self.mode == ControlMode::Neural).then(|| {
            let outcome = self.trainer.train_episode(&self.trajectory);
            match &outcome {
                Ok(report) => debug!(
                    steps = report.steps,
                    discounted_return = report.discounted_return,
                    "policy updated"
                ),
                Err(TrainError::EmptyTrajectory) => {}
                Err(e) => warn!("episode update discarded: {e}"),
            }
            self.training.record(self.ema_factor, length, &outcome);
            outcome
        });
        self.trajectory.clear();

        if new_best {
            info!(length, episode = self.metrics.episodes, mode = %self.mode, "new best episode");
        } else {
            debug!(length, episode = self.metrics.episodes, mode = %self.mode, "episode finished");
        }
        EpisodeEnd {
            length,
            mode: self.mode,
            new_best,
            training,
        }
    }

    pub fn toggle_run(&mut self) -> RunState {
        self.run_state = self.run_state.toggled();
        debug!(run_state = ?self.run_state, "run state toggled");
        self.run_state
    }

    pub fn resume(&mut self) {
        self.run_state = RunState::Running;
    }

    pub fn pause(&mut self) {
        self.run_state = RunState::Paused;
    }

    /// Switching away from neural drops the partial trajectory.
    pub fn set_mode(&mut self, mode: ControlMode) {
        if mode == self.mode {
            return;
        }
        if self.mode == ControlMode::Neural {
            self.trajectory.clear();
        }
        info!(from = %self.mode, to = %mode, "control mode changed");
        self.mode = mode;
    }

    /// Fresh random start; episode history is kept.
    pub fn reset(&mut self) {
        let state = self.cartpole.random_state(&mut self.rng);
        self.reset_to(state);
    }

    /// Restart the current episode from `state`.
    pub fn reset_to(&mut self, state: State) {
        self.state = state;
        self.trajectory.clear();
        self.metrics.reset_running();
        debug!(?state, "episode reset");
    }

    /// New random parameters and cleared training statistics.
    pub fn reinitialize_network(&mut self) {
        self.trainer.reinitialize(&mut self.rng);
        self.training = TrainingStats::default();
        self.trajectory.clear();
        self.last_activations = None;
        info!("network reinitialized");
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub fn metrics(&self) -> &EpisodeMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn training(&self) -> &TrainingStats {
        &self.training
    }

    #[must_use]
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    #[must_use]
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Snapshot of the current parameters; later updates do not alter it.
    #[must_use]
    pub fn parameters(&self) -> Arc<NetworkParameters> {
        self.trainer.parameters()
    }

    /// Hidden and output activations of the latest neural step.
    #[must_use]
    pub fn last_activations(&self) -> Option<&Activations> {
        self.last_activations.as_ref()
    }

    #[must_use]
    pub fn trajectory_len(&self) -> usize {
        self.trajectory.len()
    }
}
