//! REINFORCE over single episodes
//!
//! The trainer collects nothing itself: the caller records a [`Trajectory`]
//! while acting and hands it over when the episode ends. Each step's
//! discounted return is used directly as its advantage, with no baseline.

use crate::error::TrainError;
use crate::policy::{Activations, NetworkParameters, OBS_DIM};
use std::sync::Arc;
use tracing::{debug, warn};

/// Reward for every step the pole stays up.
pub const SURVIVAL_REWARD: f64 = 1.0;

/// One timestep of neural-mode control.
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyStep {
    pub observation: [f64; OBS_DIM],
    pub hidden: Vec<f64>,
    pub probs: Vec<f64>,
    pub action: usize,
    pub reward: f64,
}

impl PolicyStep {
    /// A step that kept the pole up, rewarded with [`SURVIVAL_REWARD`].
    #[must_use]
    pub fn survived(observation: [f64; OBS_DIM], activations: Activations, action: usize) -> Self {
        Self {
            observation,
            hidden: activations.hidden,
            probs: activations.probs,
            action,
            reward: SURVIVAL_REWARD,
        }
    }
}

/// Steps of the current episode in the order they were taken.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    steps: Vec<PolicyStep>,
}

impl Trajectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: PolicyStep) {
        self.steps.push(step);
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn steps(&self) -> &[PolicyStep] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PolicyStep> {
        self.steps.iter()
    }

    #[must_use]
    pub fn rewards(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.reward).collect()
    }

    #[must_use]
    pub fn total_reward(&self) -> f64 {
        self.steps.iter().map(|s| s.reward).sum()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a PolicyStep;
    type IntoIter = std::slice::Iter<'a, PolicyStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// `G_t = r_t + gamma * G_{t+1}`, with `G_{T-1} = r_{T-1}`.
#[must_use]
pub fn discounted_returns(rewards: &[f64], gamma: f64) -> Vec<f64> {
    let mut returns = vec![0.0; rewards.len()];
    let mut running = 0.0;
    for (t, &r) in rewards.iter().enumerate().rev() {
        running = r + gamma * running;
        returns[t] = running;
    }
    returns
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrainerConfig {
    /// Discount factor for returns.
    pub gamma: f64,
    /// Step size; divided by the episode length before use.
    pub learning_rate: f64,
    /// Fresh weights and biases are uniform in `[-init_range, init_range)`.
    pub init_range: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            gamma: 0.99,
            learning_rate: 0.02,
            init_range: 0.5,
        }
    }
}

/// Summary of one applied update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainReport {
    pub steps: usize,
    /// Undiscounted sum of the episode's rewards.
    pub total_reward: f64,
    /// Discounted return from the first step.
    pub discounted_return: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Update {
    pub params: NetworkParameters,
    pub report: TrainReport,
}

/// Owner of the canonical policy parameters.
///
/// Readers get an `Arc` snapshot; an applied update swaps in a whole new set,
/// so a snapshot never changes under its holder.
#[derive(Clone, Debug)]
pub struct Trainer {
    config: TrainerConfig,
    params: Arc<NetworkParameters>,
}

impl Trainer {
    pub fn new(config: TrainerConfig, rng: &mut fastrand::Rng) -> Self {
        let params = Arc::new(NetworkParameters::random(config.init_range, rng));
        Self { config, params }
    }

    #[must_use]
    pub fn with_parameters(config: TrainerConfig, params: NetworkParameters) -> Self {
        Self {
            config,
            params: Arc::new(params),
        }
    }

    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// The current parameters.
    #[must_use]
    pub fn parameters(&self) -> Arc<NetworkParameters> {
        Arc::clone(&self.params)
    }

    /// Replace the parameters with a fresh random draw.
    pub fn reinitialize(&mut self, rng: &mut fastrand::Rng) {
        self.params = Arc::new(NetworkParameters::random(self.config.init_range, rng));
    }

    /// Policy-gradient ascent on `params` over one episode.
    ///
    /// Never fails: an empty trajectory, or one whose update would not be
    /// finite, gives back `params` unchanged.
    #[must_use]
    pub fn update(&self, params: &NetworkParameters, trajectory: &Trajectory) -> NetworkParameters {
        match self.try_update(params, trajectory) {
            Ok(update) => update.params,
            Err(TrainError::EmptyTrajectory) => params.clone(),
            Err(e) => {
                warn!("discarding episode update: {e}");
                params.clone()
            }
        }
    }

    /// Like [`Trainer::update`] but says why nothing was applied.
    ///
    /// # Errors
    ///
    /// [`TrainError::EmptyTrajectory`] for an empty trajectory,
    /// [`TrainError::NonFiniteGradient`] or [`TrainError::NonFiniteParameters`]
    /// when the numbers blew up.
    pub fn try_update(
        &self,
        params: &NetworkParameters,
        trajectory: &Trajectory,
    ) -> Result<Update, TrainError> {
        if trajectory.is_empty() {
            return Err(TrainError::EmptyTrajectory);
        }
        let returns = discounted_returns(&trajectory.rewards(), self.config.gamma);
        debug_assert_eq!(returns.len(), trajectory.len());

        let mut grad = NetworkParameters::zeros();
        for (step, &advantage) in trajectory.iter().zip(&returns) {
            // d log pi(a) / d logit_k = 1[k == a] - p_k
            let delta_out: Vec<f64> = step
                .probs
                .iter()
                .enumerate()
                .map(|(k, &p)| {
                    let chosen = if k == step.action { 1.0 } else { 0.0 };
                    (chosen - p) * advantage
                })
                .collect();
            let (grad_hidden, out_weights, out_bias) =
                params.output.backward(&step.hidden, &delta_out);
            grad.output.accumulate(&out_weights, &out_bias);

            let delta_hidden: Vec<f64> = grad_hidden
                .iter()
                .zip(&step.hidden)
                .map(|(g, h)| g * (1.0 - h * h))
                .collect();
            let (_, in_weights, in_bias) = params.hidden.backward(&step.observation, &delta_hidden);
            grad.hidden.accumulate(&in_weights, &in_bias);
        }
        if !grad.is_finite() {
            return Err(TrainError::NonFiniteGradient);
        }

        #[allow(clippy::cast_precision_loss)]
        let scale = self.config.learning_rate / trajectory.len().max(1) as f64;
        let next = params.add_scaled(&grad, scale);
        if !next.is_finite() {
            return Err(TrainError::NonFiniteParameters);
        }

        let report = TrainReport {
            steps: trajectory.len(),
            total_reward: trajectory.total_reward(),
            discounted_return: returns[0],
        };
        debug!(
            steps = report.steps,
            discounted_return = report.discounted_return,
            "policy update computed"
        );
        Ok(Update {
            params: next,
            report,
        })
    }

    /// Train on a finished episode and, on success, replace the canonical
    /// parameters with the result.
    ///
    /// # Errors
    ///
    /// Same as [`Trainer::try_update`]; the parameters are left as they were.
    pub fn train_episode(&mut self, trajectory: &Trajectory) -> Result<TrainReport, TrainError> {
        let update = self.try_update(&self.params, trajectory)?;
        self.params = Arc::new(update.params);
        Ok(update.report)
    }
}
