//! Two-layer policy network
//!
//! ```text
//! observation (4)
//!       |
//!  [Dense(8)] -> tanh      hidden activations
//!       |
//!  [Dense(2)] -> softmax   P(push left), P(push right)
//! ```

use crate::nn::{self, Dense};

pub const OBS_DIM: usize = 4;
pub const HIDDEN_DIM: usize = 8;
pub const ACTION_DIM: usize = 2;

/// Weights and biases of the policy.
///
/// Treated as an immutable value once built: training produces a new set
/// rather than editing one in place.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkParameters {
    /// Input to hidden, `[HIDDEN_DIM, OBS_DIM]`.
    pub hidden: Dense,
    /// Hidden to output, `[ACTION_DIM, HIDDEN_DIM]`.
    pub output: Dense,
}

/// Intermediate values of one forward pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Activations {
    pub hidden: Vec<f64>,
    pub probs: Vec<f64>,
}

impl NetworkParameters {
    /// Every weight and bias uniform in `[-range, range)`.
    pub fn random(range: f64, rng: &mut fastrand::Rng) -> Self {
        Self {
            hidden: Dense::uniform(OBS_DIM, HIDDEN_DIM, range, rng),
            output: Dense::uniform(HIDDEN_DIM, ACTION_DIM, range, rng),
        }
    }

    #[must_use]
    pub fn zeros() -> Self {
        Self {
            hidden: Dense::zeros(OBS_DIM, HIDDEN_DIM),
            output: Dense::zeros(HIDDEN_DIM, ACTION_DIM),
        }
    }

    #[must_use]
    pub fn forward(&self, observation: &[f64; OBS_DIM]) -> Activations {
        let hidden = nn::tanh(&self.hidden.forward(observation));
        let probs = nn::softmax(&self.output.forward(&hidden));
        Activations { hidden, probs }
    }

    /// A new parameter set `self + scale * grad`, layer by layer.
    #[must_use]
    pub fn add_scaled(&self, grad: &NetworkParameters, scale: f64) -> NetworkParameters {
        NetworkParameters {
            hidden: self.hidden.add_scaled(&grad.hidden, scale),
            output: self.output.add_scaled(&grad.output, scale),
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.hidden.is_finite() && self.output.is_finite()
    }
}
