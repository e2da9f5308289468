#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]
//! # Policy Learning
//!
//! A tiny dense policy network and an online REINFORCE trainer for it.
//!
//! -   [`nn`]: the [`Dense`] layer with its forward and backward passes, plus
//!     `tanh` and a max-shifted `softmax`.
//! -   [`policy`]: the fixed 4 → 8 → 2 [`NetworkParameters`] and its forward
//!     pass producing [`Activations`].
//! -   [`sampler`]: picks an action index from a probability vector.
//! -   [`rl`]: [`Trajectory`] recording and the [`Trainer`] that turns a
//!     finished episode into a new parameter set.
//!
//! All randomness comes from a caller-supplied `fastrand::Rng`, so a seed
//! reproduces a run exactly.

pub mod error;
pub mod nn;
pub mod policy;
pub mod rl;
pub mod sampler;

pub use error::TrainError;
pub use nn::Dense;
pub use policy::{Activations, NetworkParameters, ACTION_DIM, HIDDEN_DIM, OBS_DIM};
pub use rl::{
    discounted_returns, PolicyStep, TrainReport, Trainer, TrainerConfig, Trajectory, Update,
    SURVIVAL_REWARD,
};
pub use sampler::sample;
