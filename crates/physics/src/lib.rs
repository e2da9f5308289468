#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Cart-Pole Physics
//!
//! The state-transition function for the classic inverted pendulum on a cart.
//!
//! This crate is the bottom layer of the balancing sandbox. It has no notion
//! of episodes, policies or rendering: it maps a [`State`] and a [`Push`] to
//! the next [`State`] plus a terminal flag, and nothing else.
//!
//! ## Key Components
//!
//! -   **[`State`]:** four scalars (cart position and velocity, pole angle and
//!     angular velocity). Every step produces a new value.
//! -   **[`CartPole`]:** a validated [`CartPoleConfig`] with the pure
//!     [`CartPole::step`] integrator and the randomized initial-state draw.
//! -   **[`PhysicsError`]:** rejected configurations.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{CartPole, Push, State};
//!
//! let cartpole = CartPole::default();
//! let t = cartpole.step(&State::new(0.0, 0.0, 0.05, 0.0), Push::Right);
//! assert!(!t.terminal);
//! ```

pub mod cartpole;
pub mod error;
pub mod types;


pub use cartpole::{CartPole, CartPoleConfig, Transition};
pub use error::PhysicsError;
pub use types::{Push, State};
