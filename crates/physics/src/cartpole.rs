//! Cart-pole dynamics
//!
//! A pole hinged on a cart that slides along a frictionless track. The cart is
//! driven left or right with a fixed-magnitude force; gravity pulls the pole
//! over. Integration is a single explicit-Euler step per call:
//!
//! ```text
//! temp      = (force + m_p * l * theta_dot^2 * sin(theta)) / (m_c + m_p)
//! theta_acc = (g * sin(theta) - cos(theta) * temp)
//!             / (l * (4/3 - m_p * cos(theta)^2 / (m_c + m_p)))
//! x_acc     = temp - m_p * l * theta_acc * cos(theta) / (m_c + m_p)
//! ```
//!
//! Positions advance by the *old* velocities and velocities by the fresh
//! accelerations. The stepping function holds no state of its own.

use crate::error::PhysicsError;
use crate::types::{Push, State};

/// Physical constants and episode limits for a cart-pole
#[derive(Clone, Debug, PartialEq)]
pub struct CartPoleConfig {
    /// Gravitational acceleration (m/s^2)
    pub gravity: f64,
    /// Cart mass in kg
    pub cart_mass: f64,
    /// Pole mass in kg
    pub pole_mass: f64,
    /// Half of the pole length in meters
    pub half_pole_length: f64,
    /// Magnitude of the drive force in newtons
    pub force_magnitude: f64,
    /// Integration timestep in seconds
    pub dt: f64,
    /// Track half-width; the episode ends beyond it
    pub position_limit: f64,
    /// Pole angle limit from vertical (radians)
    pub failure_angle: f64,
    /// Every component of a fresh state is drawn from `[-spread, spread)`
    pub initial_spread: f64,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            cart_mass: 1.0,
            pole_mass: 0.1,
            half_pole_length: 0.5,
            force_magnitude: 10.0,
            dt: 0.02,
            position_limit: 2.4,
            failure_angle: 12.0_f64.to_radians(),
            initial_spread: 0.05,
        }
    }
}

impl CartPoleConfig {
    /// Checks every constant is usable.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConstant`] for a non-positive or
    /// non-finite constant and [`PhysicsError::InvalidSpread`] for a negative
    /// initial spread.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let constants = [
            ("gravity", self.gravity),
            ("cart_mass", self.cart_mass),
            ("pole_mass", self.pole_mass),
            ("half_pole_length", self.half_pole_length),
            ("force_magnitude", self.force_magnitude),
            ("dt", self.dt),
            ("position_limit", self.position_limit),
            ("failure_angle", self.failure_angle),
        ];
        for (name, value) in constants {
            if !(value.is_finite() && value > 0.0) {
                return Err(PhysicsError::InvalidConstant { name, value });
            }
        }
        if !(self.initial_spread.is_finite() && self.initial_spread >= 0.0) {
            return Err(PhysicsError::InvalidSpread(self.initial_spread));
        }
        Ok(())
    }

    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.cart_mass + self.pole_mass
    }

    /// Whether `state` lies outside the track or angle limits.
    ///
    /// Sitting exactly on a limit is still inside. Any non-finite component
    /// counts as terminal.
    #[must_use]
    pub fn is_terminal(&self, state: &State) -> bool {
        !state.is_finite()
            || state.x.abs() > self.position_limit
            || state.theta.abs() > self.failure_angle
    }
}

/// Result of advancing the dynamics by one timestep
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: State,
    pub terminal: bool,
}

/// Validated cart-pole model
#[derive(Clone, Debug, Default)]
pub struct CartPole {
    config: CartPoleConfig,
}

impl CartPole {
    /// # Errors
    ///
    /// Returns the first problem found by [`CartPoleConfig::validate`].
    pub fn new(config: CartPoleConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &CartPoleConfig {
        &self.config
    }

    /// Advance `state` by one timestep under `action`.
    #[must_use]
    pub fn step(&self, state: &State, action: Push) -> Transition {
        let c = &self.config;
        let force = action.sign() * c.force_magnitude;
        let total_mass = c.total_mass();
        let pole_mass_length = c.pole_mass * c.half_pole_length;

        let (sin_theta, cos_theta) = state.theta.sin_cos();
        let temp = (force + pole_mass_length * state.theta_dot * state.theta_dot * sin_theta)
            / total_mass;
        let theta_acc = (c.gravity * sin_theta - cos_theta * temp)
            / (c.half_pole_length
                * (4.0 / 3.0 - c.pole_mass * cos_theta * cos_theta / total_mass));
        let x_acc = temp - pole_mass_length * theta_acc * cos_theta / total_mass;

        let next = State {
            x: state.x + c.dt * state.x_dot,
            x_dot: state.x_dot + c.dt * x_acc,
            theta: state.theta + c.dt * state.theta_dot,
            theta_dot: state.theta_dot + c.dt * theta_acc,
        };
        Transition {
            state: next,
            terminal: c.is_terminal(&next),
        }
    }

    /// A fresh start with every component uniform in `[-spread, spread)`.
    pub fn random_state(&self, rng: &mut fastrand::Rng) -> State {
        let spread = self.config.initial_spread;
        let draw = || (rng.f64() * 2.0 - 1.0) * spread;
        State::new(draw(), draw(), draw(), draw())
    }

    #[must_use]
    pub fn is_terminal(&self, state: &State) -> bool {
        self.config.is_terminal(state)
    }
}
