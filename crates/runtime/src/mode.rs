use physics::{Push, State};
use std::fmt;

/// Who picks the push each tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ControlMode {
    /// Sample from the policy network and learn from each episode
    #[default]
    Neural,
    /// Fixed linear controller, no learning
    Heuristic,
    /// Coin flip each tick
    Random,
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlMode::Neural => "neural",
            ControlMode::Heuristic => "heuristic",
            ControlMode::Random => "random",
        };
        f.write_str(name)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RunState {
    #[default]
    Paused,
    Running,
}

impl RunState {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            RunState::Paused => RunState::Running,
            RunState::Running => RunState::Paused,
        }
    }
}

/// Push toward the side the pole is falling, with a little damping from
/// the angular and cart velocities.
#[must_use]
pub fn heuristic(state: &State) -> Push {
    if state.theta + 0.25 * state.theta_dot + 0.05 * state.x_dot > 0.0 {
        Push::Right
    } else {
        Push::Left
    }
}
