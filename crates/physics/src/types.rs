/// Cart-pole state `[x, x_dot, theta, theta_dot]`.
///
/// `theta` is measured from vertical in radians, positive leaning right.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct State {
    pub x: f64,
    pub x_dot: f64,
    pub theta: f64,
    pub theta_dot: f64,
}

impl State {
    #[must_use]
    pub const fn new(x: f64, x_dot: f64, theta: f64, theta_dot: f64) -> Self {
        Self {
            x,
            x_dot,
            theta,
            theta_dot,
        }
    }

    /// The state as the 4-wide observation vector fed to the policy.
    #[must_use]
    pub fn as_array(&self) -> &[f64; 4] {
        bytemuck::cast_ref(self)
    }

    #[must_use]
    pub fn from_array(v: [f64; 4]) -> Self {
        bytemuck::cast(v)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }
}

/// The two discrete drive actions.
///
/// Index order matches the policy's output slots: left first, right second.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Push {
    Left,
    Right,
}

impl Push {
    /// Signed unit force multiplier.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Push::Left => -1.0,
            Push::Right => 1.0,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Push::Left => 0,
            Push::Right => 1,
        }
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        if index == 0 {
            Push::Left
        } else {
            Push::Right
        }
    }
}
