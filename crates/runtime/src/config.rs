use crate::error::RuntimeError;
use crate::mode::ControlMode;
use ml::TrainerConfig;
use physics::CartPoleConfig;

/// Everything needed to start a sandbox.
#[derive(Clone, Debug, PartialEq)]
pub struct SandboxConfig {
    pub cartpole: CartPoleConfig,
    pub trainer: TrainerConfig,
    pub mode: ControlMode,
    /// Weight of the old value in the smoothed training statistic.
    pub ema_factor: f64,
    pub seed: u64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            cartpole: CartPoleConfig::default(),
            trainer: TrainerConfig::default(),
            mode: ControlMode::Neural,
            ema_factor: 0.9,
            seed: 0,
        }
    }
}

impl SandboxConfig {
    /// # Errors
    ///
    /// Returns the first out-of-range setting.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        self.cartpole.validate()?;
        let t = &self.trainer;
        let checks = [
            ("gamma", t.gamma, (0.0..=1.0).contains(&t.gamma)),
            (
                "learning_rate",
                t.learning_rate,
                t.learning_rate.is_finite() && t.learning_rate > 0.0,
            ),
            (
                "init_range",
                t.init_range,
                t.init_range.is_finite() && t.init_range >= 0.0,
            ),
            (
                "ema_factor",
                self.ema_factor,
                (0.0..1.0).contains(&self.ema_factor),
            ),
        ];
        for (name, value, ok) in checks {
            if !ok {
                return Err(RuntimeError::InvalidSetting { name, value });
            }
        }
        Ok(())
    }
}
