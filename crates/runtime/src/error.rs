use physics::PhysicsError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("invalid cart-pole configuration: {0}")]
    Physics(#[from] PhysicsError),
    #[error("{name} out of range: {value}")]
    InvalidSetting { name: &'static str, value: f64 },
}
