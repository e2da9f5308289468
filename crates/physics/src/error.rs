use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("{name} must be positive and finite, got {value}")]
    InvalidConstant { name: &'static str, value: f64 },
    #[error("initial spread must be non-negative and finite, got {0}")]
    InvalidSpread(f64),
}
