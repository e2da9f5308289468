use thiserror::Error;

/// Why an episode's update was not applied.
///
/// None of these are fatal: the caller keeps the parameters it already had.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainError {
    #[error("trajectory is empty")]
    EmptyTrajectory,
    #[error("accumulated gradient is not finite")]
    NonFiniteGradient,
    #[error("updated parameters are not finite")]
    NonFiniteParameters,
}
