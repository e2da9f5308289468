use ml::{TrainError, TrainReport};

/// Counters for the episode in progress and the ones before it.
///
/// `steps` and `reward` cover the current episode only; the others survive
/// episode ends and manual resets.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EpisodeMetrics {
    pub steps: u64,
    pub reward: f64,
    pub episodes: u64,
    pub best: u64,
    pub last: u64,
}

impl EpisodeMetrics {
    pub fn record_step(&mut self, reward: f64) {
        self.steps += 1;
        self.reward += reward;
    }

    /// Closes the current episode and returns its length.
    pub fn complete_episode(&mut self) -> u64 {
        let length = self.steps;
        self.episodes += 1;
        self.last = length;
        self.best = self.best.max(length);
        self.reset_running();
        length
    }

    pub fn reset_running(&mut self) {
        self.steps = 0;
        self.reward = 0.0;
    }
}

/// Learning progress across neural-mode episodes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrainingStats {
    pub updates_applied: u64,
    pub updates_discarded: u64,
    /// Undiscounted reward of the last trained episode.
    pub last_return: f64,
    /// Discounted return from the first step of the last trained episode.
    pub last_discounted_return: f64,
    /// Exponential moving average of neural episode lengths.
    pub smoothed_return: f64,
}

impl TrainingStats {
    #[allow(clippy::cast_precision_loss)]
    pub fn record(
        &mut self,
        ema_factor: f64,
        episode_length: u64,
        outcome: &Result<TrainReport, TrainError>,
    ) {
        match outcome {
            Ok(report) => {
                self.updates_applied += 1;
                self.last_return = report.total_reward;
                self.last_discounted_return = report.discounted_return;
            }
            Err(TrainError::EmptyTrajectory) => {}
            Err(_) => self.updates_discarded += 1,
        }
        self.smoothed_return =
            ema_factor * self.smoothed_return + (1.0 - ema_factor) * episode_length as f64;
    }
}
