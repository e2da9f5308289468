use ml::{sample, NetworkParameters, PolicyStep, Trajectory};

/// A policy-driven trajectory over a fixed observation sequence.
pub fn rollout(params: &NetworkParameters, observations: &[[f64; 4]], seed: u64) -> Trajectory {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut trajectory = Trajectory::new();
    for obs in observations {
        let activations = params.forward(obs);
        let action = sample(&activations.probs, &mut rng);
        trajectory.push(PolicyStep::survived(*obs, activations, action));
    }
    trajectory
}
