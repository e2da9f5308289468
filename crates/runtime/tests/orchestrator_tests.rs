use approx::assert_abs_diff_eq;
use ml::TrainError;
use physics::State;
use runtime::{ControlMode, Orchestrator, RunState, RuntimeError, SandboxConfig, TickReport};
use std::sync::Arc;

fn sandbox(mode: ControlMode, seed: u64) -> Orchestrator {
    Orchestrator::new(SandboxConfig {
        mode,
        seed,
        ..SandboxConfig::default()
    })
    .unwrap()
}

/// Steps until an episode ends; returns the report and the ticks it took.
fn run_episode(s: &mut Orchestrator) -> (TickReport, u64) {
    for ticks in 1..=10_000 {
        let report = s.step_once();
        if report.episode.is_some() {
            return (report, ticks);
        }
    }
    panic!("episode did not end within 10000 ticks");
}

#[test]
fn starts_paused_and_ticks_do_nothing() {
    let mut s = sandbox(ControlMode::Heuristic, 1);
    assert_eq!(s.run_state(), RunState::Paused);
    let before = s.state();
    assert!(s.tick().is_none());
    assert_eq!(s.state(), before);
    assert_eq!(s.metrics().steps, 0);
}

#[test]
fn toggle_switches_between_paused_and_running() {
    let mut s = sandbox(ControlMode::Heuristic, 1);
    assert_eq!(s.toggle_run(), RunState::Running);
    assert!(s.tick().is_some());
    assert_eq!(s.metrics().steps, 1);
    assert_eq!(s.toggle_run(), RunState::Paused);
    assert!(s.tick().is_none());
    assert_eq!(s.metrics().steps, 1);
}

#[test]
fn heuristic_episode_length_is_recorded() {
    let mut s = sandbox(ControlMode::Heuristic, 2);
    let mut best_seen = 0;
    for tilt in [0.05, 0.15, 0.2, 0.1] {
        s.reset_to(State::new(0.0, 0.0, tilt, 0.0));
        let (report, ticks) = run_episode(&mut s);
        // the tick that ends the episode is not a survived step
        let survived = ticks - 1;
        assert_eq!(report.episode.unwrap().length, survived);
        assert_eq!(s.metrics().last, survived);
        best_seen = best_seen.max(survived);
        assert_eq!(s.metrics().best, best_seen);
        assert_eq!(s.metrics().steps, 0);
    }
    assert_eq!(s.metrics().episodes, 4);
}

#[test]
fn heuristic_balances_for_hundreds_of_steps() {
    let mut s = sandbox(ControlMode::Heuristic, 3);
    s.reset_to(State::new(0.0, 0.0, 0.05, 0.0));
    let (_, ticks) = run_episode(&mut s);
    assert!(ticks > 300, "heuristic only lasted {ticks} ticks");
}

#[test]
fn neural_trajectory_tracks_steps_and_trains_at_episode_end() {
    let mut s = sandbox(ControlMode::Neural, 4);
    let before = s.parameters();
    let mut neural_steps = 0;
    loop {
        let report = s.step_once();
        neural_steps += 1;
        let probs = &s.last_activations().unwrap().probs;
        assert!(probs.iter().all(|&p| p >= 0.0));
        assert_abs_diff_eq!(probs[0] + probs[1], 1.0, epsilon = 1e-6);

        if let Some(end) = report.episode {
            let outcome = end.training.unwrap().unwrap();
            assert_eq!(outcome.steps, neural_steps);
            assert_eq!(s.trajectory_len(), 0);
            break;
        }
        assert_eq!(s.trajectory_len(), neural_steps);
        assert!(neural_steps < 10_000);
    }
    assert_eq!(s.training().updates_applied, 1);
    assert_ne!(*s.parameters(), *before);
}

#[test]
fn snapshots_are_never_mutated_by_training() {
    let mut s = sandbox(ControlMode::Neural, 5);
    let snapshot = s.parameters();
    let copy = (*snapshot).clone();
    for _ in 0..3 {
        run_episode(&mut s);
    }
    assert_eq!(*snapshot, copy);
    assert!(!Arc::ptr_eq(&snapshot, &s.parameters()));
}

#[test]
fn smoothed_return_follows_episode_lengths() {
    let mut s = sandbox(ControlMode::Neural, 6);
    let mut expected = 0.0;
    for _ in 0..5 {
        let (report, _) = run_episode(&mut s);
        #[allow(clippy::cast_precision_loss)]
        let length = report.episode.unwrap().length as f64;
        expected = 0.9 * expected + (1.0 - 0.9) * length;
    }
    assert_abs_diff_eq!(s.training().smoothed_return, expected, epsilon = 1e-9);
}

#[test]
fn leaving_neural_mode_discards_partial_trajectory() {
    let mut s = sandbox(ControlMode::Neural, 7);
    s.reset_to(State::default());
    s.step_once();
    s.step_once();
    assert_eq!(s.trajectory_len(), 2);
    s.set_mode(ControlMode::Heuristic);
    assert_eq!(s.trajectory_len(), 0);
    s.step_once();
    assert_eq!(s.trajectory_len(), 0);
}

#[test]
fn non_finite_physics_ends_episode_without_recording() {
    let mut s = sandbox(ControlMode::Neural, 12);
    s.reset_to(State::new(0.0, 0.0, 0.0, 1e200));
    let report = s.step_once();

    assert!(!report.state.is_finite());
    let end = report.episode.expect("a non-finite state is terminal");
    assert_eq!(end.length, 0);
    assert_eq!(end.training, Some(Err(TrainError::EmptyTrajectory)));
    assert_eq!(s.trajectory_len(), 0);
    assert_eq!(s.training().updates_applied, 0);
    assert_eq!(s.metrics().episodes, 1);
    // the next episode starts from a fresh, finite state
    assert!(s.state().is_finite());
}

#[test]
fn manual_reset_clears_neural_trajectory() {
    let mut s = sandbox(ControlMode::Neural, 13);
    s.reset_to(State::default());
    for n in 1..=5 {
        assert!(s.step_once().episode.is_none());
        assert_eq!(s.trajectory_len(), n);
    }

    s.reset();
    assert_eq!(s.trajectory_len(), 0);
    assert_eq!(s.metrics().steps, 0);

    let mut after_reset = 0;
    loop {
        let report = s.step_once();
        after_reset += 1;
        if let Some(end) = report.episode {
            let outcome = end.training.unwrap().unwrap();
            assert_eq!(outcome.steps, after_reset);
            break;
        }
        assert!(after_reset < 10_000);
    }
}

#[test]
fn tying_the_best_episode_is_not_a_new_best() {
    let mut s = sandbox(ControlMode::Heuristic, 14);
    let mut ends = Vec::new();
    for tilt in [0.05, 0.05, 0.15] {
        s.reset_to(State::new(0.0, 0.0, tilt, 0.0));
        let (report, _) = run_episode(&mut s);
        ends.push(report.episode.unwrap());
    }

    assert!(ends[0].new_best);
    // the heuristic is deterministic, so the same start gives the same length
    assert_eq!(ends[1].length, ends[0].length);
    assert!(!ends[1].new_best);
    assert!(ends[2].length < ends[0].length);
    assert!(!ends[2].new_best);
    assert_eq!(s.metrics().best, ends[0].length);
}

#[test]
fn non_neural_episodes_do_not_train() {
    let mut s = sandbox(ControlMode::Random, 8);
    let before = s.parameters();
    let (report, _) = run_episode(&mut s);
    assert!(report.episode.unwrap().training.is_none());
    assert!(Arc::ptr_eq(&before, &s.parameters()));
    assert_eq!(s.training().updates_applied, 0);
}

#[test]
fn manual_reset_keeps_history() {
    let mut s = sandbox(ControlMode::Heuristic, 9);
    run_episode(&mut s);
    let last = s.metrics().last;
    s.step_once();
    s.reset();
    let m = s.metrics();
    assert_eq!(m.steps, 0);
    assert!(m.reward.abs() < f64::EPSILON);
    assert_eq!(m.episodes, 1);
    assert_eq!(m.last, last);
    for v in s.state().as_array() {
        assert!(v.abs() <= 0.05);
    }
}

#[test]
fn reinitialize_replaces_parameters_and_clears_stats() {
    let mut s = sandbox(ControlMode::Neural, 10);
    run_episode(&mut s);
    s.step_once();
    let before = s.parameters();
    s.reinitialize_network();
    assert_ne!(*s.parameters(), *before);
    assert_eq!(s.training().updates_applied, 0);
    assert_eq!(s.trajectory_len(), 0);
    assert!(s.last_activations().is_none());
}

#[test]
fn same_seed_reproduces_run() {
    let mut a = sandbox(ControlMode::Neural, 11);
    let mut b = sandbox(ControlMode::Neural, 11);
    for _ in 0..500 {
        assert_eq!(a.step_once(), b.step_once());
    }
    assert_eq!(*a.parameters(), *b.parameters());
    assert_eq!(a.metrics(), b.metrics());
}

#[test]
fn invalid_config_is_rejected() {
    let config = SandboxConfig {
        ema_factor: 1.0,
        ..SandboxConfig::default()
    };
    assert!(matches!(
        Orchestrator::new(config),
        Err(RuntimeError::InvalidSetting {
            name: "ema_factor",
            ..
        })
    ));
}
