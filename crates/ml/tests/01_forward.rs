use approx::assert_abs_diff_eq;
use ml::{Dense, NetworkParameters, HIDDEN_DIM};

#[test]
fn forward_matches_hand_computation() {
    // one active hidden unit wired to theta, everything else zero
    let mut hidden_w = vec![0.0; HIDDEN_DIM * 4];
    hidden_w[2] = 2.0;
    let mut output_w = vec![0.0; 2 * HIDDEN_DIM];
    output_w[HIDDEN_DIM] = 1.5;
    let params = NetworkParameters {
        hidden: Dense::new(hidden_w, vec![0.0; HIDDEN_DIM], 4, HIDDEN_DIM),
        output: Dense::new(output_w, vec![0.1, -0.1], HIDDEN_DIM, 2),
    };

    let a = params.forward(&[0.0, 0.0, 0.25, 0.0]);
    let h0 = (0.5f64).tanh();
    assert_abs_diff_eq!(a.hidden[0], h0, epsilon = 1e-12);
    assert!(a.hidden[1..].iter().all(|&h| h == 0.0));

    let (l0, l1): (f64, f64) = (0.1, 1.5 * h0 - 0.1);
    let p1 = l1.exp() / (l0.exp() + l1.exp());
    assert_abs_diff_eq!(a.probs[1], p1, epsilon = 1e-12);
    assert_abs_diff_eq!(a.probs[0], 1.0 - p1, epsilon = 1e-12);
}

#[test]
fn probabilities_form_a_distribution() {
    let mut rng = fastrand::Rng::with_seed(99);
    for _ in 0..200 {
        let params = NetworkParameters::random(3.0, &mut rng);
        let obs = [
            rng.f64() * 10.0 - 5.0,
            rng.f64() * 10.0 - 5.0,
            rng.f64() - 0.5,
            rng.f64() * 10.0 - 5.0,
        ];
        let a = params.forward(&obs);
        assert_eq!(a.probs.len(), 2);
        assert!(a.probs.iter().all(|&p| p >= 0.0));
        assert_abs_diff_eq!(a.probs[0] + a.probs[1], 1.0, epsilon = 1e-6);
    }
}

#[test]
fn extreme_logits_do_not_overflow() {
    let mut params = NetworkParameters::zeros();
    params.output.b = vec![800.0, -800.0];
    let a = params.forward(&[0.0; 4]);
    assert!(a.probs.iter().all(|p| p.is_finite()));
    assert_abs_diff_eq!(a.probs[0], 1.0, epsilon = 1e-12);
}
