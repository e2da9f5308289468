/// A fully connected layer.
///
/// Weights are stored row-major as `[out_dim, in_dim]`: row `o` holds the
/// weights feeding output unit `o`.
#[derive(Clone, Debug, PartialEq)]
pub struct Dense {
    /// The weight matrix for the layer.
    pub w: Vec<f64>,
    /// The bias vector for the layer.
    pub b: Vec<f64>,
    /// The number of input dimensions.
    pub in_dim: usize,
    /// The number of output dimensions.
    pub out_dim: usize,
}

impl Dense {
    /// Creates a new `Dense` layer with the given weights and biases.
    ///
    /// # Panics
    ///
    /// If `weights` is not `in_dim * out_dim` long or `bias` is not `out_dim` long.
    #[must_use]
    pub fn new(weights: Vec<f64>, bias: Vec<f64>, in_dim: usize, out_dim: usize) -> Self {
        assert_eq!(weights.len(), in_dim * out_dim);
        assert_eq!(bias.len(), out_dim);
        Self {
            w: weights,
            b: bias,
            in_dim,
            out_dim,
        }
    }

    #[must_use]
    pub fn zeros(in_dim: usize, out_dim: usize) -> Self {
        Self::new(
            vec![0.0; in_dim * out_dim],
            vec![0.0; out_dim],
            in_dim,
            out_dim,
        )
    }

    /// Weights and biases uniform in `[-range, range)`.
    pub fn uniform(in_dim: usize, out_dim: usize, range: f64, rng: &mut fastrand::Rng) -> Self {
        let draw = || (rng.f64() * 2.0 - 1.0) * range;
        let weights = (0..in_dim * out_dim).map(|_| draw()).collect();
        let bias = (0..out_dim).map(|_| draw()).collect();
        Self::new(weights, bias, in_dim, out_dim)
    }

    /// `y = W x + b`
    #[must_use]
    pub fn forward(&self, x: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), self.in_dim);
        (0..self.out_dim)
            .map(|o| {
                let row = &self.w[o * self.in_dim..(o + 1) * self.in_dim];
                self.b[o] + row.iter().zip(x).map(|(w, v)| w * v).sum::<f64>()
            })
            .collect()
    }

    /// Given the input `x` and the gradient at the output, returns
    /// `(grad_input, grad_w, grad_b)`.
    ///
    /// `grad_input` is `W^T grad`; `grad_w` is the outer product `grad x^T`.
    #[must_use]
    pub fn backward(&self, x: &[f64], grad: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let mut grad_input = vec![0.0; self.in_dim];
        let mut grad_w = vec![0.0; self.in_dim * self.out_dim];
        let mut grad_b = vec![0.0; self.out_dim];
        for o in 0..self.out_dim {
            let go = grad[o];
            for i in 0..self.in_dim {
                grad_w[o * self.in_dim + i] += go * x[i];
                grad_input[i] += self.w[o * self.in_dim + i] * go;
            }
            grad_b[o] += go;
        }
        (grad_input, grad_w, grad_b)
    }

    /// Adds a weight and bias gradient into this layer in place.
    pub fn accumulate(&mut self, grad_w: &[f64], grad_b: &[f64]) {
        for (p, g) in self.w.iter_mut().zip(grad_w) {
            *p += g;
        }
        for (p, g) in self.b.iter_mut().zip(grad_b) {
            *p += g;
        }
    }

    /// A new layer `self + scale * other`.
    #[must_use]
    pub fn add_scaled(&self, other: &Dense, scale: f64) -> Dense {
        let w = self
            .w
            .iter()
            .zip(&other.w)
            .map(|(p, g)| p + scale * g)
            .collect();
        let b = self
            .b
            .iter()
            .zip(&other.b)
            .map(|(p, g)| p + scale * g)
            .collect();
        Dense::new(w, b, self.in_dim, self.out_dim)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.w.iter().chain(&self.b).all(|v| v.is_finite())
    }
}

#[must_use]
pub fn tanh(x: &[f64]) -> Vec<f64> {
    x.iter().map(|v| v.tanh()).collect()
}

/// Softmax with the max logit subtracted first so `exp` cannot overflow.
#[must_use]
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let m = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = logits.iter().map(|&v| (v - m).exp()).collect();
    let sum: f64 = exp.iter().sum();
    exp.iter().map(|&e| e / sum).collect()
}
