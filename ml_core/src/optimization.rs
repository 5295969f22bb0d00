/// An optimization algorithm updating a flat parameter buffer from a matching
/// gradient buffer.
pub trait Optimizer {
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]);
}

/// Gradient descent optimization algorithm.
pub struct GradientDescent {
    learning_rate: f32,
}

impl GradientDescent {
    /// Returns a new `GradientDescent`.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on `update_params`.
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for GradientDescent {
    /// Updates the parameters by making a step in the opposite direction of
    /// the gradient, with a length of `learning_rate`.
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]) {
        let lr = self.learning_rate;

        for (w, g) in params.iter_mut().zip(grad) {
            *w -= lr * g;
        }
    }
}

/// Adam optimization algorithm with bias-corrected moment estimates.
pub struct Adam {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,

    step: i32,
    m: Vec<f32>,
    v: Vec<f32>,
}

impl Adam {
    /// Returns a new `Adam` with the usual moment decay rates
    /// (beta1 = 0.9, beta2 = 0.999, epsilon = 1e-8).
    ///
    /// # Arguments
    /// * `learning_rate` - The base step size.
    pub fn new(learning_rate: f32) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            step: 0,
            m: Vec::new(),
            v: Vec::new(),
        }
    }
}

impl Optimizer for Adam {
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]) {
        if self.m.len() != params.len() {
            self.m = vec![0.0; params.len()];
            self.v = vec![0.0; params.len()];
            self.step = 0;
        }

        self.step += 1;
        let bias1 = 1.0 - self.beta1.powi(self.step);
        let bias2 = 1.0 - self.beta2.powi(self.step);

        for (i, (w, &g)) in params.iter_mut().zip(grad).enumerate() {
            self.m[i] = self.beta1 * self.m[i] + (1.0 - self.beta1) * g;
            self.v[i] = self.beta2 * self.v[i] + (1.0 - self.beta2) * g * g;

            let m_hat = self.m[i] / bias1;
            let v_hat = self.v[i] / bias2;

            *w -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gradient_descent_steps_against_the_gradient() {
        let mut opt = GradientDescent::new(0.1);
        let mut params = [1.0, -1.0];

        opt.update_params(&mut params, &[2.0, -2.0]);

        assert_eq!(params, [0.8, -0.8]);
    }

    #[test]
    fn adam_minimizes_a_quadratic() {
        // f(w) = w^2, df/dw = 2w, minimum at 0.
        let mut opt = Adam::new(0.1);
        let mut params = [5.0_f32];

        for _ in 0..500 {
            let grad = [2.0 * params[0]];
            opt.update_params(&mut params, &grad);
        }

        assert!(params[0].abs() < 0.05, "got {}", params[0]);
    }

    #[test]
    fn adam_first_step_has_unit_scale() {
        // With bias correction the very first update is close to lr * sign(g).
        let mut opt = Adam::new(0.001);
        let mut params = [0.0_f32];

        opt.update_params(&mut params, &[123.0]);

        assert!((params[0] + 0.001).abs() < 1e-5, "got {}", params[0]);
    }
}
