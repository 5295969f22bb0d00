use ndarray::{Axis, linalg, prelude::*};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{MlErr, Result, activations::ActFn};

/// A fully connected layer viewing its weights and biases inside the network's
/// flat parameter buffer. Weights occupy the first `in * out` slots of the
/// layer's slice, biases the remaining `out`.
pub struct Dense {
    dim: (usize, usize),
    act_fn: Option<ActFn>,
    l2: f32,
    size: usize,

    // Forward metadata kept for the backward pass.
    x: Array2<f32>,
    z: Array2<f32>,
}

impl Dense {
    /// Creates a new `Dense`.
    ///
    /// # Arguments
    /// * `dim` - The (input, output) dimensions.
    /// * `act_fn` - The activation function, or `None` for a linear layer.
    /// * `l2` - L2 weight penalty coefficient; `0.0` disables the penalty.
    pub fn new(dim: (usize, usize), act_fn: Option<ActFn>, l2: f32) -> Self {
        let zeros = Array2::zeros((0, 0));

        Self {
            dim,
            act_fn,
            l2,
            size: (dim.0 + 1) * dim.1,
            x: zeros.clone(),
            z: zeros,
        }
    }

    /// Returns the amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the input dimension of this layer.
    pub fn in_dim(&self) -> usize {
        self.dim.0
    }

    /// He-normal initialization: weights from `N(0, sqrt(2 / fan_in))`,
    /// biases zero.
    ///
    /// # Errors
    /// Returns `MlErr::InvalidInit` if the weight distribution cannot be
    /// constructed.
    pub fn init_params<R: Rng>(&self, params: &mut [f32], rng: &mut R) -> Result<()> {
        let std_dev = (2.0 / self.dim.0 as f32).sqrt();
        let normal =
            Normal::new(0.0, std_dev).map_err(|_| MlErr::InvalidInit("he-normal std dev"))?;

        let w_size = self.size - self.dim.1;
        for w in &mut params[..w_size] {
            *w = normal.sample(rng);
        }
        params[w_size..].fill(0.0);

        Ok(())
    }

    /// Makes a forward pass through the layer, keeping the input and the
    /// pre-activation batch for the backward pass.
    pub fn forward(&mut self, params: &[f32], x: Array2<f32>) -> Array2<f32> {
        let (w, b) = self.view_params(params);

        let mut z = Array2::zeros((x.nrows(), self.dim.1));
        linalg::general_mat_mul(1.0, &x, &w, 0.0, &mut z);
        z += &b;

        self.x = x;
        self.z = z;

        match self.act_fn {
            Some(act_fn) => self.z.mapv(|z| act_fn.f(z)),
            None => self.z.clone(),
        }
    }

    /// Makes a backward pass, accumulating the weight and bias gradients into
    /// `grad` and returning the error signal for the previous layer.
    pub fn backward(&mut self, params: &[f32], grad: &mut [f32], mut d: Array2<f32>) -> Array2<f32> {
        if let Some(act_fn) = &self.act_fn {
            d.zip_mut_with(&self.z, |d, &z| *d *= act_fn.df(z));
        }

        let (w, _) = self.view_params(params);
        let (mut dw, mut db) = self.view_grad(grad);

        linalg::general_mat_mul(1.0, &self.x.t(), &d, 1.0, &mut dw);
        db += &d.sum_axis(Axis(0));

        if self.l2 > 0.0 {
            dw.scaled_add(2.0 * self.l2, &w);
        }

        let mut d_prev = Array2::zeros((d.nrows(), w.nrows()));
        linalg::general_mat_mul(1.0, &d, &w.t(), 0.0, &mut d_prev);
        d_prev
    }

    /// Gives a view of the raw parameter slice as the weights and biases of this layer.
    fn view_params<'a>(&self, params: &'a [f32]) -> (ArrayView2<'a, f32>, ArrayView1<'a, f32>) {
        let w_size = self.size - self.dim.1;
        let weights = ArrayView2::from_shape(self.dim, &params[..w_size]).unwrap();
        let biases = ArrayView1::from_shape(self.dim.1, &params[w_size..]).unwrap();
        (weights, biases)
    }

    /// Gives a view of the raw gradient slice as the delta weights and delta biases of this layer.
    fn view_grad<'a>(&self, grad: &'a mut [f32]) -> (ArrayViewMut2<'a, f32>, ArrayViewMut1<'a, f32>) {
        let w_size = self.size - self.dim.1;
        let (dw_raw, db_raw) = grad.split_at_mut(w_size);
        let dw = ArrayViewMut2::from_shape(self.dim, dw_raw).unwrap();
        let db = ArrayViewMut1::from_shape(self.dim.1, db_raw).unwrap();
        (dw, db)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn forward_matches_manual_affine_map() {
        let mut layer = Dense::new((2, 1), None, 0.0);
        // w = [[1], [2]], b = [0.5]
        let params = [1.0, 2.0, 0.5];

        let x = Array2::from_shape_vec((1, 2), vec![3.0, 4.0]).unwrap();
        let y = layer.forward(&params, x);

        assert_eq!(y[[0, 0]], 3.0 + 8.0 + 0.5);
    }

    #[test]
    fn backward_accumulates_weight_gradients() {
        let mut layer = Dense::new((2, 1), None, 0.0);
        let params = [1.0, 2.0, 0.5];
        let mut grad = [0.0; 3];

        let x = Array2::from_shape_vec((1, 2), vec![3.0, 4.0]).unwrap();
        layer.forward(&params, x);

        let d = Array2::from_elem((1, 1), 1.0);
        let d_prev = layer.backward(&params, &mut grad, d);

        // dw = x^T . d, db = d, d_prev = d . w^T
        assert_eq!(grad, [3.0, 4.0, 1.0]);
        assert_eq!(d_prev[[0, 0]], 1.0);
        assert_eq!(d_prev[[0, 1]], 2.0);
    }

    #[test]
    fn l2_penalty_shifts_weight_gradients() {
        let mut plain = Dense::new((1, 1), None, 0.0);
        let mut penalized = Dense::new((1, 1), None, 0.001);
        let params = [2.0, 0.0];

        let x = Array2::from_elem((1, 1), 1.0);
        plain.forward(&params, x.clone());
        penalized.forward(&params, x);

        let mut g_plain = [0.0; 2];
        let mut g_pen = [0.0; 2];
        plain.backward(&params, &mut g_plain, Array2::from_elem((1, 1), 1.0));
        penalized.backward(&params, &mut g_pen, Array2::from_elem((1, 1), 1.0));

        let expected = g_plain[0] + 2.0 * 0.001 * params[0];
        assert!((g_pen[0] - expected).abs() < 1e-6);
        assert_eq!(g_pen[1], g_plain[1]);
    }

    #[test]
    fn init_zeroes_biases() {
        let layer = Dense::new((4, 3), Some(ActFn::Relu), 0.0);
        let mut params = vec![1.0; layer.size()];
        let mut rng = StdRng::seed_from_u64(7);

        layer.init_params(&mut params, &mut rng).unwrap();

        assert!(params[12..].iter().all(|&b| b == 0.0));
        assert!(params[..12].iter().any(|&w| w != 0.0));
    }
}
