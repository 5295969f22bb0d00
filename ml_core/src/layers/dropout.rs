use ndarray::Array2;
use rand::Rng;

/// Inverted dropout: active units are scaled by `1 / (1 - rate)` while
/// training so inference needs no rescaling.
pub struct Dropout {
    rate: f32,
    mask: Array2<f32>,
}

impl Dropout {
    /// Creates a new `Dropout`.
    ///
    /// # Arguments
    /// * `rate` - The fraction of units dropped per training pass, in `[0, 1)`.
    pub fn new(rate: f32) -> Self {
        Self {
            rate: rate.clamp(0.0, 0.999),
            mask: Array2::zeros((0, 0)),
        }
    }

    /// Makes a forward pass. Outside of training the input passes through
    /// untouched and `rng` is never sampled.
    pub fn forward<R: Rng>(&mut self, x: Array2<f32>, train: bool, rng: &mut R) -> Array2<f32> {
        if !train {
            return x;
        }

        let keep = 1.0 - self.rate;
        self.mask = Array2::from_shape_simple_fn(x.dim(), || {
            if rng.random::<f32>() < keep {
                1.0 / keep
            } else {
                0.0
            }
        });

        x * &self.mask
    }

    /// Propagates the error signal through the mask sampled by the last
    /// training-mode forward pass.
    pub fn backward(&mut self, d: Array2<f32>) -> Array2<f32> {
        debug_assert_eq!(self.mask.dim(), d.dim());
        d * &self.mask
    }
}
