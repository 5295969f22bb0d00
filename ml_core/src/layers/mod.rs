mod dense;
mod dropout;

pub use dense::Dense;
pub use dropout::Dropout;

use ndarray::Array2;
use rand::Rng;

use crate::{Result, activations::ActFn};

/// A network layer. Information flows forward when computing an output and
/// backward when accumulating gradients.
pub enum Layer {
    Dense(Dense),
    Dropout(Dropout),
}

impl Layer {
    /// Creates a dense layer without weight penalty.
    ///
    /// # Arguments
    /// * `dim` - The (input, output) dimensions.
    /// * `act_fn` - The activation function, or `None` for a linear layer.
    pub fn dense(dim: (usize, usize), act_fn: Option<ActFn>) -> Self {
        Self::Dense(Dense::new(dim, act_fn, 0.0))
    }

    /// Creates a dense layer with an L2 weight penalty coefficient.
    pub fn dense_l2(dim: (usize, usize), act_fn: Option<ActFn>, l2: f32) -> Self {
        Self::Dense(Dense::new(dim, act_fn, l2))
    }

    /// Creates a dropout layer with the given drop rate.
    pub fn dropout(rate: f32) -> Self {
        Self::Dropout(Dropout::new(rate))
    }

    /// Returns the amount of parameters this layer owns in the flat buffer.
    pub fn size(&self) -> usize {
        match self {
            Layer::Dense(l) => l.size(),
            Layer::Dropout(_) => 0,
        }
    }

    /// Writes this layer's initial parameters into its slice of the flat buffer.
    pub fn init_params<R: Rng>(&self, params: &mut [f32], rng: &mut R) -> Result<()> {
        match self {
            Layer::Dense(l) => l.init_params(params, rng),
            Layer::Dropout(_) => Ok(()),
        }
    }

    /// Makes a forward pass through this layer.
    ///
    /// # Arguments
    /// * `params` - This layer's slice of the parameter buffer.
    /// * `x` - The input batch.
    /// * `train` - Whether the pass is part of a training step. Dropout is
    ///   only active while training.
    /// * `rng` - A random number generator, sampled only by dropout layers in
    ///   training mode.
    pub fn forward<R: Rng>(
        &mut self,
        params: &[f32],
        x: Array2<f32>,
        train: bool,
        rng: &mut R,
    ) -> Array2<f32> {
        match self {
            Layer::Dense(l) => l.forward(params, x),
            Layer::Dropout(l) => l.forward(x, train, rng),
        }
    }

    /// Makes a backward pass, accumulating into this layer's gradient slice.
    ///
    /// # Arguments
    /// * `params` - This layer's slice of the parameter buffer.
    /// * `grad` - This layer's slice of the gradient buffer.
    /// * `d` - The error signal flowing back from the next layer.
    ///
    /// # Returns
    /// The error signal for the previous layer.
    pub fn backward(&mut self, params: &[f32], grad: &mut [f32], d: Array2<f32>) -> Array2<f32> {
        match self {
            Layer::Dense(l) => l.backward(params, grad, d),
            Layer::Dropout(l) => l.backward(d),
        }
    }
}
