use ndarray::{Array2, ArrayView2};
use rand::Rng;

use crate::{
    MlErr, Result,
    layers::Layer,
    loss::LossFn,
    optimization::Optimizer,
};

/// A sequential model over a flat parameter buffer: information flows forward
/// when computing an output and backward when accumulating the gradients of
/// its layers.
pub struct Sequential {
    layers: Vec<Layer>,
    params: Vec<f32>,
    grads: Vec<f32>,
}

impl Sequential {
    /// Creates a new `Sequential` and initializes every layer's parameters.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of.
    /// * `rng` - A random number generator used for weight initialization.
    ///
    /// # Errors
    /// Returns `MlErr::InvalidInit` if a layer cannot build its weight
    /// distribution.
    pub fn init<I, R>(layers: I, rng: &mut R) -> Result<Self>
    where
        I: IntoIterator<Item = Layer>,
        R: Rng,
    {
        let layers: Vec<Layer> = layers.into_iter().collect();
        let size = layers.iter().map(Layer::size).sum();

        let mut params = vec![0.0; size];
        let mut rest = params.as_mut_slice();
        for layer in &layers {
            let (chunk, tail) = rest.split_at_mut(layer.size());
            layer.init_params(chunk, rng)?;
            rest = tail;
        }

        Ok(Self {
            layers,
            params,
            grads: vec![0.0; size],
        })
    }

    /// Returns the total amount of parameters of the model.
    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    /// Returns the flat parameter buffer.
    pub fn params(&self) -> &[f32] {
        &self.params
    }

    /// Returns the flat parameter buffer mutably.
    pub fn params_mut(&mut self) -> &mut [f32] {
        &mut self.params
    }

    /// Makes a forward pass through the network.
    ///
    /// # Arguments
    /// * `x` - The input batch, one sample per row.
    /// * `train` - Whether dropout layers should be active.
    /// * `rng` - A random number generator, sampled only by dropout layers in
    ///   training mode.
    ///
    /// # Errors
    /// Returns `MlErr::ShapeMismatch` if the input width does not match the
    /// first dense layer.
    pub fn forward<R: Rng>(
        &mut self,
        x: ArrayView2<f32>,
        train: bool,
        rng: &mut R,
    ) -> Result<Array2<f32>> {
        if let Some(expected) = self.input_dim()
            && x.ncols() != expected
        {
            return Err(MlErr::ShapeMismatch {
                what: "input",
                got: x.ncols(),
                expected,
            });
        }

        let Self { layers, params, .. } = self;

        let mut a = x.to_owned();
        let mut rest = params.as_slice();
        for layer in layers.iter_mut() {
            let (chunk, tail) = rest.split_at(layer.size());
            a = layer.forward(chunk, a, train, rng);
            rest = tail;
        }

        Ok(a)
    }

    /// Makes an inference pass: dropout inactive, no randomness consumed.
    pub fn predict(&mut self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.forward(x, false, &mut rand::rng())
    }

    /// Runs one optimization step over a single batch.
    ///
    /// # Arguments
    /// * `x` - The input batch.
    /// * `y` - The expected outputs, one row per input row.
    /// * `loss_fn` - The loss measuring the prediction error.
    /// * `optimizer` - The algorithm applying the accumulated gradients.
    /// * `rng` - A random number generator for dropout masks.
    ///
    /// # Returns
    /// The batch's data loss (weight penalties contribute to the gradients
    /// but are not folded into the reported value).
    pub fn train_batch<L, O, R>(
        &mut self,
        x: ArrayView2<f32>,
        y: ArrayView2<f32>,
        loss_fn: &L,
        optimizer: &mut O,
        rng: &mut R,
    ) -> Result<f32>
    where
        L: LossFn,
        O: Optimizer,
        R: Rng,
    {
        if x.nrows() != y.nrows() {
            return Err(MlErr::ShapeMismatch {
                what: "batch",
                got: y.nrows(),
                expected: x.nrows(),
            });
        }

        self.grads.fill(0.0);

        let y_pred = self.forward(x, true, rng)?;
        let loss = loss_fn.loss(y_pred.view(), y);
        let d = loss_fn.loss_prime(y_pred.view(), y);

        self.backward(d);
        optimizer.update_params(&mut self.params, &self.grads);

        Ok(loss)
    }

    /// Computes the loss over a batch in inference mode, without updating any
    /// parameter.
    pub fn evaluate<L: LossFn>(
        &mut self,
        x: ArrayView2<f32>,
        y: ArrayView2<f32>,
        loss_fn: &L,
    ) -> Result<f32> {
        let y_pred = self.predict(x)?;
        Ok(loss_fn.loss(y_pred.view(), y))
    }

    fn backward(&mut self, mut d: Array2<f32>) {
        let Self {
            layers,
            params,
            grads,
        } = self;

        let mut end = params.len();
        for layer in layers.iter_mut().rev() {
            let start = end - layer.size();
            d = layer.backward(&params[start..end], &mut grads[start..end], d);
            end = start;
        }
    }

    fn input_dim(&self) -> Option<usize> {
        self.layers.iter().find_map(|layer| match layer {
            Layer::Dense(l) => Some(l.in_dim()),
            Layer::Dropout(_) => None,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{activations::ActFn, loss::Mse, optimization::Adam};
    use ndarray::Array2;
    use rand::{SeedableRng, rngs::StdRng};

    fn batch(rows: &[(f32, f32)]) -> (Array2<f32>, Array2<f32>) {
        let x = Array2::from_shape_vec((rows.len(), 1), rows.iter().map(|r| r.0).collect());
        let y = Array2::from_shape_vec((rows.len(), 1), rows.iter().map(|r| r.1).collect());
        (x.unwrap(), y.unwrap())
    }

    #[test]
    fn rejects_mismatched_input_width() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut net = Sequential::init([Layer::dense((3, 1), None)], &mut rng).unwrap();

        let x = Array2::zeros((1, 2));
        let res = net.predict(x.view());

        assert!(matches!(
            res,
            Err(MlErr::ShapeMismatch {
                what: "input",
                got: 2,
                expected: 3,
            })
        ));
    }

    #[test]
    fn fits_a_line() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut net = Sequential::init([Layer::dense((1, 1), None)], &mut rng).unwrap();

        let (x, y) = batch(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0), (3.0, 7.0)]);

        let mut adam = Adam::new(0.05);
        let mse = Mse::new();
        let mut loss = f32::MAX;
        for _ in 0..2000 {
            loss = net
                .train_batch(x.view(), y.view(), &mse, &mut adam, &mut rng)
                .unwrap();
        }

        assert!(loss < 1e-3, "final loss {loss}");
        // y = 2x + 1
        assert!((net.params()[0] - 2.0).abs() < 0.05);
        assert!((net.params()[1] - 1.0).abs() < 0.05);
    }

    #[test]
    fn converges_on_xor2() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut net = Sequential::init(
            [
                Layer::dense((2, 8), Some(ActFn::Sigmoid)),
                Layer::dense((8, 1), Some(ActFn::Sigmoid)),
            ],
            &mut rng,
        )
        .unwrap();

        let x = Array2::from_shape_vec((4, 2), vec![0., 0., 0., 1., 1., 0., 1., 1.]).unwrap();
        let y = Array2::from_shape_vec((4, 1), vec![0., 1., 1., 0.]).unwrap();

        let mut adam = Adam::new(0.05);
        let mse = Mse::new();
        for _ in 0..3000 {
            net.train_batch(x.view(), y.view(), &mse, &mut adam, &mut rng)
                .unwrap();
        }

        let y_pred = net.predict(x.view()).unwrap();
        for (pred, expected) in y_pred.iter().zip(y.iter()) {
            assert!(
                (pred - expected).abs() < 0.3,
                "pred {pred}, expected {expected}"
            );
        }
    }

    #[test]
    fn prediction_is_deterministic_with_dropout_layers() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut net = Sequential::init(
            [
                Layer::dense((2, 4), Some(ActFn::Relu)),
                Layer::dropout(0.5),
                Layer::dense((4, 1), None),
            ],
            &mut rng,
        )
        .unwrap();

        let x = Array2::from_shape_vec((1, 2), vec![0.3, -0.7]).unwrap();
        let a = net.predict(x.view()).unwrap();
        let b = net.predict(x.view()).unwrap();

        assert_eq!(a, b);
    }
}
