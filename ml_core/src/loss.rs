use ndarray::{Array2, ArrayView2};

/// A differentiable loss function over prediction batches.
pub trait LossFn {
    /// Computes the scalar loss for a batch of predictions.
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32;

    /// Computes the derivative of the loss with respect to the predictions.
    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Array2<f32>;
}

/// Mean squared error loss function.
#[derive(Default, Clone, Copy)]
pub struct Mse;

impl Mse {
    /// Returns a new `Mse`.
    pub fn new() -> Self {
        Self
    }
}

impl LossFn for Mse {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32 {
        (&y_pred - &y)
            .mapv(|x| x.powi(2))
            .mean()
            .unwrap_or_default()
    }

    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Array2<f32> {
        (&y_pred - &y) * (2.0 / y_pred.len() as f32)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mse_of_equal_batches_is_zero() {
        let y = Array2::from_shape_vec((2, 1), vec![1.0, -1.0]).unwrap();
        assert_eq!(Mse::new().loss(y.view(), y.view()), 0.0);
    }

    #[test]
    fn mse_averages_squared_errors() {
        let y_pred = Array2::from_shape_vec((2, 1), vec![2.0, 0.0]).unwrap();
        let y = Array2::from_shape_vec((2, 1), vec![0.0, 0.0]).unwrap();

        assert_eq!(Mse::new().loss(y_pred.view(), y.view()), 2.0);
    }

    #[test]
    fn prime_points_from_target_to_prediction() {
        let y_pred = Array2::from_shape_vec((1, 1), vec![3.0]).unwrap();
        let y = Array2::from_shape_vec((1, 1), vec![1.0]).unwrap();

        let d = Mse::new().loss_prime(y_pred.view(), y.view());
        assert_eq!(d[[0, 0]], 4.0);
    }
}
