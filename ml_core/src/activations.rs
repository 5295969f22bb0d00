/// Element-wise activation functions used by dense layers.
///
/// A layer built without an `ActFn` is linear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActFn {
    Relu,
    Sigmoid,
}

impl ActFn {
    /// Applies the activation to a pre-activation value.
    pub fn f(&self, z: f32) -> f32 {
        match self {
            ActFn::Relu => z.max(0.0),
            ActFn::Sigmoid => 1.0 / (1.0 + (-z).exp()),
        }
    }

    /// Derivative of the activation with respect to the pre-activation value.
    pub fn df(&self, z: f32) -> f32 {
        match self {
            ActFn::Relu => {
                if z > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ActFn::Sigmoid => {
                let s = self.f(z);
                s * (1.0 - s)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn relu_clamps_negatives() {
        assert_eq!(ActFn::Relu.f(-3.0), 0.0);
        assert_eq!(ActFn::Relu.f(2.5), 2.5);
        assert_eq!(ActFn::Relu.df(-1.0), 0.0);
        assert_eq!(ActFn::Relu.df(1.0), 1.0);
    }

    #[test]
    fn sigmoid_is_centered_at_half() {
        assert!((ActFn::Sigmoid.f(0.0) - 0.5).abs() < 1e-6);
        assert!((ActFn::Sigmoid.df(0.0) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn sigmoid_saturates() {
        assert!(ActFn::Sigmoid.f(20.0) > 0.999);
        assert!(ActFn::Sigmoid.f(-20.0) < 0.001);
    }
}
