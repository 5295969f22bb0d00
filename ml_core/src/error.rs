use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire ml_core crate.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The network's error type.
#[derive(Debug)]
pub enum MlErr {
    /// A shape invariant was violated (e.g. mismatched lengths).
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    /// A weight distribution could not be constructed from the layer's dimensions.
    InvalidInit(&'static str),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::ShapeMismatch {
                what,
                got,
                expected,
            } => {
                write!(
                    f,
                    "shape mismatch for {what}: got {got}, expected {expected}"
                )
            }
            MlErr::InvalidInit(msg) => write!(f, "invalid initialization: {msg}"),
        }
    }
}

impl Error for MlErr {}
