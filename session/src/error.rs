use std::{
    error::Error,
    fmt::{self, Display},
};

use ml_core::MlErr;

/// The result type used in the entire session crate.
pub type Result<T> = std::result::Result<T, SessionErr>;

/// Failures surfaced to the rendering host. Every variant is terminal for the
/// call that produced it; the session stays usable afterwards.
#[derive(Debug)]
pub enum SessionErr {
    /// Training was requested below the experiment's minimum sample count.
    NotEnoughSamples { got: usize, required: usize },

    /// Training was requested while a run is already in progress.
    TrainingInProgress,

    /// A prediction was requested before any model was published.
    ModelNotTrained,

    /// The network violated one of its own invariants.
    Network(MlErr),
}

impl Display for SessionErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionErr::NotEnoughSamples { got, required } => {
                write!(f, "not enough samples to train: got {got}, need {required}")
            }
            SessionErr::TrainingInProgress => write!(f, "a training run is already in progress"),
            SessionErr::ModelNotTrained => write!(f, "no model has been trained yet"),
            SessionErr::Network(e) => write!(f, "network error: {e}"),
        }
    }
}

impl Error for SessionErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionErr::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MlErr> for SessionErr {
    fn from(value: MlErr) -> Self {
        Self::Network(value)
    }
}
