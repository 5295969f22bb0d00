pub mod activations;
pub mod layers;
pub mod loss;
pub mod optimization;

mod error;
mod sequential;

pub use error::{MlErr, Result};
pub use sequential::Sequential;
