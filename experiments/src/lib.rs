pub mod catalog;
pub mod dataset;
pub mod normalizer;
pub mod pendulum;
pub mod separation;

mod params;

pub use catalog::{Experiment, PARAM_COUNT, ParamDescriptor};
pub use dataset::{Sample, TrainingSet};
pub use normalizer::{NormStats, STD_EPSILON};
pub use params::ParamValues;
