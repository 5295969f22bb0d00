mod config;
mod error;
mod progress;
mod session;
mod trainer;

pub use config::{Architecture, EarlyStopping, TrainConfig};
pub use error::{Result, SessionErr};
pub use progress::{EpochProgress, LossHistory, NoopObserver, TrainObserver, TrainingSummary};
pub use session::{ModelState, Session, TrainedModel};
