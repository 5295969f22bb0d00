use serde::Serialize;

use crate::config::Architecture;

/// One row of the loss history, emitted once per epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpochProgress {
    /// 1-based epoch counter.
    pub epoch: usize,
    /// Epoch budget of the run, for progress display.
    pub epochs: usize,
    pub loss: f32,
    pub val_loss: f32,
}

impl EpochProgress {
    /// Fraction of the epoch budget consumed so far, in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        self.epoch as f32 / self.epochs as f32
    }
}

/// Completion event carried back to the rendering host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingSummary {
    pub architecture: Architecture,
    pub samples: usize,
    /// Epochs actually run; lower than the budget when early stopping fired.
    pub epochs: usize,
    pub final_loss: f32,
    pub final_val_loss: f32,
}

/// Observer injected into the training loop. `on_epoch` is invoked once per
/// epoch and doubles as the loop's cooperative yield point: a host can render
/// progress from it before the next epoch starts.
pub trait TrainObserver {
    fn on_epoch(&mut self, progress: EpochProgress);
}

/// Observer that discards every event.
#[derive(Default)]
pub struct NoopObserver;

impl TrainObserver for NoopObserver {
    fn on_epoch(&mut self, _progress: EpochProgress) {}
}

/// Per-epoch rows of the current (or last) training run, for charting.
/// Cleared at the start of each run, append-only while it executes.
pub type LossHistory = Vec<EpochProgress>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fraction_spans_the_epoch_budget() {
        let progress = EpochProgress {
            epoch: 250,
            epochs: 500,
            loss: 0.1,
            val_loss: 0.2,
        };

        assert_eq!(progress.fraction(), 0.5);
    }
}
