use experiments::Experiment;
use serde::Serialize;

/// The fixed layer-width configuration selected for a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Architecture {
    Simple,
    Deep,
}

impl Architecture {
    /// Hidden layer widths, input to output.
    pub fn hidden_widths(&self) -> &'static [usize] {
        match self {
            Architecture::Simple => &[16, 8],
            Architecture::Deep => &[32, 24, 16, 8],
        }
    }

    /// Display name used by the completion event.
    pub fn display_name(&self) -> &'static str {
        match self {
            Architecture::Simple => "Simple Network",
            Architecture::Deep => "Deep Network",
        }
    }
}

/// Early-stopping policy: stop once the validation loss has not improved for
/// `patience` consecutive epochs, but never before `min_epochs` have run.
#[derive(Debug, Clone, Copy)]
pub struct EarlyStopping {
    pub patience: usize,
    pub min_epochs: usize,
}

/// Everything a single training run is parameterized by. Derived from the
/// experiment and the dataset size at start time and frozen for the run.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub architecture: Architecture,
    pub learning_rate: f32,
    pub epochs: usize,
    pub batch_size: usize,
    pub validation_split: f64,
    /// L2 coefficient applied to the leading hidden layers.
    pub l2: f32,
    /// Amount of leading hidden layers carrying the L2 penalty.
    pub l2_hidden: usize,
    /// Dropout rates after the leading hidden layers.
    pub dropout: &'static [f32],
    /// Output activation; `None` keeps the output unit linear.
    pub sigmoid_output: bool,
    pub early_stopping: Option<EarlyStopping>,
}

impl TrainConfig {
    /// Derives the run configuration the way the demos tune their two
    /// experiments.
    ///
    /// # Arguments
    /// * `experiment` - The experiment being trained.
    /// * `architecture` - The selected network size.
    /// * `samples` - Training-set size at start time.
    pub fn for_experiment(
        experiment: Experiment,
        architecture: Architecture,
        samples: usize,
    ) -> Self {
        match experiment {
            Experiment::Pendulum => Self {
                architecture,
                learning_rate: 0.001,
                epochs: 500,
                batch_size: samples.min(32).max(1),
                validation_split: 0.2,
                l2: 0.0,
                l2_hidden: 0,
                dropout: &[],
                sigmoid_output: false,
                early_stopping: None,
            },
            Experiment::Separation => Self {
                architecture,
                learning_rate: 0.001,
                // Scale the budget with the dataset, within fixed bounds.
                epochs: (samples * 20).clamp(200, 500),
                batch_size: ((samples as f64 * 0.4) as usize).min(8).max(1),
                validation_split: 0.2,
                l2: 0.001,
                l2_hidden: match architecture {
                    Architecture::Simple => 2,
                    Architecture::Deep => 3,
                },
                dropout: match architecture {
                    Architecture::Simple => &[0.1],
                    Architecture::Deep => &[0.15, 0.1],
                },
                sigmoid_output: true,
                early_stopping: Some(EarlyStopping {
                    patience: 50,
                    min_epochs: 100,
                }),
            },
        }
    }

    /// Amount of samples carved off the end of the set for validation.
    pub fn validation_len(&self, samples: usize) -> usize {
        (samples as f64 * self.validation_split) as usize
    }
}
