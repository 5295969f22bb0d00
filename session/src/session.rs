use std::mem;

use experiments::{
    Experiment, NormStats, PARAM_COUNT, ParamValues, Sample, TrainingSet, pendulum, separation,
};
use log::info;
use ndarray::Array2;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    config::{Architecture, TrainConfig},
    error::{Result, SessionErr},
    progress::{EpochProgress, LossHistory, NoopObserver, TrainObserver, TrainingSummary},
    trainer,
};

/// Where the session's model currently stands. The model is published
/// atomically: `Ready` always holds a complete network together with the
/// statistics it was trained under.
pub enum ModelState {
    /// No run has completed yet.
    Untrained,
    /// A run is executing; predictions are refused until it publishes.
    Training,
    /// A complete model, usable for prediction.
    Ready(TrainedModel),
}

/// A published model: the fitted network plus the normalization statistics
/// frozen when its run started. The pair never separates, so predictions made
/// after the set grows still use the statistics the network was trained with.
pub struct TrainedModel {
    net: ml_core::Sequential,
    stats: NormStats,
    architecture: Architecture,
}

impl TrainedModel {
    /// Returns the architecture this model was trained with.
    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Returns the normalization statistics the model was trained under.
    pub fn stats(&self) -> &NormStats {
        &self.stats
    }

    /// Runs one resolved input vector through the network and maps the result
    /// back to the experiment's output scale.
    fn predict(&mut self, inputs: &[f64; PARAM_COUNT]) -> Result<f64> {
        let z = self.stats.transform(inputs);

        let mut x = Array2::zeros((1, PARAM_COUNT));
        for (i, &v) in z.iter().enumerate() {
            x[[0, i]] = v as f32;
        }

        let y = self.net.predict(x.view())?;
        Ok(self.stats.denormalize_output(y[[0, 0]] as f64))
    }
}

/// One experiment's full lifecycle: its growing training set, the model state
/// machine, and the loss history of the latest run.
pub struct Session {
    experiment: Experiment,
    training_set: TrainingSet,
    state: ModelState,
    history: LossHistory,
    rng: StdRng,
}

impl Session {
    /// Creates a fresh session for an experiment, seeded from the OS.
    pub fn new(experiment: Experiment) -> Self {
        Self::from_rng(experiment, StdRng::from_os_rng())
    }

    /// Creates a session with a fixed seed, for reproducible runs.
    pub fn with_seed(experiment: Experiment, seed: u64) -> Self {
        Self::from_rng(experiment, StdRng::seed_from_u64(seed))
    }

    fn from_rng(experiment: Experiment, rng: StdRng) -> Self {
        Self {
            experiment,
            training_set: TrainingSet::new(experiment),
            state: ModelState::Untrained,
            history: Vec::new(),
            rng,
        }
    }

    /// Returns the experiment this session runs.
    pub fn experiment(&self) -> Experiment {
        self.experiment
    }

    /// Samples the current parameter values through the realistic generator
    /// and appends the labeled data point to the training set.
    ///
    /// A published model is untouched; it keeps predicting from the
    /// statistics of the run that produced it until the next run replaces it.
    pub fn add_sample(&mut self, values: &ParamValues) -> Sample {
        self.training_set.add_sample(values, &mut self.rng)
    }

    /// Returns the amount of collected samples.
    pub fn sample_count(&self) -> usize {
        self.training_set.len()
    }

    /// Returns the training set collected so far.
    pub fn training_set(&self) -> &TrainingSet {
        &self.training_set
    }

    /// Returns the per-epoch loss rows of the latest run.
    pub fn loss_history(&self) -> &[EpochProgress] {
        &self.history
    }

    /// Returns whether a training run is currently executing.
    pub fn is_training(&self) -> bool {
        matches!(self.state, ModelState::Training)
    }

    /// Returns the published model, if any.
    pub fn model(&self) -> Option<&TrainedModel> {
        match &self.state {
            ModelState::Ready(model) => Some(model),
            _ => None,
        }
    }

    /// Evaluates the experiment's textbook formula on the resolved inputs,
    /// ignoring every real-life parameter. Shown next to the model's
    /// prediction so the gap between the two is visible.
    pub fn formula_baseline(&self, values: &ParamValues) -> f64 {
        let inputs = values.resolve(self.experiment.catalog());
        match self.experiment {
            Experiment::Pendulum => pendulum::ideal_period(inputs[0], inputs[1], inputs[2]),
            Experiment::Separation => {
                separation::ideal_efficiency(inputs[0], inputs[1], inputs[2])
            }
        }
    }

    /// Trains a fresh model on the current set, discarding events.
    ///
    /// # Errors
    /// [`SessionErr::NotEnoughSamples`] below the experiment minimum,
    /// [`SessionErr::TrainingInProgress`] while another run executes.
    pub fn train(&mut self, architecture: Architecture) -> Result<TrainingSummary> {
        self.train_observed(architecture, &mut NoopObserver)
    }

    /// Trains a fresh model on the current set, reporting each epoch to the
    /// observer. The previous model stays published until the run completes,
    /// then is replaced in one step.
    ///
    /// The [`SessionErr::TrainingInProgress`] guard enforces the call-time
    /// contract on the `Training` flag. Through this synchronous `&mut self`
    /// API the exclusive borrow already rules a second start out, so the
    /// guard only fires for hosts that drive the state machine another way.
    pub fn train_observed<O: TrainObserver>(
        &mut self,
        architecture: Architecture,
        observer: &mut O,
    ) -> Result<TrainingSummary> {
        if self.is_training() {
            return Err(SessionErr::TrainingInProgress);
        }

        let samples = self.training_set.len();
        let required = self.experiment.min_samples();
        if samples < required {
            return Err(SessionErr::NotEnoughSamples {
                got: samples,
                required,
            });
        }

        // Freeze the statistics and configuration for the whole run.
        let stats = NormStats::fit(&self.training_set);
        let config = TrainConfig::for_experiment(self.experiment, architecture, samples);

        self.history.clear();
        let prior = mem::replace(&mut self.state, ModelState::Training);

        info!(
            "training started: architecture={} samples={samples} epochs={}",
            architecture.display_name(),
            config.epochs,
        );

        match trainer::fit(
            &self.training_set,
            &stats,
            &config,
            &mut self.history,
            observer,
            &mut self.rng,
        ) {
            Ok(outcome) => {
                self.state = ModelState::Ready(TrainedModel {
                    net: outcome.net,
                    stats,
                    architecture,
                });

                info!(
                    "training complete: epochs={} final_loss={:.6} final_val_loss={:.6}",
                    outcome.epochs_run, outcome.final_loss, outcome.final_val_loss,
                );

                Ok(TrainingSummary {
                    architecture,
                    samples,
                    epochs: outcome.epochs_run,
                    final_loss: outcome.final_loss,
                    final_val_loss: outcome.final_val_loss,
                })
            }
            Err(e) => {
                self.state = prior;
                Err(e.into())
            }
        }
    }

    /// Predicts the experiment's outcome for the given parameter values using
    /// the published model.
    ///
    /// # Errors
    /// [`SessionErr::ModelNotTrained`] before the first run completes,
    /// [`SessionErr::TrainingInProgress`] while a run executes.
    pub fn predict(&mut self, values: &ParamValues) -> Result<f64> {
        let inputs = values.resolve(self.experiment.catalog());
        match &mut self.state {
            ModelState::Untrained => Err(SessionErr::ModelNotTrained),
            ModelState::Training => Err(SessionErr::TrainingInProgress),
            ModelState::Ready(model) => model.predict(&inputs),
        }
    }

    /// Drops the collected samples, the published model and the loss history,
    /// returning the session to its initial state.
    pub fn reset(&mut self) {
        self.training_set = TrainingSet::new(self.experiment);
        self.state = ModelState::Untrained;
        self.history.clear();
    }
}
