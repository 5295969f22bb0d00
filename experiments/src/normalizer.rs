use crate::{
    catalog::PARAM_COUNT,
    dataset::TrainingSet,
};

/// Epsilon added to every standard deviation (and to the output range) before
/// dividing. Keeps constant features finite instead of raising an error.
pub const STD_EPSILON: f64 = 1e-7;

/// Normalization statistics frozen at the start of a training run and owned
/// by the published model afterwards. The set may keep growing; the
/// statistics never follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormStats {
    input_mean: [f64; PARAM_COUNT],
    input_std: [f64; PARAM_COUNT],
    output_range: Option<(f64, f64)>,
}

impl NormStats {
    /// Computes per-feature mean and population standard deviation over all
    /// sample inputs and, for experiments that rescale their outputs, the
    /// output min/max.
    ///
    /// Expects a non-empty set; training runs are gated on the experiment
    /// minimum well above that.
    pub fn fit(set: &TrainingSet) -> Self {
        let n = set.len().max(1) as f64;

        let mut input_mean = [0.0; PARAM_COUNT];
        for sample in set.samples() {
            for (mean, x) in input_mean.iter_mut().zip(&sample.inputs) {
                *mean += x / n;
            }
        }

        let mut input_std = [0.0; PARAM_COUNT];
        for sample in set.samples() {
            for ((var, x), mean) in input_std.iter_mut().zip(&sample.inputs).zip(&input_mean) {
                *var += (x - mean).powi(2) / n;
            }
        }
        for std in &mut input_std {
            *std = std.sqrt();
        }

        let output_range = set.experiment().normalizes_output().then(|| {
            set.samples().iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(min, max), sample| (min.min(sample.output), max.max(sample.output)),
            )
        });

        Self {
            input_mean,
            input_std,
            output_range,
        }
    }

    /// Z-scores an input vector: `(x - mean) / (std + ε)` per feature.
    pub fn transform(&self, inputs: &[f64; PARAM_COUNT]) -> [f64; PARAM_COUNT] {
        let mut out = [0.0; PARAM_COUNT];
        for i in 0..PARAM_COUNT {
            out[i] = (inputs[i] - self.input_mean[i]) / (self.input_std[i] + STD_EPSILON);
        }
        out
    }

    /// Rescales an output to `[0, 1]` for training. Identity for experiments
    /// without an output range.
    pub fn normalize_output(&self, y: f64) -> f64 {
        match self.output_range {
            Some((min, max)) => (y - min) / (max - min + STD_EPSILON),
            None => y,
        }
    }

    /// Maps a normalized prediction back to the original output scale:
    /// `y · (max - min) + min`. Identity without an output range.
    pub fn denormalize_output(&self, y: f64) -> f64 {
        match self.output_range {
            Some((min, max)) => y * (max - min) + min,
            None => y,
        }
    }

    /// Returns the per-feature means.
    pub fn input_mean(&self) -> &[f64; PARAM_COUNT] {
        &self.input_mean
    }

    /// Returns the per-feature population standard deviations.
    pub fn input_std(&self) -> &[f64; PARAM_COUNT] {
        &self.input_std
    }

    /// Returns the output min/max, present for experiments that rescale
    /// their outputs.
    pub fn output_range(&self) -> Option<(f64, f64)> {
        self.output_range
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{catalog::Experiment, params::ParamValues};
    use rand::{SeedableRng, rngs::StdRng};

    fn pendulum_set(lengths: &[f64]) -> TrainingSet {
        let mut set = TrainingSet::new(Experiment::Pendulum);
        let mut rng = StdRng::seed_from_u64(9);

        for &length in lengths {
            let mut values = ParamValues::new();
            values.set("length", length);
            set.add_sample(&values, &mut rng);
        }
        set
    }

    #[test]
    fn mean_and_population_std_over_the_length_feature() {
        let set = pendulum_set(&[1.0, 2.0, 3.0, 4.0]);
        let stats = NormStats::fit(&set);

        assert!((stats.input_mean()[0] - 2.5).abs() < 1e-12);
        // Population std of {1, 2, 3, 4} is sqrt(1.25).
        assert!((stats.input_std()[0] - 1.25_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn constant_features_are_absorbed_by_the_epsilon() {
        let set = pendulum_set(&[1.0, 1.0, 1.0]);
        let stats = NormStats::fit(&set);

        // Gravity never moved; its std is zero but transforming stays finite.
        let inputs = ParamValues::new().resolve(Experiment::Pendulum.catalog());
        let z = stats.transform(&inputs);
        assert!(z.iter().all(|v| v.is_finite()));
        assert_eq!(z[1], 0.0);
    }

    #[test]
    fn transform_round_trips_for_varying_features() {
        let set = pendulum_set(&[0.5, 1.5, 2.5]);
        let stats = NormStats::fit(&set);

        let mut values = ParamValues::new();
        values.set("length", 1.8);
        let inputs = values.resolve(Experiment::Pendulum.catalog());

        let z = stats.transform(&inputs);
        let back = z[0] * (stats.input_std()[0] + STD_EPSILON) + stats.input_mean()[0];
        assert!((back - 1.8).abs() < 1e-12);
    }

    #[test]
    fn pendulum_outputs_are_not_rescaled() {
        let set = pendulum_set(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let stats = NormStats::fit(&set);

        assert!(stats.output_range().is_none());
        assert_eq!(stats.normalize_output(2.5), 2.5);
        assert_eq!(stats.denormalize_output(2.5), 2.5);
    }

    #[test]
    fn separation_output_round_trip() {
        let mut set = TrainingSet::new(Experiment::Separation);
        let mut rng = StdRng::seed_from_u64(10);
        let values = ParamValues::new();
        for _ in 0..10 {
            set.add_sample(&values, &mut rng);
        }

        let stats = NormStats::fit(&set);
        let (min, max) = stats.output_range().unwrap();
        assert!(min < max);

        for y in [min, (min + max) / 2.0, max] {
            let round = stats.denormalize_output(stats.normalize_output(y));
            assert!((round - y).abs() < 1e-5);
        }
    }

    #[test]
    fn degenerate_output_range_stays_finite() {
        // Every label identical: the epsilon keeps the forward map finite and
        // denormalization returns the shared value.
        let stats = NormStats {
            input_mean: [0.0; PARAM_COUNT],
            input_std: [1.0; PARAM_COUNT],
            output_range: Some((5.0, 5.0)),
        };

        let z = stats.normalize_output(5.0);
        assert_eq!(z, 0.0);
        assert_eq!(stats.denormalize_output(z), 5.0);
    }
}
