use rand::Rng;

use crate::{
    catalog::{Experiment, PARAM_COUNT},
    params::ParamValues,
    pendulum, separation,
};

/// One collected data point: the ordered input vector (catalog order) and the
/// realistic measurement it was labeled with. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub inputs: [f64; PARAM_COUNT],
    pub output: f64,
}

/// The append-only collection of samples an experiment trains on. Insertion
/// order is preserved for display and for the validation split; no removal
/// operation exists.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    experiment: Experiment,
    samples: Vec<Sample>,
}

impl TrainingSet {
    /// Creates an empty training set for an experiment.
    pub fn new(experiment: Experiment) -> Self {
        Self {
            experiment,
            samples: Vec::new(),
        }
    }

    /// Returns the experiment this set belongs to.
    pub fn experiment(&self) -> Experiment {
        self.experiment
    }

    /// Samples the current parameter values, labels them through the
    /// realistic generator, and appends the resulting data point.
    ///
    /// # Arguments
    /// * `values` - Current slider values; missing keys fall back to the
    ///   descriptor defaults.
    /// * `rng` - The generator supplying the label's noise term.
    ///
    /// # Returns
    /// A copy of the freshly appended sample.
    pub fn add_sample<R: Rng>(&mut self, values: &ParamValues, rng: &mut R) -> Sample {
        let inputs = values.resolve(self.experiment.catalog());
        let output = match self.experiment {
            Experiment::Pendulum => pendulum::realistic_period(&inputs, rng),
            Experiment::Separation => separation::realistic_efficiency(&inputs, rng),
        };

        let sample = Sample { inputs, output };
        self.samples.push(sample);
        sample
    }

    /// Returns the collected samples in insertion order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Returns the amount of collected samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns whether no samples were collected yet.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns whether enough samples were collected to allow a training run.
    pub fn has_minimum(&self) -> bool {
        self.len() >= self.experiment.min_samples()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn samples_follow_catalog_order() {
        let mut set = TrainingSet::new(Experiment::Pendulum);
        let mut rng = StdRng::seed_from_u64(1);

        let mut values = ParamValues::new();
        values.set("gravity", 1.62).set("length", 4.0);
        let sample = set.add_sample(&values, &mut rng);

        assert_eq!(sample.inputs[0], 4.0);
        assert_eq!(sample.inputs[1], 1.62);
        // Unset sliders resolve to their defaults.
        assert_eq!(sample.inputs[2], 25.0);
    }

    #[test]
    fn appending_grows_the_set_in_order() {
        let mut set = TrainingSet::new(Experiment::Separation);
        let mut rng = StdRng::seed_from_u64(2);

        for i in 0..3 {
            let mut values = ParamValues::new();
            values.set("magnetic", 0.5 + i as f64 * 0.1);
            let sample = set.add_sample(&values, &mut rng);
            assert_eq!(set.samples().last(), Some(&sample));
        }

        assert_eq!(set.len(), 3);
        let magnetics: Vec<f64> = set.samples().iter().map(|s| s.inputs[0]).collect();
        assert_eq!(magnetics, vec![0.5, 0.6, 0.7]);
    }

    #[test]
    fn minimum_gate_matches_the_experiment() {
        let mut rng = StdRng::seed_from_u64(3);
        let values = ParamValues::new();

        let mut set = TrainingSet::new(Experiment::Pendulum);
        for _ in 0..4 {
            set.add_sample(&values, &mut rng);
        }
        assert!(!set.has_minimum());

        set.add_sample(&values, &mut rng);
        assert!(set.has_minimum());
    }

    #[test]
    fn labels_are_physically_valid() {
        let mut rng = StdRng::seed_from_u64(4);
        let values = ParamValues::new();

        let mut set = TrainingSet::new(Experiment::Separation);
        for _ in 0..20 {
            let sample = set.add_sample(&values, &mut rng);
            assert!((0.0..=100.0).contains(&sample.output));
        }
    }
}
