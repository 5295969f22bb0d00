use serde::Serialize;

/// Amount of input parameters per experiment.
pub const PARAM_COUNT: usize = 10;

/// Static descriptor of one slider-driven input parameter.
///
/// Descriptors tagged `formula` feed the closed-form baseline; the rest only
/// affect the realistic generator and the learned model.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParamDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
    pub formula: bool,
}

/// The two demonstrations sharing the data/training/prediction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Experiment {
    Pendulum,
    Separation,
}

impl Experiment {
    /// Returns this experiment's parameter catalog, in the fixed order every
    /// sample vector follows.
    pub fn catalog(&self) -> &'static [ParamDescriptor; PARAM_COUNT] {
        match self {
            Experiment::Pendulum => &PENDULUM_PARAMETERS,
            Experiment::Separation => &SEPARATION_PARAMETERS,
        }
    }

    /// Minimum training-set size before a training run is allowed. The
    /// separation demo asks for more points to bound overfitting on its
    /// noisier labels.
    pub fn min_samples(&self) -> usize {
        match self {
            Experiment::Pendulum => 5,
            Experiment::Separation => 10,
        }
    }

    /// Whether outputs are rescaled to `[0, 1]` for training and mapped back
    /// at prediction time.
    pub fn normalizes_output(&self) -> bool {
        matches!(self, Experiment::Separation)
    }
}

pub static PENDULUM_PARAMETERS: [ParamDescriptor; PARAM_COUNT] = [
    ParamDescriptor { key: "length", name: "Length (m)", min: 0.1, max: 30.0, step: 0.01, default: 1.0, formula: true },
    ParamDescriptor { key: "gravity", name: "Gravity (m/s²)", min: 0.1, max: 50.0, step: 0.01, default: 9.81, formula: true },
    ParamDescriptor { key: "temperature", name: "Temperature (°C)", min: -50.0, max: 100.0, step: 0.1, default: 25.0, formula: true },
    ParamDescriptor { key: "amplitude", name: "Amplitude (°)", min: 1.0, max: 85.0, step: 0.1, default: 11.0, formula: false },
    ParamDescriptor { key: "mass", name: "Mass (kg)", min: 0.01, max: 10.0, step: 0.01, default: 0.5, formula: false },
    ParamDescriptor { key: "airResistance", name: "Air Resistance", min: 0.0, max: 1.0, step: 0.001, default: 0.01, formula: false },
    ParamDescriptor { key: "mediumDensity", name: "Medium Density (kg/m³)", min: 0.01, max: 20.0, step: 0.01, default: 1.23, formula: false },
    ParamDescriptor { key: "releaseAngle", name: "Release Angle (°)", min: 1.0, max: 89.0, step: 0.1, default: 15.0, formula: false },
    ParamDescriptor { key: "stringStiffness", name: "String Stiffness (N/m)", min: 10.0, max: 10000.0, step: 10.0, default: 1000.0, formula: false },
    ParamDescriptor { key: "oscillationCount", name: "Oscillation Count", min: 1.0, max: 50.0, step: 1.0, default: 10.0, formula: false },
];

pub static SEPARATION_PARAMETERS: [ParamDescriptor; PARAM_COUNT] = [
    ParamDescriptor { key: "magnetic", name: "Magnetic Strength (T)", min: 0.1, max: 2.0, step: 0.01, default: 0.5, formula: true },
    ParamDescriptor { key: "solvent", name: "Solvent Volume (mL)", min: 10.0, max: 500.0, step: 1.0, default: 100.0, formula: true },
    ParamDescriptor { key: "evaporation", name: "Evaporation Rate (mL/min)", min: 1.0, max: 20.0, step: 0.1, default: 5.0, formula: true },
    ParamDescriptor { key: "particlesize", name: "Particle Size (µm)", min: 10.0, max: 1000.0, step: 10.0, default: 100.0, formula: false },
    ParamDescriptor { key: "stirring", name: "Stirring Speed (RPM)", min: 0.0, max: 1000.0, step: 10.0, default: 300.0, formula: false },
    ParamDescriptor { key: "temperature", name: "Temperature (°C)", min: 0.0, max: 100.0, step: 1.0, default: 25.0, formula: false },
    ParamDescriptor { key: "filterpore", name: "Filter Pore Size (µm)", min: 5.0, max: 500.0, step: 5.0, default: 50.0, formula: false },
    ParamDescriptor { key: "impurity", name: "Impurity (%)", min: 0.0, max: 50.0, step: 1.0, default: 5.0, formula: false },
    ParamDescriptor { key: "septime", name: "Separation Time (s)", min: 10.0, max: 300.0, step: 5.0, default: 60.0, formula: false },
    ParamDescriptor { key: "manual", name: "Manual Efficiency (%)", min: 50.0, max: 100.0, step: 1.0, default: 90.0, formula: false },
];
