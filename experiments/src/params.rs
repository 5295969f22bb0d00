use std::collections::HashMap;

use crate::catalog::{PARAM_COUNT, ParamDescriptor};

/// Current slider values keyed by parameter name, as handed over by the
/// rendering host. Keys the host never set resolve to the descriptor default.
#[derive(Debug, Default, Clone)]
pub struct ParamValues {
    values: HashMap<String, f64>,
}

impl ParamValues {
    /// Creates an empty value bag: every parameter resolves to its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current value for a parameter key.
    pub fn set(&mut self, key: &str, value: f64) -> &mut Self {
        self.values.insert(key.to_owned(), value);
        self
    }

    /// Returns the current value for a key, if one was set.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Resolves the ordered input vector for a catalog, falling back to each
    /// descriptor's default for missing keys.
    pub fn resolve(&self, catalog: &[ParamDescriptor; PARAM_COUNT]) -> [f64; PARAM_COUNT] {
        let mut inputs = [0.0; PARAM_COUNT];
        for (slot, p) in inputs.iter_mut().zip(catalog) {
            *slot = self.get(p.key).unwrap_or(p.default);
        }
        inputs
    }
}
