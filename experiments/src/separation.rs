//! Ground-truth generator for the substance-separation experiment.
//!
//! The ideal efficiency is the sum of four independently capped sub-scores,
//! one per separation stage, each a saturating ratio against a fixed optimum.
//! `corrected_efficiency` layers the real-life factors on top in a fixed
//! order; `realistic_efficiency` adds bounded noise and clamps to `[0, 100]`.

use rand::Rng;

use crate::catalog::PARAM_COUNT;

/// Saturation field strength for magnetic separation of iron filings, in T.
const MAGNETIC_SATURATION: f64 = 2.0;

/// Solvent volume at which 10 g of salt fully dissolves, in mL.
const OPTIMAL_SOLVENT_VOLUME: f64 = 30.0;

/// Evaporation rate past which recovery no longer improves, in mL/min.
const OPTIMAL_EVAPORATION_RATE: f64 = 12.5;

/// Ideal separation efficiency in percent, from the three formula parameters.
/// Each stage contributes at most 25; filtration is fixed at its ideal value.
/// Pure and deterministic, result in `[0, 100]`.
pub fn ideal_efficiency(magnetic: f64, solvent: f64, evaporation: f64) -> f64 {
    let e_magnetic = 25.0_f64.min(magnetic / MAGNETIC_SATURATION * 25.0);
    let e_dissolution = 25.0_f64.min(25.0 * 1.0_f64.min(solvent / OPTIMAL_SOLVENT_VOLUME));
    let e_filtration = 25.0;
    let e_evaporation = 25.0_f64.min(25.0 * 1.0_f64.min(evaporation / OPTIMAL_EVAPORATION_RATE));

    e_magnetic + e_dissolution + e_filtration + e_evaporation
}

/// Efficiency with every real-life correction applied and the noise term
/// fixed to zero, capped at 100. Input order must match the separation
/// catalog.
pub fn corrected_efficiency(inputs: &[f64; PARAM_COUNT]) -> f64 {
    let [
        magnetic,
        solvent,
        evaporation,
        particle_size,
        stirring,
        temperature,
        filter_pore,
        impurity,
        sep_time,
        manual,
    ] = *inputs;

    let mut efficiency = ideal_efficiency(magnetic, solvent, evaporation);

    // Particle size: separation degrades away from the 100 µm optimum, at
    // most 15% and floored at a 30% total reduction.
    let size_deviation = (particle_size - 100.0).abs() / 100.0;
    efficiency *= (1.0 - size_deviation * 0.15).max(0.7);

    // Stirring: optimal in 200-400 RPM; ramps up below, decays above.
    let stirring_bonus = if (200.0..=400.0).contains(&stirring) {
        5.0
    } else if stirring > 400.0 {
        3.0 - (stirring - 400.0) / 600.0 * 3.0
    } else {
        stirring / 200.0 * 5.0
    };
    efficiency += stirring_bonus.max(0.0);

    // Solubility rises with temperature; up to 8 points above 20 °C.
    efficiency += (temperature - 20.0) / 80.0 * 8.0;

    // Filter pore size: too fine clogs, too coarse lets sand through.
    let filter_factor = if filter_pore < 20.0 {
        0.85 - (20.0 - filter_pore) / 20.0 * 0.15
    } else if filter_pore > 150.0 {
        1.0 - (filter_pore - 150.0) / 350.0 * 0.3
    } else {
        1.0
    };
    efficiency *= filter_factor.max(0.7);

    // Contaminants reduce the purity of the recovered materials.
    efficiency *= ((100.0 - impurity) / 100.0).max(0.5);

    // Insufficient time means incomplete separation.
    efficiency *= (sep_time / 60.0).min(1.0).max(0.5);

    // Human technique factor.
    efficiency *= manual / 100.0;

    efficiency.min(100.0)
}

/// Measured efficiency standing in for a real experiment: the corrected value
/// plus additive noise uniform in `[-2, 2)`, clamped to `[0, 100]` after the
/// noise is injected.
pub fn realistic_efficiency<R: Rng>(inputs: &[f64; PARAM_COUNT], rng: &mut R) -> f64 {
    let noise = (rng.random::<f64>() - 0.5) * 4.0;
    (corrected_efficiency(inputs) + noise).clamp(0.0, 100.0)
}
