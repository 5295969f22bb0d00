//! Ground-truth generator for the pendulum period experiment.
//!
//! `ideal_period` is the textbook formula over the three formula parameters.
//! `corrected_period` layers the real-life correction factors on top, in a
//! fixed order, with no randomness. `realistic_period` adds the bounded noise
//! term and is what labels training samples.

use rand::Rng;

use crate::catalog::PARAM_COUNT;

/// Thermal expansion coefficient for a typical string material, per °C.
const THERMAL_EXPANSION_ALPHA: f64 = 1.2e-5;

/// Reference temperature at which the nominal length is measured.
const REFERENCE_TEMP: f64 = 20.0;

/// Ideal period from the simple pendulum formula `T = 2π·sqrt(L/g)`, with the
/// length adjusted for thermal expansion. Pure and deterministic.
///
/// # Arguments
/// * `length` - String length in meters, > 0.
/// * `gravity` - Gravitational acceleration in m/s², > 0.
/// * `temperature` - Ambient temperature in °C.
pub fn ideal_period(length: f64, gravity: f64, temperature: f64) -> f64 {
    let thermal_expansion = THERMAL_EXPANSION_ALPHA * (temperature - REFERENCE_TEMP);
    let effective_length = length * (1.0 + thermal_expansion);

    2.0 * std::f64::consts::PI * (effective_length / gravity).sqrt()
}

/// Period with every real-life correction applied and the noise term fixed to
/// zero. Input order must match the pendulum catalog.
///
/// Corrections, in order: large-angle restoring-force expansion (active above
/// 0.2 rad), air damping, string stiffness, release-angle offset. Mass and
/// oscillation count carry no correction.
pub fn corrected_period(inputs: &[f64; PARAM_COUNT]) -> f64 {
    let [
        length,
        gravity,
        temperature,
        amplitude,
        _mass,
        air_resistance,
        medium_density,
        release_angle,
        string_stiffness,
        _oscillation_count,
    ] = *inputs;

    let mut period = ideal_period(length, gravity, temperature);

    // Large angle correction (non-linear restoring force), T(a)/T0 expansion.
    let angle_rad = amplitude.to_radians();
    if angle_rad > 0.2 {
        let a2 = angle_rad * angle_rad;
        period *= 1.0 + a2 / 16.0 + 11.0 * a2 * a2 / 3072.0;
    }

    // Damping increases the period slightly.
    let drag_factor = air_resistance * medium_density;
    period *= 1.0 + drag_factor * 0.01;

    // Rigid strings reduce the effective length.
    period *= 1.0 - (10000.0 - string_stiffness) / 100000.0;

    // Release angle affects the initial conditions beyond the amplitude.
    let release_rad = release_angle.to_radians();
    if release_rad > 0.3 {
        period *= 1.0 + release_rad * 0.05;
    }

    period
}

/// Measured period standing in for a real experiment: the corrected period
/// scaled by a multiplicative noise factor `1 + u`, `u` uniform in
/// `[-0.01, 0.01)`, clamped to stay physically valid.
pub fn realistic_period<R: Rng>(inputs: &[f64; PARAM_COUNT], rng: &mut R) -> f64 {
    let noise = (rng.random::<f64>() - 0.5) * 0.02;
    (corrected_period(inputs) * (1.0 + noise)).max(0.0)
}
