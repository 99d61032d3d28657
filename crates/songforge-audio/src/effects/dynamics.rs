//! Dynamics processing: compressor.

use super::{amp_to_db, db_to_amp};
use crate::error::{AudioError, AudioResult};

/// Applies compression to a mono buffer in place.
///
/// Gain reduction follows an envelope of the input level with separate
/// attack and release time constants. No makeup gain is applied here;
/// chains that need it add an explicit gain stage.
pub fn apply_compressor(
    samples: &mut [f64],
    threshold_db: f64,
    ratio: f64,
    attack_ms: f64,
    release_ms: f64,
    sample_rate: f64,
) -> AudioResult<()> {
    // Validate parameters
    if !(-60.0..=0.0).contains(&threshold_db) {
        return Err(AudioError::invalid_param(
            "compressor.threshold_db",
            format!("must be -60 to 0, got {}", threshold_db),
        ));
    }
    if !(1.0..=20.0).contains(&ratio) {
        return Err(AudioError::invalid_param(
            "compressor.ratio",
            format!("must be 1.0-20.0, got {}", ratio),
        ));
    }
    if !(0.1..=100.0).contains(&attack_ms) {
        return Err(AudioError::invalid_param(
            "compressor.attack_ms",
            format!("must be 0.1-100, got {}", attack_ms),
        ));
    }
    if !(10.0..=1000.0).contains(&release_ms) {
        return Err(AudioError::invalid_param(
            "compressor.release_ms",
            format!("must be 10-1000, got {}", release_ms),
        ));
    }

    // Convert time constants to coefficients
    let attack_coeff = (-1.0 / (attack_ms * 0.001 * sample_rate)).exp();
    let release_coeff = (-1.0 / (release_ms * 0.001 * sample_rate)).exp();

    let mut envelope = 0.0;

    for sample in samples.iter_mut() {
        let input = *sample;
        let input_level = input.abs();

        // Envelope follower
        if input_level > envelope {
            envelope = attack_coeff * envelope + (1.0 - attack_coeff) * input_level;
        } else {
            envelope = release_coeff * envelope + (1.0 - release_coeff) * input_level;
        }

        let envelope_db = amp_to_db(envelope);

        // Calculate gain reduction
        let gain_db = if envelope_db > threshold_db {
            let over_db = envelope_db - threshold_db;
            -(over_db * (1.0 - 1.0 / ratio))
        } else {
            0.0
        };

        *sample = input * db_to_amp(gain_db);
    }

    Ok(())
}
