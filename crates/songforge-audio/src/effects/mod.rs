//! Pure effect stage descriptors and the chain runner.
//!
//! An effect chain is an explicit ordered list of [`Effect`] values;
//! each stage is a pure function from a buffer plus parameters to a
//! buffer of the same length. Any internal continuity an effect needs
//! (delay lines, filter memories, envelope followers) lives in local
//! values inside the stage call, never in hidden object state, so
//! chains can be rebuilt and re-run freely per request.

pub mod chorus;
pub mod dynamics;
pub mod reverb;

use crate::error::AudioResult;
use crate::filter::{BiquadCoeffs, BiquadFilter, BUTTERWORTH_Q};

/// A single effect stage with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Envelope-follower compressor.
    Compressor {
        threshold_db: f64,
        ratio: f64,
        attack_ms: f64,
        release_ms: f64,
    },
    /// Modulated-delay chorus with feedback.
    Chorus {
        rate_hz: f64,
        depth: f64,
        centre_delay_ms: f64,
        feedback: f64,
        mix: f64,
    },
    /// Freeverb-style reverb.
    Reverb {
        room_size: f64,
        damping: f64,
        wet: f64,
        dry: f64,
        width: f64,
    },
    /// Flat gain in dB.
    Gain { gain_db: f64 },
    /// Butterworth highpass.
    Highpass { cutoff_hz: f64 },
    /// Butterworth lowpass.
    Lowpass { cutoff_hz: f64 },
}

/// Applies a chain of effects to a mono buffer in place.
///
/// Stages run in list order; the buffer length never changes.
pub fn apply_effect_chain(
    samples: &mut [f64],
    effects: &[Effect],
    sample_rate: f64,
) -> AudioResult<()> {
    for effect in effects {
        apply_single_effect(samples, effect, sample_rate)?;
    }
    Ok(())
}

/// Applies a single effect stage to a mono buffer in place.
pub fn apply_single_effect(
    samples: &mut [f64],
    effect: &Effect,
    sample_rate: f64,
) -> AudioResult<()> {
    match effect {
        Effect::Compressor {
            threshold_db,
            ratio,
            attack_ms,
            release_ms,
        } => {
            dynamics::apply_compressor(
                samples,
                *threshold_db,
                *ratio,
                *attack_ms,
                *release_ms,
                sample_rate,
            )?;
        }
        Effect::Chorus {
            rate_hz,
            depth,
            centre_delay_ms,
            feedback,
            mix,
        } => {
            chorus::apply(
                samples,
                *rate_hz,
                *depth,
                *centre_delay_ms,
                *feedback,
                *mix,
                sample_rate,
            )?;
        }
        Effect::Reverb {
            room_size,
            damping,
            wet,
            dry,
            width,
        } => {
            reverb::apply(samples, *room_size, *damping, *wet, *dry, *width, sample_rate)?;
        }
        Effect::Gain { gain_db } => {
            let gain = db_to_amp(*gain_db);
            for sample in samples.iter_mut() {
                *sample *= gain;
            }
        }
        Effect::Highpass { cutoff_hz } => {
            let coeffs = BiquadCoeffs::highpass(*cutoff_hz, BUTTERWORTH_Q, sample_rate);
            BiquadFilter::new(coeffs).process_buffer(samples);
        }
        Effect::Lowpass { cutoff_hz } => {
            let coeffs = BiquadCoeffs::lowpass(*cutoff_hz, BUTTERWORTH_Q, sample_rate);
            BiquadFilter::new(coeffs).process_buffer(samples);
        }
    }
    Ok(())
}

/// Converts linear amplitude to decibels.
pub(crate) fn amp_to_db(amp: f64) -> f64 {
    20.0 * amp.abs().max(1e-10).log10()
}

/// Converts decibels to linear amplitude.
pub(crate) fn db_to_amp(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}
