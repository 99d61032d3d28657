//! Additive-harmonic instrument tones.
//!
//! Each timbre is a fixed table of harmonic multipliers and weights;
//! a tone is the weighted sum of sine partials with the shared
//! instrument ADSR envelope applied.

use std::f64::consts::PI;

use crate::envelope::{apply_adsr, AdsrParams};

/// Instrument timbre presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timbre {
    /// Lead synth: strong fundamental with falling even overtones.
    Synth,
    /// Bass: fundamental-heavy with sparse upper harmonics.
    Bass,
    /// Pad: softer fundamental with odd upper partials for width.
    Pad,
}

impl Timbre {
    /// Harmonic table as (frequency multiplier, weight) pairs.
    fn harmonics(&self) -> &'static [(f64, f64)] {
        match self {
            Timbre::Synth => &[(1.0, 1.0), (2.0, 0.5), (3.0, 0.25), (4.0, 0.125)],
            Timbre::Bass => &[(1.0, 1.0), (2.0, 0.3), (4.0, 0.1)],
            Timbre::Pad => &[(1.0, 0.8), (2.0, 0.4), (3.0, 0.3), (5.0, 0.2), (7.0, 0.1)],
        }
    }
}

/// Generates an enveloped additive tone.
///
/// # Arguments
/// * `freq` - Fundamental frequency in Hz
/// * `duration` - Note length in seconds
/// * `timbre` - Harmonic preset
/// * `sample_rate` - Audio sample rate in Hz
///
/// # Returns
/// `round(duration * sample_rate)` samples with the ADSR already baked
/// in; very short notes collapse envelope segments rather than erroring.
pub fn generate_tone(freq: f64, duration: f64, timbre: Timbre, sample_rate: f64) -> Vec<f64> {
    let num_samples = (sample_rate * duration) as usize;
    let mut samples = vec![0.0; num_samples];

    let two_pi = 2.0 * PI;
    for &(multiplier, weight) in timbre.harmonics() {
        let partial_freq = freq * multiplier;
        for (i, sample) in samples.iter_mut().enumerate() {
            let t = i as f64 / sample_rate;
            *sample += weight * (two_pi * partial_freq * t).sin();
        }
    }

    apply_adsr(&mut samples, &AdsrParams::instrument(), sample_rate);

    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 44100.0;

    #[test]
    fn test_tone_length() {
        let tone = generate_tone(440.0, 2.0, Timbre::Synth, SR);
        assert_eq!(tone.len(), 88200);
    }

    #[test]
    fn test_tone_starts_and_ends_at_silence() {
        let tone = generate_tone(220.0, 1.0, Timbre::Pad, SR);
        assert!(tone[0].abs() < 1e-9);
        assert!(tone[tone.len() - 1].abs() < 1e-9);
    }

    #[test]
    fn test_bass_is_fundamental_heavy() {
        // Peak amplitude bounded by the sum of weights
        let tone = generate_tone(110.0, 0.5, Timbre::Bass, SR);
        let peak = tone.iter().map(|s| s.abs()).fold(0.0_f64, f64::max);
        assert!(peak <= 1.4 + 1e-9);
        assert!(peak > 0.5);
    }

    #[test]
    fn test_very_short_note_does_not_panic() {
        let tone = generate_tone(440.0, 0.005, Timbre::Synth, SR);
        assert_eq!(tone.len(), 220);
        assert!(tone.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_zero_duration() {
        assert!(generate_tone(440.0, 0.0, Timbre::Synth, SR).is_empty());
    }

    #[test]
    fn test_timbres_differ() {
        let synth = generate_tone(330.0, 0.5, Timbre::Synth, SR);
        let pad = generate_tone(330.0, 0.5, Timbre::Pad, SR);
        assert_ne!(synth, pad);
    }
}
