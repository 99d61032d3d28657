//! Mix and mastering engine.
//!
//! Takes the transformed vocal and the backing track, ducks the backing
//! under the vocal, carves the backing with separating EQ, sums the two
//! at fixed gains, then runs the mastering cascade and a peak normalize
//! with final hard clamp to [-1, 1].

use crate::effects::{apply_effect_chain, Effect};
use crate::error::AudioResult;
use crate::sidechain::apply_sidechain;

/// Backing level relative to the vocal in the final sum.
const MUSIC_MIX_GAIN: f64 = 0.35;

/// Normalization headroom below full scale.
const NORMALIZE_PEAK: f64 = 0.95;

/// EQ applied to the backing before the sum to leave room for the vocal.
fn music_eq() -> [Effect; 2] {
    [
        Effect::Highpass { cutoff_hz: 120.0 },
        Effect::Lowpass { cutoff_hz: 12000.0 },
    ]
}

/// The mastering cascade: glue compression, then a fast limiter-style
/// stage, then makeup gain.
fn mastering_chain() -> [Effect; 3] {
    [
        Effect::Compressor {
            threshold_db: -12.0,
            ratio: 3.0,
            attack_ms: 15.0,
            release_ms: 150.0,
        },
        Effect::Compressor {
            threshold_db: -6.0,
            ratio: 10.0,
            attack_ms: 1.0,
            release_ms: 50.0,
        },
        Effect::Gain { gain_db: 3.5 },
    ]
}

/// Mixes the vocal against the backing track and masters the result.
///
/// The shorter buffer is zero-padded so both run the full length. The
/// output length equals the longer input's length.
pub fn mix_and_master(
    vocal: &[f64],
    music: &[f64],
    sample_rate: f64,
) -> AudioResult<Vec<f64>> {
    let len = vocal.len().max(music.len());

    let mut vocal = vocal.to_vec();
    vocal.resize(len, 0.0);
    let mut music = music.to_vec();
    music.resize(len, 0.0);

    apply_sidechain(&mut music, &vocal, sample_rate);
    apply_effect_chain(&mut music, &music_eq(), sample_rate)?;

    let mut mix: Vec<f64> = vocal
        .iter()
        .zip(music.iter())
        .map(|(v, m)| v + m * MUSIC_MIX_GAIN)
        .collect();

    apply_effect_chain(&mut mix, &mastering_chain(), sample_rate)?;

    normalize_peak(&mut mix);
    for sample in &mut mix {
        *sample = sample.clamp(-1.0, 1.0);
    }

    Ok(mix)
}

/// Scales the buffer so its absolute peak sits at 0.95. Silence is left
/// untouched.
fn normalize_peak(samples: &mut [f64]) {
    let peak = samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max);
    if peak > 0.0 {
        let gain = NORMALIZE_PEAK / peak;
        for sample in samples.iter_mut() {
            *sample *= gain;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 44100.0;

    fn tone(freq: f64, num_samples: usize, amp: f64) -> Vec<f64> {
        (0..num_samples)
            .map(|i| amp * (2.0 * std::f64::consts::PI * freq * i as f64 / SR).sin())
            .collect()
    }

    #[test]
    fn test_output_length_is_longer_input() {
        let vocal = tone(220.0, 44100, 0.3);
        let music = tone(110.0, 88200, 0.3);
        let mix = mix_and_master(&vocal, &music, SR).unwrap();
        assert_eq!(mix.len(), 88200);
    }

    #[test]
    fn test_peak_sits_at_normalize_target() {
        let vocal = tone(220.0, 44100, 0.3);
        let music = tone(110.0, 44100, 0.3);
        let mix = mix_and_master(&vocal, &music, SR).unwrap();

        let peak = mix.iter().map(|s| s.abs()).fold(0.0_f64, f64::max);
        assert!((peak - 0.95).abs() < 1e-6, "peak {peak}");
    }

    #[test]
    fn test_all_samples_within_unit_range() {
        let vocal = tone(330.0, 44100, 0.9);
        let music = tone(110.0, 44100, 0.9);
        let mix = mix_and_master(&vocal, &music, SR).unwrap();
        assert!(mix.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn test_silent_inputs_stay_silent() {
        let mix = mix_and_master(&vec![0.0; 44100], &vec![0.0; 44100], SR).unwrap();
        assert!(mix.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_empty_inputs() {
        let mix = mix_and_master(&[], &[], SR).unwrap();
        assert!(mix.is_empty());
    }

    #[test]
    fn test_normalize_peak_scales_up_quiet_signal() {
        let mut samples = vec![0.1, -0.05, 0.02];
        normalize_peak(&mut samples);
        assert!((samples[0] - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic() {
        let vocal = tone(220.0, 66150, 0.4);
        let music = tone(165.0, 66150, 0.4);
        let a = mix_and_master(&vocal, &music, SR).unwrap();
        let b = mix_and_master(&vocal, &music, SR).unwrap();
        assert_eq!(a, b);
    }
}
