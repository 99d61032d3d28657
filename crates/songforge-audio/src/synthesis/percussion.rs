//! Parametric kick/snare/hihat percussion on a beat grid.
//!
//! Beat times fall at `k * 60/bpm` until the duration is exhausted.
//! Kick hits every beat, snare the odd-indexed beats, hi-hat the beat
//! and the half-beat. All noise comes from the injected PCG32 so the
//! pattern is reproducible per seed.

use std::f64::consts::PI;

use rand_pcg::Pcg32;

use super::white_noise;
use crate::scale::TempoSpec;

const KICK_LENGTH: f64 = 0.15;
const SNARE_LENGTH: f64 = 0.12;
const HIHAT_LENGTH: f64 = 0.05;

/// Renders the summed percussion track for a duration.
///
/// Output holds `round(duration * sample_rate)` samples with the per-hit
/// gains already baked in.
pub fn render_percussion(
    duration: f64,
    tempo: &TempoSpec,
    sample_rate: f64,
    rng: &mut Pcg32,
) -> Vec<f64> {
    let num_samples = (sample_rate * duration) as usize;
    let mut track = vec![0.0; num_samples];

    let beat_duration = tempo.beat_duration();
    let two_pi = 2.0 * PI;

    let mut beat_index = 0usize;
    loop {
        let beat_time = beat_index as f64 * beat_duration;
        if beat_time >= duration {
            break;
        }
        let beat_start = (beat_time * sample_rate) as usize;

        // Kick on every beat: exponential-decay tone sweeping down to
        // 60 Hz with a low noise floor
        if beat_start < num_samples {
            let kick_len = (KICK_LENGTH * sample_rate) as usize;
            let kick_end = (beat_start + kick_len).min(num_samples);
            for i in beat_start..kick_end {
                let t = (i - beat_start) as f64 / sample_rate;
                let freq = 60.0 + 40.0 * (-20.0 * t).exp();
                track[i] += 0.15 * (-15.0 * t).exp() * (two_pi * freq * t).sin()
                    + 0.02 * white_noise(rng);
            }
        }

        // Snare on beats 2 and 4
        if beat_index % 2 == 1 && beat_start < num_samples {
            let snare_len = (SNARE_LENGTH * sample_rate) as usize;
            let snare_end = (beat_start + snare_len).min(num_samples);
            for i in beat_start..snare_end {
                let t = (i - beat_start) as f64 / sample_rate;
                track[i] += 0.1 * (-20.0 * t).exp() * (two_pi * 200.0 * t).sin()
                    + 0.08 * (-15.0 * t).exp() * white_noise(rng);
            }
        }

        // Hi-hat on the beat and the half-beat
        for j in 0..2 {
            let hat_time = beat_time + j as f64 * beat_duration / 2.0;
            let hat_start = (hat_time * sample_rate) as usize;
            if hat_start >= num_samples {
                continue;
            }
            let hat_len = (HIHAT_LENGTH * sample_rate) as usize;
            let hat_end = (hat_start + hat_len).min(num_samples);
            for i in hat_start..hat_end {
                let t = (i - hat_start) as f64 / sample_rate;
                track[i] += 0.03 * (-40.0 * t).exp() * white_noise(rng);
            }
        }

        beat_index += 1;
    }

    track
}
