//! Singing-timing transform.
//!
//! Splits the vocal into fixed-length windows and time-stretches each
//! by an independently drawn factor, breaking the monotonous reading
//! pace of flat speech. The random source is injected so a fixed seed
//! reproduces the exact output.

use rand::Rng;
use rand_pcg::Pcg32;

use super::stretch::time_stretch;

/// Window length in seconds.
const WINDOW_SECONDS: f64 = 0.3;

/// Windows shorter than this pass through unmodified.
const MIN_STRETCH_SAMPLES: usize = 1000;

/// Stretch factor range (uniform draw per window).
const STRETCH_RANGE: std::ops::Range<f64> = 0.75..1.30;

/// Reshapes the vocal's cadence via segment-wise randomized
/// time-stretching.
///
/// Each 0.3 s window is stretched by an independent uniform factor in
/// [0.75, 1.30); windows shorter than 1000 samples (including a short
/// final window) are passed through untouched. Windows are concatenated
/// in their original order, so the total output duration varies with
/// the drawn factors.
pub fn apply_singing_timing(samples: &[f64], sample_rate: f64, rng: &mut Pcg32) -> Vec<f64> {
    let window_len = (WINDOW_SECONDS * sample_rate) as usize;
    if window_len == 0 {
        return samples.to_vec();
    }

    let mut output = Vec::with_capacity(samples.len());

    for window in samples.chunks(window_len) {
        if window.len() < MIN_STRETCH_SAMPLES {
            output.extend_from_slice(window);
            continue;
        }

        let factor = rng.gen_range(STRETCH_RANGE);
        output.extend(time_stretch(window, factor));
    }

    output
}
