//! Tone and percussion synthesis for the backing arrangement.
//!
//! - `instrument` - additive-harmonic tones with ADSR shaping
//! - `percussion` - kick/snare/hihat transients on a beat grid

pub mod instrument;
pub mod percussion;

use rand::Rng;
use rand_pcg::Pcg32;

/// Generates one uniform white-noise sample in [-1, 1].
#[inline]
pub(crate) fn white_noise(rng: &mut Pcg32) -> f64 {
    rng.gen_range(-1.0..1.0)
}
