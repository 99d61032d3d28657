//! ADSR envelope applied over a fixed-length note buffer.
//!
//! Notes in the arrangement have a known sample count up front, so the
//! envelope is applied segment-wise over the buffer rather than run as
//! a stateful generator. Degenerate cases (notes shorter than the
//! attack/decay/release times) collapse segments silently instead of
//! erroring: decay is skipped when attack + decay would overrun the
//! note, sustain may collapse to nothing, and the release is clamped to
//! whatever tail remains but always lands on zero.

/// ADSR envelope parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParams {
    /// Attack time in seconds.
    pub attack: f64,
    /// Decay time in seconds.
    pub decay: f64,
    /// Sustain level (0.0 to 1.0).
    pub sustain: f64,
    /// Release time in seconds.
    pub release: f64,
}

impl AdsrParams {
    /// Creates new ADSR parameters.
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack: attack.max(0.0),
            decay: decay.max(0.0),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.max(0.0),
        }
    }

    /// The instrument envelope used for all arrangement tones.
    pub fn instrument() -> Self {
        Self {
            attack: 0.02,
            decay: 0.05,
            sustain: 0.7,
            release: 0.1,
        }
    }
}

/// Applies an ADSR envelope multiplicatively over `samples`.
pub fn apply_adsr(samples: &mut [f64], params: &AdsrParams, sample_rate: f64) {
    let len = samples.len();
    if len == 0 {
        return;
    }

    let attack_samples = (sample_rate * params.attack) as usize;
    let decay_samples = (sample_rate * params.decay) as usize;
    let release_samples = (sample_rate * params.release) as usize;
    let sustain = params.sustain;

    let mut envelope = vec![1.0; len];

    if attack_samples > 0 {
        let n = attack_samples.min(len);
        for (i, e) in envelope[..n].iter_mut().enumerate() {
            *e = ramp(i, attack_samples, 0.0, 1.0);
        }
    }

    // Decay only fits when the attack/decay region ends inside the note
    if decay_samples > 0 && attack_samples + decay_samples < len {
        for (i, e) in envelope[attack_samples..attack_samples + decay_samples]
            .iter_mut()
            .enumerate()
        {
            *e = ramp(i, decay_samples, 1.0, sustain);
        }
    }

    let sustain_start = attack_samples + decay_samples;
    let sustain_end = len.saturating_sub(release_samples);
    if sustain_start < sustain_end {
        for e in &mut envelope[sustain_start..sustain_end] {
            *e = sustain;
        }
    }

    if release_samples > 0 {
        let n = release_samples.min(len);
        let start = len - n;
        for (i, e) in envelope[start..].iter_mut().enumerate() {
            *e = ramp(i, n, sustain, 0.0);
        }
        // Force the tail to silence even when the release was clamped
        envelope[len - 1] = 0.0;
    }

    for (s, e) in samples.iter_mut().zip(envelope.iter()) {
        *s *= e;
    }
}

/// Linear ramp value at step `i` of `n` from `from` to `to`.
#[inline]
fn ramp(i: usize, n: usize, from: f64, to: f64) -> f64 {
    if n == 0 {
        return to;
    }
    from + (to - from) * (i as f64 / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 44100.0;

    #[test]
    fn test_envelope_shape() {
        let params = AdsrParams::instrument();
        let mut samples = vec![1.0; 44100]; // 1 s
        apply_adsr(&mut samples, &params, SR);

        // Attack starts at zero
        assert!(samples[0].abs() < 1e-9);
        // Sustain region sits at the sustain level
        assert!((samples[22050] - 0.7).abs() < 1e-9);
        // Tail is forced to zero
        assert!(samples[44099].abs() < 1e-9);
    }

    #[test]
    fn test_short_note_collapses_without_panic() {
        let params = AdsrParams::instrument();
        // 10 ms note: shorter than attack + decay + release
        let mut samples = vec![1.0; 441];
        apply_adsr(&mut samples, &params, SR);

        assert!(samples.iter().all(|s| s.is_finite()));
        assert!(samples.iter().all(|s| (0.0..=1.0).contains(&s.abs())));
        assert!(samples[440].abs() < 1e-9);
    }

    #[test]
    fn test_empty_buffer_is_noop() {
        let params = AdsrParams::instrument();
        let mut samples: Vec<f64> = vec![];
        apply_adsr(&mut samples, &params, SR);
        assert!(samples.is_empty());
    }

    #[test]
    fn test_zero_release_keeps_sustain_tail() {
        let params = AdsrParams::new(0.0, 0.0, 0.5, 0.0);
        let mut samples = vec![1.0; 1000];
        apply_adsr(&mut samples, &params, SR);
        assert!((samples[999] - 0.5).abs() < 1e-9);
    }
}
