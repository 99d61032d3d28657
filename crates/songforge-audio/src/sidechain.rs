//! Sidechain ducking: attenuates the backing track while the vocal is
//! active.
//!
//! The vocal's short-time RMS envelope (overlapping windows, retain-peak
//! writes) gates a per-sample gain curve that eases toward 0.4 while the
//! vocal is active and back toward 1.0 during silence.

/// RMS window length in seconds.
const WINDOW_SECONDS: f64 = 0.05;

/// Gain floor while the vocal is active.
const DUCK_AMOUNT: f64 = 0.4;

/// Envelope level above which the vocal counts as active.
const ACTIVE_THRESHOLD: f64 = 0.01;

/// Smoothing coefficient while ducking in (slow attack).
const ATTACK_RATE: f64 = 0.95;

/// Smoothing coefficient while releasing back to unity.
const RELEASE_RATE: f64 = 0.99;

/// Computes the vocal's short-time energy envelope.
///
/// Overlapping RMS windows (50 ms, 50% hop); each window writes its RMS
/// across its whole span but never lowers a value already written by an
/// overlapping window.
pub fn energy_envelope(vocal: &[f64], sample_rate: f64) -> Vec<f64> {
    let window = (WINDOW_SECONDS * sample_rate) as usize;
    let mut envelope = vec![0.0; vocal.len()];

    if window == 0 || vocal.len() <= window {
        return envelope;
    }

    let hop = (window / 2).max(1);
    let mut start = 0;
    while start < vocal.len() - window {
        let slice = &vocal[start..start + window];
        let rms = (slice.iter().map(|s| s * s).sum::<f64>() / window as f64).sqrt();

        let value = envelope[start].max(rms);
        for e in &mut envelope[start..start + window] {
            *e = value;
        }
        start += hop;
    }

    envelope
}

/// Builds the per-sample ducking curve for a backing track of `len`
/// samples.
///
/// Targets 0.4 where the vocal envelope exceeds the activity threshold
/// and 1.0 elsewhere, with exponential smoothing toward the target.
/// Every value lies in [0.4, 1.0]; positions past the end of the vocal
/// count as inactive.
pub fn ducking_curve(vocal: &[f64], len: usize, sample_rate: f64) -> Vec<f64> {
    let envelope = energy_envelope(vocal, sample_rate);
    let mut curve = vec![1.0; len];

    for i in 0..len {
        let active = envelope.get(i).is_some_and(|&e| e > ACTIVE_THRESHOLD);
        let target = if active { DUCK_AMOUNT } else { 1.0 };

        if i == 0 {
            curve[0] = target;
        } else {
            let rate = if active { ATTACK_RATE } else { RELEASE_RATE };
            curve[i] = curve[i - 1] * rate + target * (1.0 - rate);
        }
    }

    curve
}

/// Ducks the backing track under the vocal, in place.
pub fn apply_sidechain(music: &mut [f64], vocal: &[f64], sample_rate: f64) {
    let curve = ducking_curve(vocal, music.len(), sample_rate);
    for (sample, gain) in music.iter_mut().zip(curve.iter()) {
        *sample *= gain;
    }
}
