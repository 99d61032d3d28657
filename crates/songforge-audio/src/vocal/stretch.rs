//! Phase-vocoder time stretching and pitch shifting.
//!
//! STFT analysis with Hann windows, per-bin phase propagation scaled by
//! the stretch factor, and overlap-add resynthesis with window-sum
//! normalization. Stretching changes duration while preserving pitch;
//! pitch shifting composes a stretch with a resample back to the
//! original length.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f64::consts::PI;

/// Fixed FFT size for the vocoder.
const FFT_SIZE: usize = 2048;

/// Analysis hop size (75% overlap).
const HOP_SIZE: usize = 512;

/// Stretches `input` in time by `factor` while preserving pitch.
///
/// The output holds `round(len * factor)` samples: factors below 1.0
/// compress, factors above 1.0 elongate. Inputs shorter than one FFT
/// frame are zero-padded up to a frame before analysis so pitch is
/// still preserved.
pub fn time_stretch(input: &[f64], factor: f64) -> Vec<f64> {
    let target_len = (input.len() as f64 * factor).round() as usize;
    if input.is_empty() || target_len == 0 {
        return vec![0.0; target_len];
    }

    let padded;
    let analysis_input = if input.len() < FFT_SIZE {
        let mut buf = input.to_vec();
        buf.resize(FFT_SIZE, 0.0);
        padded = buf;
        &padded[..]
    } else {
        input
    };

    let num_frames = (analysis_input.len() - FFT_SIZE) / HOP_SIZE + 1;
    let num_bins = FFT_SIZE / 2 + 1;

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(FFT_SIZE);
    let ifft = planner.plan_fft_inverse(FFT_SIZE);

    let window: Vec<f64> = (0..FFT_SIZE).map(|i| hann_window(i, FFT_SIZE)).collect();

    let last_pos = ((num_frames - 1) as f64 * HOP_SIZE as f64 * factor).round() as usize;
    let buffer_len = (last_pos + FFT_SIZE).max(target_len);
    let mut output = vec![0.0; buffer_len];
    let mut window_sum = vec![0.0; buffer_len];

    let mut prev_phase = vec![0.0; num_bins];
    let mut synth_phase = vec![0.0; num_bins];

    for frame_idx in 0..num_frames {
        let frame_start = frame_idx * HOP_SIZE;

        let mut spectrum: Vec<Complex<f64>> = analysis_input[frame_start..frame_start + FFT_SIZE]
            .iter()
            .zip(window.iter())
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();
        fft.process(&mut spectrum);

        // Propagate phases for the lower half, mirror the rest
        for (bin, spec) in spectrum.iter_mut().take(num_bins).enumerate() {
            let magnitude = spec.norm();
            let phase = spec.arg();

            if frame_idx == 0 {
                synth_phase[bin] = phase;
            } else {
                // Expected phase advance for this bin over one hop
                let omega = 2.0 * PI * bin as f64 * HOP_SIZE as f64 / FFT_SIZE as f64;
                let deviation = wrap_phase(phase - prev_phase[bin] - omega);
                synth_phase[bin] = wrap_phase(synth_phase[bin] + (omega + deviation) * factor);
            }
            prev_phase[bin] = phase;

            *spec = Complex::from_polar(magnitude, synth_phase[bin]);
        }
        for bin in 1..FFT_SIZE / 2 {
            spectrum[FFT_SIZE - bin] = spectrum[bin].conj();
        }

        ifft.process(&mut spectrum);

        let out_start = (frame_idx as f64 * HOP_SIZE as f64 * factor).round() as usize;
        for (i, spec) in spectrum.iter().enumerate() {
            let idx = out_start + i;
            if idx >= buffer_len {
                break;
            }
            // IFFT result is scaled by N
            let sample = spec.re / FFT_SIZE as f64;
            output[idx] += sample * window[i];
            window_sum[idx] += window[i] * window[i];
        }
    }

    for (sample, &w) in output.iter_mut().zip(window_sum.iter()) {
        if w > 1e-6 {
            *sample /= w;
        }
    }

    output.truncate(target_len);
    output.resize(target_len, 0.0);
    output
}

/// Shifts pitch by `semitones` while preserving duration.
///
/// Stretches time by the frequency ratio, then resamples back to the
/// original length so playback speed carries the shift.
pub fn pitch_shift(input: &[f64], semitones: f64) -> Vec<f64> {
    if input.is_empty() {
        return Vec::new();
    }

    let ratio = 2.0_f64.powf(semitones / 12.0);
    let stretched = time_stretch(input, ratio);
    resample_linear(&stretched, input.len())
}

/// Linear-interpolation resample to an exact output length.
pub(crate) fn resample_linear(input: &[f64], target_len: usize) -> Vec<f64> {
    if target_len == 0 {
        return Vec::new();
    }
    if input.is_empty() {
        return vec![0.0; target_len];
    }

    let step = input.len() as f64 / target_len as f64;
    let mut output = Vec::with_capacity(target_len);

    for i in 0..target_len {
        let pos = i as f64 * step;
        let idx = pos.floor() as usize;
        let frac = pos - idx as f64;

        let a = input[idx.min(input.len() - 1)];
        let b = input[(idx + 1).min(input.len() - 1)];
        output.push(a * (1.0 - frac) + b * frac);
    }

    output
}

/// Wraps a phase value into [-PI, PI].
#[inline]
fn wrap_phase(phase: f64) -> f64 {
    phase - 2.0 * PI * (phase / (2.0 * PI)).round()
}

/// Computes the Hann window value at a given index.
#[inline]
fn hann_window(i: usize, size: usize) -> f64 {
    0.5 * (1.0 - (2.0 * PI * i as f64 / size as f64).cos())
}
