//! Biquad filter implementations.
//!
//! Lowpass and highpass filters using the standard biquad topology.
//! Coefficients are calculated with the Audio EQ Cookbook formulas.

use std::f64::consts::PI;

/// Butterworth Q, the default resonance for the engine's EQ stages.
pub const BUTTERWORTH_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Biquad filter coefficients.
#[derive(Debug, Clone, Copy)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Creates lowpass filter coefficients.
    ///
    /// # Arguments
    /// * `cutoff` - Cutoff frequency in Hz
    /// * `q` - Q factor (resonance), 0.707 is Butterworth
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn lowpass(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        // Clamp Q to minimum safe value to prevent division by zero
        let q = q.max(0.5);
        let omega = 2.0 * PI * cutoff / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * q);

        let b0 = (1.0 - cos_omega) / 2.0;
        let b1 = 1.0 - cos_omega;
        let b2 = (1.0 - cos_omega) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Creates highpass filter coefficients.
    ///
    /// # Arguments
    /// * `cutoff` - Cutoff frequency in Hz
    /// * `q` - Q factor (resonance)
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn highpass(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        // Clamp Q to minimum safe value to prevent division by zero
        let q = q.max(0.5);
        let omega = 2.0 * PI * cutoff / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * q);

        let b0 = (1.0 + cos_omega) / 2.0;
        let b1 = -(1.0 + cos_omega);
        let b2 = (1.0 + cos_omega) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// Direct form I biquad filter.
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    coeffs: BiquadCoeffs,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl BiquadFilter {
    /// Creates a new filter with the given coefficients.
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Processes a single sample.
    pub fn process(&mut self, input: f64) -> f64 {
        let c = &self.coeffs;
        let output =
            c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Processes a whole buffer in place.
    pub fn process_buffer(&mut self, samples: &mut [f64]) {
        for sample in samples.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 44100.0;

    fn sine(freq: f64, num_samples: usize) -> Vec<f64> {
        (0..num_samples)
            .map(|i| (2.0 * PI * freq * i as f64 / SR).sin())
            .collect()
    }

    fn peak(samples: &[f64]) -> f64 {
        samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max)
    }

    #[test]
    fn test_lowpass_attenuates_high_frequencies() {
        let mut filter = BiquadFilter::new(BiquadCoeffs::lowpass(1000.0, BUTTERWORTH_Q, SR));
        let mut high = sine(10000.0, 4410);
        filter.process_buffer(&mut high);

        // Skip the settling region before measuring
        assert!(peak(&high[2000..]) < 0.1);
    }

    #[test]
    fn test_highpass_passes_high_frequencies() {
        let mut filter = BiquadFilter::new(BiquadCoeffs::highpass(120.0, BUTTERWORTH_Q, SR));
        let mut high = sine(5000.0, 4410);
        filter.process_buffer(&mut high);

        assert!(peak(&high[2000..]) > 0.9);
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let mut filter = BiquadFilter::new(BiquadCoeffs::highpass(80.0, BUTTERWORTH_Q, SR));
        let mut dc = vec![1.0; 44100];
        filter.process_buffer(&mut dc);

        assert!(dc[44099].abs() < 0.01);
    }

    #[test]
    fn test_filter_output_is_finite() {
        let mut filter = BiquadFilter::new(BiquadCoeffs::lowpass(12000.0, BUTTERWORTH_Q, SR));
        let mut noise: Vec<f64> = (0..1000).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        filter.process_buffer(&mut noise);

        assert!(noise.iter().all(|s| s.is_finite()));
    }
}
