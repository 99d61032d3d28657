//! Chorus effect with LFO-modulated delay and feedback.

use crate::error::{AudioError, AudioResult};
use std::f64::consts::PI;

const TWO_PI: f64 = 2.0 * PI;

/// Delay line with interpolated read for modulation.
struct ModulatedDelayLine {
    buffer: Vec<f64>,
    write_pos: usize,
}

impl ModulatedDelayLine {
    fn new(max_delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay_samples.max(2)],
            write_pos: 0,
        }
    }

    fn write(&mut self, sample: f64) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    fn read_interpolated(&self, delay_samples: f64) -> f64 {
        let delay_clamped = delay_samples.max(0.0).min(self.buffer.len() as f64 - 1.0);
        let delay_int = delay_clamped.floor() as usize;
        let delay_frac = delay_clamped - delay_int as f64;

        let read_pos1 = (self.write_pos + self.buffer.len() - delay_int - 1) % self.buffer.len();
        let read_pos2 = (self.write_pos + self.buffer.len() - delay_int - 2) % self.buffer.len();

        let sample1 = self.buffer[read_pos1];
        let sample2 = self.buffer[read_pos2];

        // Linear interpolation
        sample1 * (1.0 - delay_frac) + sample2 * delay_frac
    }
}

/// Applies a chorus to a mono buffer in place.
///
/// The delay time swings around `centre_delay_ms` under a sinusoidal
/// LFO; the delayed signal is fed back into the line and blended with
/// the dry input at `mix`.
pub fn apply(
    samples: &mut [f64],
    rate_hz: f64,
    depth: f64,
    centre_delay_ms: f64,
    feedback: f64,
    mix: f64,
    sample_rate: f64,
) -> AudioResult<()> {
    // Validate parameters
    if !(0.1..=10.0).contains(&rate_hz) {
        return Err(AudioError::invalid_param(
            "chorus.rate_hz",
            format!("must be 0.1-10.0 Hz, got {}", rate_hz),
        ));
    }
    if !(0.0..=1.0).contains(&depth) {
        return Err(AudioError::invalid_param(
            "chorus.depth",
            format!("must be 0.0-1.0, got {}", depth),
        ));
    }
    if !(1.0..=50.0).contains(&centre_delay_ms) {
        return Err(AudioError::invalid_param(
            "chorus.centre_delay_ms",
            format!("must be 1-50 ms, got {}", centre_delay_ms),
        ));
    }
    if !(0.0..0.95).contains(&feedback) {
        return Err(AudioError::invalid_param(
            "chorus.feedback",
            format!("must be 0.0-0.95, got {}", feedback),
        ));
    }
    if !(0.0..=1.0).contains(&mix) {
        return Err(AudioError::invalid_param(
            "chorus.mix",
            format!("must be 0.0-1.0, got {}", mix),
        ));
    }

    let centre_delay_samples = (centre_delay_ms / 1000.0) * sample_rate;
    let max_delay_samples = centre_delay_samples * (1.0 + depth);
    let buffer_size = max_delay_samples.ceil() as usize + 2;

    let mut delay_line = ModulatedDelayLine::new(buffer_size);
    let dry = 1.0 - mix;

    for (i, sample) in samples.iter_mut().enumerate() {
        let input = *sample;

        let t = i as f64 / sample_rate;
        let lfo = (TWO_PI * rate_hz * t).sin();
        let delay_samples = centre_delay_samples * (1.0 + depth * lfo);

        let delayed = delay_line.read_interpolated(delay_samples);
        delay_line.write(input + delayed * feedback);

        *sample = input * dry + delayed * mix;
    }

    Ok(())
}
