//! Freeverb-style reverb effect.
//!
//! Mono implementation of the Freeverb algorithm with 8 parallel comb
//! filters and 4 serial allpass filters. Wet and dry levels are
//! independent, matching the vocal chain's reverb stage. The `width`
//! parameter is accepted for chain-descriptor completeness; the stereo
//! wet1/wet2 split cancels exactly in the mono fold, so it does not
//! change the output.

use crate::error::{AudioError, AudioResult};

// Freeverb tuning constants (in samples at 44.1kHz)
const COMB_TUNINGS: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
const ALLPASS_TUNINGS: [usize; 4] = [556, 441, 341, 225];

const FIXED_GAIN: f64 = 0.015;
const SCALE_WET: f64 = 3.0;
const SCALE_DAMPING: f64 = 0.4;
const SCALE_ROOM: f64 = 0.28;
const OFFSET_ROOM: f64 = 0.7;

/// Comb filter with feedback and damped feedback path.
struct CombFilter {
    buffer: Vec<f64>,
    buffer_index: usize,
    filter_store: f64,
    damp1: f64,
    damp2: f64,
    feedback: f64,
}

impl CombFilter {
    fn new(size: usize, feedback: f64, damping: f64) -> Self {
        Self {
            buffer: vec![0.0; size.max(1)],
            buffer_index: 0,
            filter_store: 0.0,
            damp1: damping,
            damp2: 1.0 - damping,
            feedback,
        }
    }

    fn process(&mut self, input: f64) -> f64 {
        let output = self.buffer[self.buffer_index];

        // One-pole lowpass filter in the feedback path
        self.filter_store = (output * self.damp2) + (self.filter_store * self.damp1);

        self.buffer[self.buffer_index] = input + (self.filter_store * self.feedback);

        self.buffer_index += 1;
        if self.buffer_index >= self.buffer.len() {
            self.buffer_index = 0;
        }

        output
    }
}

/// Allpass filter.
struct AllpassFilter {
    buffer: Vec<f64>,
    buffer_index: usize,
}

impl AllpassFilter {
    fn new(size: usize) -> Self {
        Self {
            buffer: vec![0.0; size.max(1)],
            buffer_index: 0,
        }
    }

    fn process(&mut self, input: f64) -> f64 {
        let buf_out = self.buffer[self.buffer_index];
        let output = buf_out - input;

        self.buffer[self.buffer_index] = input + (buf_out * 0.5);

        self.buffer_index += 1;
        if self.buffer_index >= self.buffer.len() {
            self.buffer_index = 0;
        }

        output
    }
}

/// Applies reverb to a mono buffer in place.
pub fn apply(
    samples: &mut [f64],
    room_size: f64,
    damping: f64,
    wet: f64,
    dry: f64,
    width: f64,
    sample_rate: f64,
) -> AudioResult<()> {
    // Validate parameters
    if !(0.0..=1.0).contains(&room_size) {
        return Err(AudioError::invalid_param(
            "reverb.room_size",
            format!("must be 0.0-1.0, got {}", room_size),
        ));
    }
    if !(0.0..=1.0).contains(&damping) {
        return Err(AudioError::invalid_param(
            "reverb.damping",
            format!("must be 0.0-1.0, got {}", damping),
        ));
    }
    if !(0.0..=1.0).contains(&wet) {
        return Err(AudioError::invalid_param(
            "reverb.wet",
            format!("must be 0.0-1.0, got {}", wet),
        ));
    }
    if !(0.0..=1.0).contains(&dry) {
        return Err(AudioError::invalid_param(
            "reverb.dry",
            format!("must be 0.0-1.0, got {}", dry),
        ));
    }
    if !(0.0..=1.0).contains(&width) {
        return Err(AudioError::invalid_param(
            "reverb.width",
            format!("must be 0.0-1.0, got {}", width),
        ));
    }

    let scale = sample_rate / 44100.0;
    let comb_feedback = (room_size * SCALE_ROOM) + OFFSET_ROOM;
    let comb_damping = damping * SCALE_DAMPING;

    let mut combs: Vec<CombFilter> = COMB_TUNINGS
        .iter()
        .map(|&size| CombFilter::new((size as f64 * scale) as usize, comb_feedback, comb_damping))
        .collect();

    let mut allpasses: Vec<AllpassFilter> = ALLPASS_TUNINGS
        .iter()
        .map(|&size| AllpassFilter::new((size as f64 * scale) as usize))
        .collect();

    let wet_gain = wet * SCALE_WET;

    for sample in samples.iter_mut() {
        let input = *sample;
        let comb_input = input * FIXED_GAIN;

        // Process comb filters in parallel
        let mut out = 0.0;
        for comb in &mut combs {
            out += comb.process(comb_input);
        }

        // Process allpass filters in series
        for allpass in &mut allpasses {
            out = allpass.process(out);
        }

        *sample = out * wet_gain + input * dry;
    }

    Ok(())
}
