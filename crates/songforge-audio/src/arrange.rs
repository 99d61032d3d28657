//! Arrangement mixer: lays melody, pads, bass, and percussion onto a
//! shared timeline and applies the music bus processing.

use rand_pcg::Pcg32;

use crate::effects::{apply_effect_chain, Effect};
use crate::error::AudioResult;
use crate::scale::{Scale, TempoSpec};
use crate::synthesis::instrument::{generate_tone, Timbre};
use crate::synthesis::percussion::render_percussion;

/// Melody note length in seconds.
const MELODY_NOTE_SECONDS: f64 = 2.0;

/// Pad chord length in seconds.
const CHORD_SECONDS: f64 = 4.0;

/// Fade-in/fade-out length in seconds.
const FADE_SECONDS: f64 = 1.5;

/// The music bus chain applied after track summation.
fn bus_chain() -> [Effect; 3] {
    [
        Effect::Highpass { cutoff_hz: 80.0 },
        Effect::Compressor {
            threshold_db: -20.0,
            ratio: 2.0,
            attack_ms: 20.0,
            release_ms: 200.0,
        },
        Effect::Gain { gain_db: -2.0 },
    ]
}

/// Adds `samples * gain` into `buffer` starting at `start`, clipping to
/// the buffer end.
fn mix_into(buffer: &mut [f64], start: usize, samples: &[f64], gain: f64) {
    if start >= buffer.len() {
        return;
    }
    let end = (start + samples.len()).min(buffer.len());
    for (dst, src) in buffer[start..end].iter_mut().zip(samples.iter()) {
        *dst += src * gain;
    }
}

/// Generates the backing track for a duration.
///
/// The output always holds exactly `round(duration * sample_rate)`
/// samples. Melody notes cycle through the scale degrees, pads stack
/// root+third chords every four seconds, the bass holds a pedal tone at
/// half the base frequency in two-beat notes, and percussion follows
/// the tempo grid. The summed tracks pass through the music bus and get
/// linear fades when the buffer is long enough.
pub fn generate_backing(
    duration: f64,
    scale: &Scale,
    tempo: &TempoSpec,
    sample_rate: f64,
    rng: &mut Pcg32,
) -> AudioResult<Vec<f64>> {
    let num_samples = (sample_rate * duration).round() as usize;
    let mut music = vec![0.0; num_samples];

    // Melody: scale degrees played sequentially in 2 s notes
    let mut note_index = 0usize;
    loop {
        let start = (note_index as f64 * MELODY_NOTE_SECONDS * sample_rate) as usize;
        if start >= num_samples {
            break;
        }
        let freq = scale.degrees[note_index % scale.degrees.len()];
        let note = generate_tone(freq, MELODY_NOTE_SECONDS, Timbre::Synth, sample_rate);
        mix_into(&mut music, start, &note, 0.08);
        note_index += 1;
    }

    // Pads: root + third chords every 4 s
    let mut chord_index = 0usize;
    loop {
        let start = (chord_index as f64 * CHORD_SECONDS * sample_rate) as usize;
        if start >= num_samples {
            break;
        }
        let root = scale.degrees[chord_index % scale.degrees.len()];
        let third = scale.degrees[(chord_index + 2) % scale.degrees.len()];

        let root_tone = generate_tone(root, CHORD_SECONDS, Timbre::Pad, sample_rate);
        let third_tone = generate_tone(third, CHORD_SECONDS, Timbre::Pad, sample_rate);
        let chord: Vec<f64> = root_tone
            .iter()
            .zip(third_tone.iter())
            .map(|(a, b)| (a + b) * 0.5)
            .collect();

        mix_into(&mut music, start, &chord, 0.05);
        chord_index += 1;
    }

    // Bass: pedal tone at half the base frequency, two-beat notes
    let bass_note_duration = tempo.beat_duration() * 2.0;
    let mut bass_index = 0usize;
    loop {
        let start = (bass_index as f64 * bass_note_duration * sample_rate) as usize;
        if start >= num_samples {
            break;
        }
        let note = generate_tone(
            scale.base_freq * 0.5,
            bass_note_duration,
            Timbre::Bass,
            sample_rate,
        );
        mix_into(&mut music, start, &note, 0.12);
        bass_index += 1;
    }

    // Percussion gains are baked in per hit
    let percussion = render_percussion(duration, tempo, sample_rate, rng);
    mix_into(&mut music, 0, &percussion, 1.0);

    apply_effect_chain(&mut music, &bus_chain(), sample_rate)?;

    apply_fades(&mut music, sample_rate);

    Ok(music)
}

/// Applies linear fade-in and fade-out when the buffer is longer than
/// twice the fade length.
fn apply_fades(samples: &mut [f64], sample_rate: f64) {
    let fade_samples = (sample_rate * FADE_SECONDS) as usize;
    if samples.len() <= 2 * fade_samples {
        return;
    }

    for i in 0..fade_samples {
        let gain = i as f64 / fade_samples as f64;
        samples[i] *= gain;
    }
    let len = samples.len();
    for i in 0..fade_samples {
        let gain = 1.0 - i as f64 / fade_samples as f64;
        samples[len - fade_samples + i] *= gain;
    }
}
