//! Request-scoped song rendering driver.
//!
//! Ties the pipeline together: resolve mood and genre, transform the
//! vocal, render the backing track to the vocal's length, then mix and
//! master. All request state travels in [`SongParams`]; nothing is
//! global.

use std::io::ErrorKind;
use std::path::Path;

use crate::arrange::generate_backing;
use crate::error::{AudioError, AudioResult};
use crate::master::mix_and_master;
use crate::rng::create_component_rng;
use crate::scale::{Scale, TempoSpec};
use crate::vocal::{semitone_shift, transform_vocal};
use crate::wav::{read_wav, WavResult};
use crate::SAMPLE_RATE;

/// Parameters for one song render.
#[derive(Debug, Clone)]
pub struct SongParams {
    /// Free-text mood, resolved against the mood keyword groups.
    pub mood: String,
    /// Free-text genre, resolved against the tempo table.
    pub genre: String,
    /// Target duration in seconds, used when no vocal is supplied.
    pub duration_seconds: f64,
    /// Seed for all randomized stages.
    pub seed: u32,
}

impl SongParams {
    /// Creates render parameters.
    pub fn new(mood: impl Into<String>, genre: impl Into<String>, duration_seconds: f64, seed: u32) -> Self {
        Self {
            mood: mood.into(),
            genre: genre.into(),
            duration_seconds,
            seed,
        }
    }
}

/// Result of a song render.
#[derive(Debug)]
pub struct SongResult {
    /// The mastered song as a WAV file with its PCM hash.
    pub wav: WavResult,
    /// Tempo resolved from the genre.
    pub tempo_bpm: u32,
    /// Pitch shift applied to the vocal, in semitones.
    pub semitone_shift: f64,
}

/// Renders a complete song from a mono speech buffer.
///
/// The backing track follows the transformed vocal's duration; with an
/// empty vocal it falls back to `params.duration_seconds`. Randomized
/// stages draw from independent streams derived from `params.seed`, so
/// the same inputs always produce the same `pcm_hash`.
pub fn render_song(vocal: &[f64], params: &SongParams) -> AudioResult<SongResult> {
    if !params.duration_seconds.is_finite() || params.duration_seconds < 0.0 {
        return Err(AudioError::InvalidDuration {
            duration: params.duration_seconds,
        });
    }

    let sample_rate = SAMPLE_RATE as f64;
    let scale = Scale::for_mood(&params.mood);
    let tempo = TempoSpec::for_genre(&params.genre);

    let mut timing_rng = create_component_rng(params.seed, "timing");
    let sung = transform_vocal(vocal, &scale, sample_rate, &mut timing_rng)?;

    let duration = if sung.is_empty() {
        params.duration_seconds
    } else {
        sung.len() as f64 / sample_rate
    };

    let mut percussion_rng = create_component_rng(params.seed, "percussion");
    let music = generate_backing(duration, &scale, &tempo, sample_rate, &mut percussion_rng)?;

    let mix = mix_and_master(&sung, &music, sample_rate)?;

    Ok(SongResult {
        wav: WavResult::from_mono(&mix, SAMPLE_RATE),
        tempo_bpm: tempo.bpm,
        semitone_shift: semitone_shift(&scale),
    })
}

/// Renders a song from a vocal WAV file and writes the result.
///
/// A missing vocal file falls back to a silent vocal of the requested
/// duration; a present-but-malformed file, or one not at the engine's
/// 44.1 kHz rate, is an error. The output file is only written after
/// the whole render has succeeded.
pub fn render_song_to_file(
    vocal_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    params: &SongParams,
) -> AudioResult<SongResult> {
    let vocal = match std::fs::read(vocal_path.as_ref()) {
        Ok(bytes) => {
            let decoded = read_wav(&bytes)?;
            if decoded.sample_rate != SAMPLE_RATE {
                return Err(AudioError::invalid_wav(format!(
                    "vocal sample rate {} Hz, engine requires {} Hz",
                    decoded.sample_rate, SAMPLE_RATE
                )));
            }
            decoded.samples
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            vec![0.0; (params.duration_seconds * SAMPLE_RATE as f64).round() as usize]
        }
        Err(err) => return Err(err.into()),
    };

    let result = render_song(&vocal, params)?;
    std::fs::write(output_path.as_ref(), &result.wav.wav_data)?;

    Ok(result)
}
