//! WAV decoding for the boundary input.
//!
//! Decodes 16-bit PCM WAV bytes into mono f64 samples. Stereo input is
//! folded to mono by channel average; anything other than 16-bit
//! integer PCM is rejected.

use crate::error::{AudioError, AudioResult};

/// Decoded WAV audio: mono samples plus the file's sample rate.
#[derive(Debug, Clone)]
pub struct DecodedWav {
    /// Mono samples in [-1.0, 1.0].
    pub samples: Vec<f64>,
    /// Sample rate in Hz as declared by the fmt chunk.
    pub sample_rate: u32,
}

impl DecodedWav {
    /// Returns the duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Decodes a WAV file buffer to mono f64 samples.
///
/// Walks the RIFF chunks for `fmt ` and `data`; multi-channel audio is
/// averaged down to one channel and int16 values scale by 1/32767.
pub fn read_wav(wav_data: &[u8]) -> AudioResult<DecodedWav> {
    if wav_data.len() < 12 || &wav_data[0..4] != b"RIFF" || &wav_data[8..12] != b"WAVE" {
        return Err(AudioError::invalid_wav("missing RIFF/WAVE header"));
    }

    let mut channels: Option<u16> = None;
    let mut sample_rate: Option<u32> = None;
    let mut data: Option<&[u8]> = None;

    let mut pos = 12;
    while pos + 8 <= wav_data.len() {
        let chunk_id = &wav_data[pos..pos + 4];
        let chunk_size = u32::from_le_bytes([
            wav_data[pos + 4],
            wav_data[pos + 5],
            wav_data[pos + 6],
            wav_data[pos + 7],
        ]) as usize;

        let body_start = pos + 8;
        let body_end = body_start + chunk_size;
        if body_end > wav_data.len() {
            return Err(AudioError::invalid_wav("chunk extends past end of file"));
        }
        let body = &wav_data[body_start..body_end];

        match chunk_id {
            b"fmt " => {
                if chunk_size < 16 {
                    return Err(AudioError::invalid_wav("fmt chunk too short"));
                }
                let audio_format = u16::from_le_bytes([body[0], body[1]]);
                if audio_format != 1 {
                    return Err(AudioError::invalid_wav(format!(
                        "unsupported audio format {audio_format} (expected PCM)"
                    )));
                }
                let bits = u16::from_le_bytes([body[14], body[15]]);
                if bits != 16 {
                    return Err(AudioError::invalid_wav(format!(
                        "unsupported bit depth {bits} (expected 16)"
                    )));
                }
                channels = Some(u16::from_le_bytes([body[2], body[3]]));
                sample_rate = Some(u32::from_le_bytes([body[4], body[5], body[6], body[7]]));
            }
            b"data" => data = Some(body),
            _ => {}
        }

        pos = body_end;
        // Chunks are word-aligned
        if chunk_size % 2 == 1 {
            pos += 1;
        }
    }

    let channels = channels.ok_or_else(|| AudioError::invalid_wav("missing fmt chunk"))?;
    let sample_rate = sample_rate.unwrap_or(0);
    let data = data.ok_or_else(|| AudioError::invalid_wav("missing data chunk"))?;

    if channels == 0 {
        return Err(AudioError::invalid_wav("fmt chunk declares zero channels"));
    }
    if sample_rate == 0 {
        return Err(AudioError::invalid_wav("fmt chunk declares zero sample rate"));
    }

    let values: Vec<f64> = data
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]) as f64 / 32767.0)
        .collect();

    let samples = if channels == 1 {
        values
    } else {
        values
            .chunks_exact(channels as usize)
            .map(|frame| frame.iter().sum::<f64>() / channels as f64)
            .collect()
    };

    Ok(DecodedWav {
        samples,
        sample_rate,
    })
}
