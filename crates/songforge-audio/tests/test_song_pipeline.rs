//! End-to-end song rendering tests.

use songforge_audio::song::{render_song, render_song_to_file, SongParams};
use songforge_audio::wav::{samples_to_pcm16, write_wav_to_vec, WavFormat};
use songforge_audio::SAMPLE_RATE;

fn speech_like(seconds: f64) -> Vec<f64> {
    let sr = SAMPLE_RATE as f64;
    let num_samples = (seconds * sr) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sr;
            // Rough voiced-speech stand-in: 150 Hz fundamental with a
            // slow amplitude contour
            0.4 * (2.0 * std::f64::consts::PI * 150.0 * t).sin() * (0.6 + 0.4 * (3.0 * t).sin())
        })
        .collect()
}

#[test]
fn test_instrumental_render_matches_requested_duration() {
    let params = SongParams::new("energetic", "edm", 4.0, 42);
    let result = render_song(&[], &params).unwrap();

    assert_eq!(result.wav.num_samples, 176_400);
    assert_eq!(result.wav.sample_rate, 44_100);
    assert_eq!(result.tempo_bpm, 128);

    // Mastered output peaks at the normalize target and stays in range
    let pcm: Vec<i16> = result.wav.wav_data[44..]
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect();
    let peak = pcm.iter().map(|v| v.unsigned_abs()).max().unwrap();
    let expected = (0.95 * 32767.0) as u16;
    assert!(peak.abs_diff(expected) <= 1, "peak {peak}");
}

/// Magnitude of a single frequency's projection over a sample slice.
fn tone_magnitude(samples: &[f64], freq: f64) -> f64 {
    let sr = SAMPLE_RATE as f64;
    let mut re = 0.0;
    let mut im = 0.0;
    for (i, &s) in samples.iter().enumerate() {
        let phase = 2.0 * std::f64::consts::PI * freq * i as f64 / sr;
        re += s * phase.cos();
        im -= s * phase.sin();
    }
    (re * re + im * im).sqrt()
}

#[test]
fn test_instrumental_carries_bass_pedal() {
    // Energetic scale has base 440 Hz, so the bass pedal sits at 220 Hz
    let params = SongParams::new("energetic", "edm", 4.0, 42);
    let result = render_song(&[], &params).unwrap();

    let samples: Vec<f64> = result.wav.wav_data[44..]
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]) as f64 / 32767.0)
        .collect();

    // Measure between the fade-in and fade-out regions
    let body = &samples[66_150..110_250];
    let bass = tone_magnitude(body, 220.0);
    let control = tone_magnitude(body, 310.0);
    assert!(bass > 3.0 * control, "bass {bass}, control {control}");
}

#[test]
fn test_full_pipeline_is_deterministic() {
    let vocal = speech_like(2.0);
    let params = SongParams::new("dreamy", "jazz", 8.0, 1234);

    let a = render_song(&vocal, &params).unwrap();
    let b = render_song(&vocal, &params).unwrap();

    assert_eq!(a.wav.pcm_hash, b.wav.pcm_hash);
    assert_eq!(a.wav.wav_data, b.wav.wav_data);
}

#[test]
fn test_seed_changes_output() {
    let vocal = speech_like(1.0);
    let a = render_song(&vocal, &SongParams::new("calm", "lo-fi", 4.0, 1)).unwrap();
    let b = render_song(&vocal, &SongParams::new("calm", "lo-fi", 4.0, 2)).unwrap();
    assert_ne!(a.wav.pcm_hash, b.wav.pcm_hash);
}

#[test]
fn test_mood_changes_output() {
    let vocal = speech_like(1.0);
    let a = render_song(&vocal, &SongParams::new("dark", "rock", 4.0, 5)).unwrap();
    let b = render_song(&vocal, &SongParams::new("energetic", "rock", 4.0, 5)).unwrap();
    assert_ne!(a.wav.pcm_hash, b.wav.pcm_hash);
}

#[test]
fn test_output_follows_vocal_length() {
    let vocal = speech_like(3.0);
    let params = SongParams::new("calm", "ambient", 60.0, 9);
    let result = render_song(&vocal, &params).unwrap();

    // Timing windows stretch by 0.75-1.3, so the song lands near 3 s,
    // not at the 60 s fallback
    let duration = result.wav.duration_seconds();
    assert!((2.2..=4.0).contains(&duration), "duration {duration}");
}

#[test]
fn test_render_to_file_with_missing_vocal() {
    let dir = std::env::temp_dir().join("songforge_test_missing_vocal");
    std::fs::create_dir_all(&dir).unwrap();
    let vocal_path = dir.join("no_such_vocal.wav");
    let output_path = dir.join("song.wav");
    let _ = std::fs::remove_file(&vocal_path);
    let _ = std::fs::remove_file(&output_path);

    let params = SongParams::new("cosmic", "ambient", 2.0, 77);
    let result = render_song_to_file(&vocal_path, &output_path, &params).unwrap();

    let written = std::fs::read(&output_path).unwrap();
    assert_eq!(written, result.wav.wav_data);
    assert_eq!(&written[0..4], b"RIFF");

    std::fs::remove_file(&output_path).unwrap();
}

#[test]
fn test_render_to_file_rejects_wrong_sample_rate() {
    let dir = std::env::temp_dir().join("songforge_test_rate_mismatch");
    std::fs::create_dir_all(&dir).unwrap();
    let vocal_path = dir.join("vocal_22050.wav");

    let wav = write_wav_to_vec(&WavFormat::mono(22_050), &samples_to_pcm16(&[0.1; 2205]));
    std::fs::write(&vocal_path, &wav).unwrap();

    let params = SongParams::new("calm", "pop", 2.0, 1);
    let result = render_song_to_file(&vocal_path, dir.join("out.wav"), &params);
    assert!(result.is_err());
    assert!(!dir.join("out.wav").exists());

    std::fs::remove_file(&vocal_path).unwrap();
}

#[test]
fn test_render_to_file_rejects_garbage_vocal() {
    let dir = std::env::temp_dir().join("songforge_test_bad_vocal");
    std::fs::create_dir_all(&dir).unwrap();
    let vocal_path = dir.join("garbage.wav");
    std::fs::write(&vocal_path, b"definitely not audio").unwrap();

    let params = SongParams::new("calm", "pop", 2.0, 1);
    let result = render_song_to_file(&vocal_path, dir.join("out.wav"), &params);
    assert!(result.is_err());
    assert!(!dir.join("out.wav").exists());

    std::fs::remove_file(&vocal_path).unwrap();
}
