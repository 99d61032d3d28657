//! Songforge Audio Engine
//!
//! This crate turns a flat speech recording into a mixed, mastered song:
//!
//! - **Vocal transformation** - randomized singing cadence, pitch shift,
//!   vibrato, and a fixed vocal effects chain
//! - **Backing arrangement** - additive-synthesis melody, pads, and bass
//!   plus parametric kick/snare/hihat percussion on a tempo grid
//! - **Adaptive mixing** - sidechain ducking of the backing track under
//!   the vocal, separating EQ, and a two-stage mastering cascade
//!
//! # Determinism
//!
//! Every stage is a pure function from input buffer(s) and parameters to
//! an output buffer. The only randomness (timing-stretch factors and
//! percussion noise) flows through PCG32 generators seeded per request,
//! with independent component streams derived via BLAKE3 hashing. Given
//! the same inputs and seed, the output is byte-identical across runs.
//!
//! # Example
//!
//! ```ignore
//! use songforge_audio::song::{render_song, SongParams};
//!
//! let params = SongParams::new("energetic", "edm", 8.0, 42);
//! let result = render_song(&vocal_samples, &params)?;
//! std::fs::write("song.wav", &result.wav.wav_data)?;
//! ```
//!
//! # Crate Structure
//!
//! - [`song`] - Main entry point: full speech-to-song render
//! - [`scale`] - Mood/scale and genre/tempo resolution
//! - [`vocal`] - Singing-timing, pitch/vibrato, and vocal effects
//! - [`synthesis`] - Instrument and percussion synthesizers
//! - [`arrange`] - Backing-track arrangement mixer
//! - [`sidechain`] - Vocal-keyed ducking engine
//! - [`master`] - Mix and mastering engine
//! - [`effects`] - Pure effect stage descriptors and chain runner
//! - [`wav`] - Deterministic WAV reader/writer

pub mod arrange;
pub mod effects;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod master;
pub mod rng;
pub mod scale;
pub mod sidechain;
pub mod song;
pub mod synthesis;
pub mod vocal;
pub mod wav;

/// Engine sample rate in Hz. All buffers are mono at this rate.
pub const SAMPLE_RATE: u32 = 44_100;

// Re-export main types at crate root
pub use error::{AudioError, AudioResult};
pub use scale::{tempo_for_genre, Scale, TempoSpec};
pub use song::{render_song, render_song_to_file, SongParams, SongResult};
pub use wav::WavResult;
