//! Deterministic WAV codec.
//!
//! The writer emits 16-bit PCM WAV files with no timestamps or variable
//! metadata, so the same samples always produce the same bytes. The
//! BLAKE3 hash of the PCM data identifies a render independent of the
//! container. The reader decodes the boundary input (the vocal
//! recording) to mono f64 samples.

mod format;
mod reader;
mod result;
mod writer;

pub use format::WavFormat;
pub use reader::{read_wav, DecodedWav};
pub use result::WavResult;
pub use writer::{samples_to_pcm16, write_wav, write_wav_to_vec};
