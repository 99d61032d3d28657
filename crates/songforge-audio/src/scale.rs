//! Mood/scale and genre/tempo resolution.
//!
//! The mood and genre tables are the only persisted configuration of
//! the engine; they are fixed at compile time. Matching is
//! case-insensitive substring matching, first match wins, and
//! unrecognized input always resolves through a documented default
//! branch rather than erroring.

/// A five-note pentatonic-style scale with its base frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    /// Base frequency in Hz.
    pub base_freq: f64,
    /// Scale degrees in Hz, lowest first.
    pub degrees: [f64; 5],
}

/// Mood keyword groups, evaluated in priority order.
const MOOD_GROUPS: [(&[&str], f64, [f64; 5]); 4] = [
    (
        &["calm", "peaceful", "serene", "relaxed", "lo-fi"],
        220.0,
        [220.0, 247.0, 277.0, 330.0, 370.0], // A3 major pentatonic
    ),
    (
        &["energetic", "exciting", "upbeat", "edm", "pop"],
        440.0,
        [440.0, 494.0, 523.0, 587.0, 659.0], // A4 major pentatonic
    ),
    (
        &["dark", "mysterious", "ominous", "haunting"],
        110.0,
        [110.0, 123.0, 131.0, 147.0, 165.0], // A2 minor pentatonic
    ),
    (
        &["cosmic", "ethereal", "dreamy", "ambient", "jazz"],
        330.0,
        [330.0, 370.0, 415.0, 440.0, 494.0], // E4 major pentatonic
    ),
];

impl Scale {
    /// Resolves a free-text mood string to a scale.
    ///
    /// The mood keyword groups are checked in priority order against
    /// the lowercased input; the first group with a matching keyword
    /// wins. Anything else falls through to C major pentatonic.
    pub fn for_mood(mood: &str) -> Self {
        let mood_lower = mood.to_lowercase();

        for (keywords, base_freq, degrees) in MOOD_GROUPS {
            if keywords.iter().any(|w| mood_lower.contains(w)) {
                return Self { base_freq, degrees };
            }
        }

        // C major pentatonic
        Self {
            base_freq: 261.63,
            degrees: [262.0, 294.0, 330.0, 349.0, 392.0],
        }
    }

    /// The middle scale degree, used as the vocal pitch target.
    pub fn target_freq(&self) -> f64 {
        self.degrees[self.degrees.len() / 2]
    }
}

/// Tempo derived from the genre table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempoSpec {
    /// Beats per minute.
    pub bpm: u32,
}

impl TempoSpec {
    /// Resolves a genre string to a tempo.
    pub fn for_genre(genre: &str) -> Self {
        Self {
            bpm: tempo_for_genre(genre),
        }
    }

    /// Duration of one beat in seconds.
    pub fn beat_duration(&self) -> f64 {
        60.0 / self.bpm as f64
    }
}

/// Genre keywords and their tempi, checked in order.
const GENRE_TEMPOS: [(&str, u32); 10] = [
    ("lo-fi", 85),
    ("jazz", 100),
    ("classical", 90),
    ("pop", 120),
    ("edm", 128),
    ("rock", 130),
    ("hip-hop", 90),
    ("r&b", 95),
    ("ambient", 70),
    ("funk", 110),
];

/// Maps a genre string to a BPM via substring matching, defaulting to
/// 120 for unrecognized genres.
pub fn tempo_for_genre(genre: &str) -> u32 {
    let genre_lower = genre.to_lowercase();

    for (key, bpm) in GENRE_TEMPOS {
        if genre_lower.contains(key) {
            return bpm;
        }
    }
    120
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_calm_mood_resolves_to_a3_pentatonic() {
        let scale = Scale::for_mood("very calm day");
        assert_eq!(scale.base_freq, 220.0);
        assert_eq!(scale.degrees, [220.0, 247.0, 277.0, 330.0, 370.0]);
    }

    #[test]
    fn test_unknown_mood_resolves_to_default() {
        let scale = Scale::for_mood("XYZ-unknown");
        assert_eq!(scale.base_freq, 261.63);
        assert_eq!(scale.degrees, [262.0, 294.0, 330.0, 349.0, 392.0]);
    }

    #[test]
    fn test_empty_mood_resolves_to_default() {
        let scale = Scale::for_mood("");
        assert_eq!(scale.base_freq, 261.63);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let scale = Scale::for_mood("ENERGETIC");
        assert_eq!(scale.base_freq, 440.0);
    }

    #[test]
    fn test_group_priority_order() {
        // "calm" (group 1) beats "dark" (group 3) regardless of word order
        let scale = Scale::for_mood("dark but calm");
        assert_eq!(scale.base_freq, 220.0);
    }

    #[test]
    fn test_dark_and_dreamy_moods() {
        assert_eq!(Scale::for_mood("ominous drone").base_freq, 110.0);
        assert_eq!(Scale::for_mood("dreamy haze").base_freq, 330.0);
    }

    #[test]
    fn test_target_freq_is_middle_degree() {
        let scale = Scale::for_mood("upbeat");
        assert_eq!(scale.target_freq(), 523.0);
    }

    #[test]
    fn test_tempo_substring_match() {
        assert_eq!(tempo_for_genre("deep-house edm mix"), 128);
        assert_eq!(tempo_for_genre("Lo-Fi beats"), 85);
    }

    #[test]
    fn test_tempo_default() {
        assert_eq!(tempo_for_genre("unknown-genre"), 120);
        assert_eq!(tempo_for_genre(""), 120);
    }

    #[test]
    fn test_beat_duration() {
        let tempo = TempoSpec::for_genre("edm");
        assert!((tempo.beat_duration() - 0.46875).abs() < 1e-9);
    }
}
