// Rules - ordered threshold tables that turn aggregate features into labels
//
// Each table is evaluated top to bottom and the first matching entry wins,
// so entry order is part of the behaviour.

/// Aggregate measurements the genre and instrument rules look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackProfile {
    /// Global tempo in BPM
    pub tempo: f32,
    /// Mean spectral centroid in Hz
    pub centroid: f32,
    /// Mean zero-crossing rate
    pub zcr: f32,
    /// Mean of the lowest spectral contrast band (dB)
    pub low_band_contrast: f32,
}

/// One row of the genre table
pub struct GenreRule {
    pub matches: fn(&TrackProfile) -> bool,
    pub genre: &'static str,
    pub sub_genre: &'static str,
}

/// Genre table, first match wins; the last row always matches
pub const GENRE_RULES: &[GenreRule] = &[
    GenreRule {
        matches: |p| p.tempo > 120.0 && p.centroid > 3000.0 && p.zcr > 0.1,
        genre: "Electronic",
        sub_genre: "Techno",
    },
    GenreRule {
        matches: |p| p.tempo > 120.0 && p.centroid > 3000.0,
        genre: "Electronic",
        sub_genre: "House",
    },
    GenreRule {
        matches: |p| p.tempo > 140.0,
        genre: "Electronic",
        sub_genre: "Drum & Bass",
    },
    GenreRule {
        matches: |p| p.tempo < 90.0 && p.centroid < 2000.0,
        genre: "Hip Hop",
        sub_genre: "Trap",
    },
    GenreRule {
        matches: |p| p.tempo > 110.0 && p.tempo < 130.0 && p.centroid > 2500.0,
        genre: "Pop",
        sub_genre: "Dance Pop",
    },
    GenreRule {
        matches: |p| p.centroid < 2000.0,
        genre: "R&B",
        sub_genre: "Contemporary R&B",
    },
    GenreRule {
        matches: |p| p.tempo < 100.0,
        genre: "Ambient",
        sub_genre: "Downtempo",
    },
    GenreRule {
        matches: |_| true,
        genre: "Pop",
        sub_genre: "Contemporary",
    },
];

/// Look up (genre, sub_genre) for a profile
pub fn match_genre(profile: &TrackProfile) -> (&'static str, &'static str) {
    GENRE_RULES
        .iter()
        .find(|rule| (rule.matches)(profile))
        .map(|rule| (rule.genre, rule.sub_genre))
        .unwrap_or(("Pop", "Contemporary"))
}

/// Coarse loudness class used by the mood table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnergyLevel {
    High,
    Medium,
    Low,
}

impl EnergyLevel {
    /// High needs both loud (mean RMS > 0.1) and fast (> 120 BPM) material
    pub fn from_features(mean_rms: f32, tempo: f32) -> Self {
        if mean_rms > 0.1 && tempo > 120.0 {
            EnergyLevel::High
        } else if mean_rms < 0.05 {
            EnergyLevel::Low
        } else {
            EnergyLevel::Medium
        }
    }
}

/// Tonal colour estimated from chroma spread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tonality {
    Major,
    Minor,
}

impl Tonality {
    /// Low chroma variance (< 0.1) reads as major
    pub fn from_chroma_variance(variance: f32) -> Self {
        if variance < 0.1 {
            Tonality::Major
        } else {
            Tonality::Minor
        }
    }
}

/// Mood used when the table has no entry for a combination
pub const DEFAULT_MOOD: &str = "Balanced & Melodic";

/// Mood table keyed by (energy, tonality)
pub const MOOD_TABLE: &[(EnergyLevel, Tonality, &str)] = &[
    (EnergyLevel::High, Tonality::Major, "Energetic & Uplifting"),
    (EnergyLevel::High, Tonality::Minor, "Intense & Driving"),
    (EnergyLevel::Low, Tonality::Major, "Peaceful & Calm"),
    (EnergyLevel::Low, Tonality::Minor, "Melancholic & Contemplative"),
    (EnergyLevel::Medium, Tonality::Major, "Cheerful & Positive"),
    (EnergyLevel::Medium, Tonality::Minor, "Thoughtful & Reflective"),
];

/// Look up the mood phrase, falling back to `DEFAULT_MOOD`
pub fn lookup_mood(energy: EnergyLevel, tonality: Tonality) -> &'static str {
    MOOD_TABLE
        .iter()
        .find(|(e, t, _)| *e == energy && *t == tonality)
        .map(|(_, _, mood)| *mood)
        .unwrap_or(DEFAULT_MOOD)
}

/// Maximum number of instruments reported
pub const MAX_INSTRUMENTS: usize = 5;

/// Instrument rules, each independent; every match is appended in order
pub const INSTRUMENT_RULES: &[(fn(&TrackProfile) -> bool, &str)] = &[
    (|p| p.zcr > 0.1, "Drums"),
    (|p| p.centroid > 3000.0, "Hi-Hat/Cymbals"),
    (|p| p.centroid > 2000.0, "Synthesizer"),
    (|p| p.low_band_contrast > 20.0, "Bass"),
    (|p| p.centroid > 1000.0 && p.centroid < 3000.0, "Vocals"),
];

/// Guess instrumentation; sparse matches are topped up with "Keyboard"
///
/// # Returns
/// Between 1 and `MAX_INSTRUMENTS` instrument names
pub fn detect_instruments(profile: &TrackProfile) -> Vec<String> {
    let mut instruments: Vec<String> = INSTRUMENT_RULES
        .iter()
        .filter(|(matches, _)| matches(profile))
        .map(|(_, name)| name.to_string())
        .collect();

    if instruments.len() < 3 {
        instruments.push("Keyboard".to_string());
    }
    instruments.truncate(MAX_INSTRUMENTS);
    instruments
}
