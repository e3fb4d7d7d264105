// Record - the flat, serializable result of analysing one track
//
// An AnalysisRecord is immutable once built. Field order here is the order
// used in the JSON artifact and the CSV header.

use serde::{Deserialize, Serialize};

use crate::analysis::classifier::Classification;
use crate::error::RenderError;

/// Time signature reported for every track
pub const TIME_SIGNATURE: &str = "4/4";

/// Timestamp layout for `analysis_date`
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Maximum number of instruments a record may list
pub const MAX_INSTRUMENTS: usize = 5;

/// Analysis result for a single track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub file_name: String,
    /// "M:SS"
    pub duration: String,
    pub duration_seconds: f64,
    /// BPM rounded to one decimal
    pub tempo: f64,
    /// "<PitchClass> Major" or "<PitchClass> Minor"
    pub key: String,
    pub time_signature: String,
    pub genre: String,
    pub sub_genre: String,
    pub mood: String,
    pub instruments: Vec<String>,
    pub energy: u8,
    pub danceability: u8,
    pub valence: u8,
    /// dB rounded to one decimal
    pub loudness: f64,
    /// Local time, `DATE_FORMAT`
    pub analysis_date: String,
}

impl AnalysisRecord {
    /// Verify every documented field range
    ///
    /// # Returns
    /// * `Ok(())` - record is safe to render
    /// * `Err(RenderError::InvariantViolation)` - names the first bad field
    pub fn check_invariants(&self) -> Result<(), RenderError> {
        let violation = |field: &str| {
            Err(RenderError::InvariantViolation {
                field: field.to_string(),
            })
        };

        if self.energy > 100 {
            return violation("energy");
        }
        if self.danceability > 100 {
            return violation("danceability");
        }
        if self.valence > 100 {
            return violation("valence");
        }
        if self.instruments.is_empty() || self.instruments.len() > MAX_INSTRUMENTS {
            return violation("instruments");
        }
        if !self.loudness.is_finite() {
            return violation("loudness");
        }
        if !self.tempo.is_finite() || self.tempo < 0.0 {
            return violation("tempo");
        }
        if !self.duration_seconds.is_finite() || self.duration_seconds < 0.0 {
            return violation("duration_seconds");
        }
        if !(self.key.ends_with(" Major") || self.key.ends_with(" Minor")) {
            return violation("key");
        }
        Ok(())
    }
}

/// Assembles an AnalysisRecord from a classification plus file metadata
pub struct RecordBuilder {
    file_name: String,
    duration_secs: f64,
    analysis_date: Option<String>,
}

impl RecordBuilder {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            duration_secs: 0.0,
            analysis_date: None,
        }
    }

    pub fn duration_secs(mut self, secs: f64) -> Self {
        self.duration_secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        self
    }

    /// Override the timestamp (defaults to the local time at `build`)
    pub fn analysis_date(mut self, date: impl Into<String>) -> Self {
        self.analysis_date = Some(date.into());
        self
    }

    /// Build the record, normalising every field into its documented range
    pub fn build(self, classification: Classification) -> AnalysisRecord {
        let mut instruments = classification.instruments;
        instruments.truncate(MAX_INSTRUMENTS);
        if instruments.is_empty() {
            instruments.push("Keyboard".to_string());
        }

        let tempo = if classification.tempo.is_finite() {
            round1(classification.tempo.max(0.0) as f64)
        } else {
            0.0
        };
        let loudness = if classification.loudness.is_finite() {
            round1(classification.loudness as f64)
        } else {
            round1(crate::analysis::classifier::SILENCE_DB as f64)
        };

        AnalysisRecord {
            file_name: self.file_name,
            duration: format_duration(self.duration_secs),
            duration_seconds: self.duration_secs,
            tempo,
            key: classification.key,
            time_signature: TIME_SIGNATURE.to_string(),
            genre: classification.genre,
            sub_genre: classification.sub_genre,
            mood: classification.mood,
            instruments,
            energy: classification.energy.min(100),
            danceability: classification.danceability.min(100),
            valence: classification.valence.min(100),
            loudness,
            analysis_date: self
                .analysis_date
                .unwrap_or_else(|| chrono::Local::now().format(DATE_FORMAT).to_string()),
        }
    }
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Format seconds as "M:SS" (minutes are not wrapped into hours)
pub fn format_duration(secs: f64) -> String {
    let total = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
    let minutes = (total / 60.0).floor() as u64;
    let seconds = (total % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification() -> Classification {
        Classification {
            tempo: 117.4537,
            key: "A Minor".to_string(),
            genre: "Pop".to_string(),
            sub_genre: "Dance Pop".to_string(),
            mood: "Cheerful & Positive".to_string(),
            instruments: vec!["Synthesizer".to_string(), "Vocals".to_string()],
            energy: 72,
            danceability: 80,
            valence: 65,
            loudness: -12.345,
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(59.9), "0:59");
        assert_eq!(format_duration(60.0), "1:00");
        assert_eq!(format_duration(185.2), "3:05");
        assert_eq!(format_duration(3725.0), "62:05");
        assert_eq!(format_duration(f64::NAN), "0:00");
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(117.4537), 117.5);
        assert_eq!(round1(-12.345), -12.3);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn test_builder_rounds_and_fills_fixed_fields() {
        let record = RecordBuilder::new("track.wav")
            .duration_secs(185.2)
            .analysis_date("2024-01-02 03:04:05")
            .build(classification());

        assert_eq!(record.file_name, "track.wav");
        assert_eq!(record.duration, "3:05");
        assert_eq!(record.tempo, 117.5);
        assert_eq!(record.loudness, -12.3);
        assert_eq!(record.time_signature, "4/4");
        assert_eq!(record.analysis_date, "2024-01-02 03:04:05");
        assert!(record.check_invariants().is_ok());
    }

    #[test]
    fn test_builder_default_timestamp_format() {
        let record = RecordBuilder::new("a.wav").build(classification());
        assert!(chrono::NaiveDateTime::parse_from_str(&record.analysis_date, DATE_FORMAT).is_ok());
    }

    #[test]
    fn test_builder_normalises_out_of_range_input() {
        let mut raw = classification();
        raw.energy = 250;
        raw.instruments = (0..8).map(|i| format!("inst{i}")).collect();
        raw.loudness = f32::NEG_INFINITY;
        raw.tempo = f32::NAN;

        let record = RecordBuilder::new("x.wav").build(raw);
        assert_eq!(record.energy, 100);
        assert_eq!(record.instruments.len(), MAX_INSTRUMENTS);
        assert_eq!(record.loudness, -100.0);
        assert_eq!(record.tempo, 0.0);
        assert!(record.check_invariants().is_ok());
    }

    #[test]
    fn test_invariant_violation_names_field() {
        let mut record = RecordBuilder::new("x.wav").build(classification());
        record.instruments.clear();
        assert_eq!(
            record.check_invariants(),
            Err(RenderError::InvariantViolation {
                field: "instruments".to_string()
            })
        );

        let mut record = RecordBuilder::new("x.wav").build(classification());
        record.valence = 101;
        assert!(record.check_invariants().is_err());
    }

    #[test]
    fn test_json_field_order() {
        let record = RecordBuilder::new("x.wav")
            .analysis_date("2024-01-02 03:04:05")
            .build(classification());
        let json = serde_json::to_string(&record).unwrap();

        let order = [
            "file_name",
            "duration",
            "duration_seconds",
            "tempo",
            "key",
            "time_signature",
            "genre",
            "sub_genre",
            "mood",
            "instruments",
            "energy",
            "danceability",
            "valence",
            "loudness",
            "analysis_date",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|field| json.find(&format!("\"{field}\":")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
