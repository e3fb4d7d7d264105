// Export - tabular CSV of all records

use std::io::Write;

use serde::Serialize;

use crate::error::BatchError;
use crate::record::AnalysisRecord;

/// One CSV row; same columns as AnalysisRecord with instruments flattened
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    file_name: &'a str,
    duration: &'a str,
    duration_seconds: f64,
    tempo: f64,
    key: &'a str,
    time_signature: &'a str,
    genre: &'a str,
    sub_genre: &'a str,
    mood: &'a str,
    instruments: String,
    energy: u8,
    danceability: u8,
    valence: u8,
    loudness: f64,
    analysis_date: &'a str,
}

impl<'a> From<&'a AnalysisRecord> for CsvRow<'a> {
    fn from(record: &'a AnalysisRecord) -> Self {
        Self {
            file_name: &record.file_name,
            duration: &record.duration,
            duration_seconds: record.duration_seconds,
            tempo: record.tempo,
            key: &record.key,
            time_signature: &record.time_signature,
            genre: &record.genre,
            sub_genre: &record.sub_genre,
            mood: &record.mood,
            instruments: record.instruments.join(", "),
            energy: record.energy,
            danceability: record.danceability,
            valence: record.valence,
            loudness: record.loudness,
            analysis_date: &record.analysis_date,
        }
    }
}

/// Write records as CSV with a header row
pub fn write_csv<W: Write>(records: &[AnalysisRecord], writer: W) -> Result<(), BatchError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(CsvRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}
