// Summary - fold many AnalysisRecords into library-level statistics
//
// Histograms are counted in one pass in first-seen order and then stable
// sorted by descending count, so ties keep the order labels first appeared.

use serde::Serialize;

use crate::error::BatchError;
use crate::record::AnalysisRecord;

/// Number of tracks listed per top-N ranking
pub const TOP_N: usize = 3;

/// Energy above this is "high"
pub const HIGH_ENERGY_ABOVE: u8 = 70;

/// Energy below this is "low"
pub const LOW_ENERGY_BELOW: u8 = 40;

/// One label of a histogram
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramEntry {
    pub label: String,
    pub count: usize,
    /// count / total * 100
    pub percentage: f64,
}

/// Count labels and sort by descending count (stable)
pub fn histogram<'a, I>(labels: I) -> Vec<HistogramEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }

    let total: usize = counts.iter().map(|(_, count)| count).sum();
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .map(|(label, count)| HistogramEntry {
            label: label.to_string(),
            count,
            percentage: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            },
        })
        .collect()
}

/// Mean / max / min of one numeric field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldStats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

impl FieldStats {
    fn from_values(values: impl Iterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut max = f64::MIN;
        let mut min = f64::MAX;
        for value in values {
            count += 1;
            sum += value;
            max = max.max(value);
            min = min.min(value);
        }
        (count > 0).then(|| FieldStats {
            mean: sum / count as f64,
            max,
            min,
        })
    }
}

/// Track counts per energy band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnergyBands {
    /// energy > 70
    pub high: usize,
    /// 40 <= energy <= 70
    pub medium: usize,
    /// energy < 40
    pub low: usize,
}

/// A track and the score it was ranked by
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedTrack {
    pub file_name: String,
    pub score: u8,
}

/// Highest `n` records by `score`, stable on ties
pub fn top_n(records: &[AnalysisRecord], n: usize, score: fn(&AnalysisRecord) -> u8) -> Vec<RankedTrack> {
    let mut ranked: Vec<&AnalysisRecord> = records.iter().collect();
    ranked.sort_by(|a, b| score(b).cmp(&score(a)));
    ranked
        .into_iter()
        .take(n)
        .map(|record| RankedTrack {
            file_name: record.file_name.clone(),
            score: score(record),
        })
        .collect()
}

/// Per-genre breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreGroup {
    pub genre: String,
    pub sub_genres: Vec<HistogramEntry>,
    pub mean_tempo: f64,
    pub mean_energy: f64,
    pub mean_danceability: f64,
    /// Member tracks sorted by file name
    pub tracks: Vec<AnalysisRecord>,
}

impl GenreGroup {
    fn from_tracks(genre: &str, mut tracks: Vec<AnalysisRecord>) -> Self {
        let n = tracks.len().max(1) as f64;
        let sub_genres = histogram(tracks.iter().map(|t| t.sub_genre.as_str()));
        let mean_tempo = tracks.iter().map(|t| t.tempo).sum::<f64>() / n;
        let mean_energy = tracks.iter().map(|t| t.energy as f64).sum::<f64>() / n;
        let mean_danceability = tracks.iter().map(|t| t.danceability as f64).sum::<f64>() / n;
        tracks.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        Self {
            genre: genre.to_string(),
            sub_genres,
            mean_tempo,
            mean_energy,
            mean_danceability,
            tracks,
        }
    }
}

/// Library-level statistics over a batch of records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_tracks: usize,
    pub genres: Vec<HistogramEntry>,
    pub moods: Vec<HistogramEntry>,
    pub keys: Vec<HistogramEntry>,
    pub tempo: FieldStats,
    pub energy: FieldStats,
    pub energy_bands: EnergyBands,
    pub most_energetic: Vec<RankedTrack>,
    pub most_danceable: Vec<RankedTrack>,
    pub most_positive: Vec<RankedTrack>,
    /// Groups in first-seen genre order
    pub genre_groups: Vec<GenreGroup>,
}

impl BatchSummary {
    /// Aggregate records
    ///
    /// # Returns
    /// * `Ok(BatchSummary)` - statistics over all records
    /// * `Err(BatchError::EmptyBatch)` - no records were given
    pub fn from_records(records: &[AnalysisRecord]) -> Result<Self, BatchError> {
        let tempo = FieldStats::from_values(records.iter().map(|r| r.tempo))
            .ok_or(BatchError::EmptyBatch)?;
        let energy = FieldStats::from_values(records.iter().map(|r| r.energy as f64))
            .ok_or(BatchError::EmptyBatch)?;

        let energy_bands = EnergyBands {
            high: records.iter().filter(|r| r.energy > HIGH_ENERGY_ABOVE).count(),
            medium: records
                .iter()
                .filter(|r| (LOW_ENERGY_BELOW..=HIGH_ENERGY_ABOVE).contains(&r.energy))
                .count(),
            low: records.iter().filter(|r| r.energy < LOW_ENERGY_BELOW).count(),
        };

        let mut grouped: Vec<(&str, Vec<AnalysisRecord>)> = Vec::new();
        for record in records {
            match grouped.iter_mut().find(|(genre, _)| *genre == record.genre) {
                Some((_, tracks)) => tracks.push(record.clone()),
                None => grouped.push((record.genre.as_str(), vec![record.clone()])),
            }
        }

        Ok(Self {
            total_tracks: records.len(),
            genres: histogram(records.iter().map(|r| r.genre.as_str())),
            moods: histogram(records.iter().map(|r| r.mood.as_str())),
            keys: histogram(records.iter().map(|r| r.key.as_str())),
            tempo,
            energy,
            energy_bands,
            most_energetic: top_n(records, TOP_N, |r| r.energy),
            most_danceable: top_n(records, TOP_N, |r| r.danceability),
            most_positive: top_n(records, TOP_N, |r| r.valence),
            genre_groups: grouped
                .into_iter()
                .map(|(genre, tracks)| GenreGroup::from_tracks(genre, tracks))
                .collect(),
        })
    }
}
