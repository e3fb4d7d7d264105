// Artifacts - persist records, descriptions and reports to disk
//
// Layout under a batch output directory:
//   analysis_summary.txt
//   music_analysis.csv
//   genre_reports/<genre>_report.txt
//   individual_tracks/<stem>_analysis.json
//   individual_tracks/<stem>_<format>.txt

use std::fs;
use std::path::{Path, PathBuf};

use crate::describe::DescriptionSet;
use crate::error::BatchError;
use crate::record::AnalysisRecord;

use super::export::write_csv;
use super::report::{genre_report, genre_report_file_name, summary_report};
use super::summary::BatchSummary;

pub const SUMMARY_FILE: &str = "analysis_summary.txt";
pub const CSV_FILE: &str = "music_analysis.csv";
pub const GENRE_REPORTS_DIR: &str = "genre_reports";
pub const TRACKS_DIR: &str = "individual_tracks";

/// File stem used for a record's artifacts
pub fn track_stem(record: &AnalysisRecord) -> String {
    Path::new(&record.file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| record.file_name.clone())
}

/// Write `<stem>_analysis.json` plus one text file per description format
///
/// # Returns
/// Paths written, JSON first
pub fn write_track_artifacts(
    dir: &Path,
    record: &AnalysisRecord,
    descriptions: &DescriptionSet,
) -> Result<Vec<PathBuf>, BatchError> {
    fs::create_dir_all(dir)?;
    let stem = track_stem(record);
    let mut written = Vec::with_capacity(5);

    let json_path = dir.join(format!("{}_analysis.json", stem));
    fs::write(&json_path, serde_json::to_string_pretty(record)?)?;
    written.push(json_path);

    for (format, text) in descriptions.iter() {
        let path = dir.join(format!("{}_{}.txt", stem, format.as_str()));
        fs::write(&path, text)?;
        written.push(path);
    }

    log::debug!("[Artifacts] wrote {} files for {}", written.len(), record.file_name);
    Ok(written)
}

/// Write the summary report, CSV export and per-genre reports
///
/// # Arguments
/// * `output_dir` - Batch output directory
/// * `summary` - Aggregated statistics
/// * `records` - Records in processing order (CSV row order)
/// * `generated` - Timestamp printed in the summary header
pub fn write_batch_reports(
    output_dir: &Path,
    summary: &BatchSummary,
    records: &[AnalysisRecord],
    generated: &str,
) -> Result<(), BatchError> {
    fs::create_dir_all(output_dir)?;

    fs::write(output_dir.join(SUMMARY_FILE), summary_report(summary, generated))?;

    let csv_file = fs::File::create(output_dir.join(CSV_FILE))?;
    write_csv(records, csv_file)?;

    let genre_dir = output_dir.join(GENRE_REPORTS_DIR);
    fs::create_dir_all(&genre_dir)?;
    for group in &summary.genre_groups {
        fs::write(
            genre_dir.join(genre_report_file_name(&group.genre)),
            genre_report(group),
        )?;
    }

    log::info!(
        "[Artifacts] wrote reports for {} tracks / {} genres to {}",
        summary.total_tracks,
        summary.genre_groups.len(),
        output_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::summary::tests::record;

    #[test]
    fn test_track_artifacts_layout() {
        let dir = tempfile::tempdir().unwrap();
        let record = record("My Song.mp3", "Pop", 120.0, 50);
        let descriptions = DescriptionSet::render(&record);

        let written = write_track_artifacts(dir.path(), &record, &descriptions).unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "My Song_analysis.json",
                "My Song_youtube.txt",
                "My Song_podcast.txt",
                "My Song_library.txt",
                "My Song_social.txt",
            ]
        );

        let json = fs::read_to_string(&written[0]).unwrap();
        assert!(json.starts_with("{\n  \"file_name\": \"My Song.mp3\","));
        let parsed: AnalysisRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);

        let social = fs::read_to_string(&written[4]).unwrap();
        assert_eq!(social, descriptions.social);
    }

    #[test]
    fn test_batch_reports_layout() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            record("a.wav", "Hip Hop", 85.0, 30),
            record("b.wav", "Pop", 120.0, 80),
        ];
        let summary = BatchSummary::from_records(&records).unwrap();

        write_batch_reports(dir.path(), &summary, &records, "2024-01-01 00:00:00").unwrap();

        assert!(dir.path().join(SUMMARY_FILE).is_file());
        assert!(dir.path().join(CSV_FILE).is_file());
        assert!(dir.path().join(GENRE_REPORTS_DIR).join("hip_hop_report.txt").is_file());
        assert!(dir.path().join(GENRE_REPORTS_DIR).join("pop_report.txt").is_file());

        let csv = fs::read_to_string(dir.path().join(CSV_FILE)).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }
}
