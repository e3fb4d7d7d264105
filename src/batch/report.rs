// Report - plain-text renderings of a BatchSummary

use super::summary::{BatchSummary, GenreGroup, HistogramEntry, RankedTrack};

/// Entries shown in the key distribution section
pub const KEY_REPORT_LIMIT: usize = 10;

/// Render the library-wide summary report
///
/// # Arguments
/// * `summary` - Aggregated statistics
/// * `generated` - Timestamp printed in the header
pub fn summary_report(summary: &BatchSummary, generated: &str) -> String {
    let banner = "=".repeat(70);
    let rule = "-".repeat(70);
    let mut lines: Vec<String> = Vec::new();

    lines.push(banner.clone());
    lines.push("MUSIC LIBRARY ANALYSIS REPORT".to_string());
    lines.push(banner.clone());
    lines.push(format!("Generated: {}", generated));
    lines.push(format!("Total Tracks Analyzed: {}", summary.total_tracks));
    lines.push(String::new());

    push_distribution(&mut lines, &rule, "GENRE DISTRIBUTION", &summary.genres);
    push_distribution(&mut lines, &rule, "MOOD DISTRIBUTION", &summary.moods);

    lines.push("TEMPO ANALYSIS".to_string());
    lines.push(rule.clone());
    lines.push(format!("  Average Tempo: {:.1} BPM", summary.tempo.mean));
    lines.push(format!("  Fastest Track: {:.1} BPM", summary.tempo.max));
    lines.push(format!("  Slowest Track: {:.1} BPM", summary.tempo.min));
    lines.push(String::new());

    lines.push("ENERGY LEVELS".to_string());
    lines.push(rule.clone());
    lines.push(format!("  Average Energy: {:.1}%", summary.energy.mean));
    lines.push(format!("  High Energy (>70%): {} tracks", summary.energy_bands.high));
    lines.push(format!(
        "  Medium Energy (40-70%): {} tracks",
        summary.energy_bands.medium
    ));
    lines.push(format!("  Low Energy (<40%): {} tracks", summary.energy_bands.low));
    lines.push(String::new());

    lines.push("KEY DISTRIBUTION".to_string());
    lines.push(rule.clone());
    for entry in summary.keys.iter().take(KEY_REPORT_LIMIT) {
        lines.push(format!("  {}: {} tracks", entry.label, entry.count));
    }
    lines.push(String::new());

    lines.push("TOP TRACKS".to_string());
    lines.push(rule);
    push_ranking(&mut lines, "Most Energetic", &summary.most_energetic);
    push_ranking(&mut lines, "Most Danceable", &summary.most_danceable);
    push_ranking(&mut lines, "Most Positive", &summary.most_positive);

    lines.push(banner);
    lines.join("\n")
}

fn push_distribution(lines: &mut Vec<String>, rule: &str, title: &str, entries: &[HistogramEntry]) {
    lines.push(title.to_string());
    lines.push(rule.to_string());
    for entry in entries {
        lines.push(format!(
            "  {}: {} tracks ({:.1}%)",
            entry.label, entry.count, entry.percentage
        ));
    }
    lines.push(String::new());
}

fn push_ranking(lines: &mut Vec<String>, title: &str, tracks: &[RankedTrack]) {
    lines.push(format!("  {}:", title));
    for (i, track) in tracks.iter().enumerate() {
        lines.push(format!("    {}. {} ({}%)", i + 1, track.file_name, track.score));
    }
    lines.push(String::new());
}

/// Render the report for one genre
pub fn genre_report(group: &GenreGroup) -> String {
    let banner = "=".repeat(60);
    let mut lines: Vec<String> = Vec::new();

    lines.push(banner.clone());
    lines.push(format!("{} GENRE REPORT", group.genre.to_uppercase()));
    lines.push(banner.clone());
    lines.push(format!("Total Tracks: {}", group.tracks.len()));
    lines.push(String::new());

    lines.push("Sub-Genres:".to_string());
    for entry in &group.sub_genres {
        lines.push(format!("  • {}: {} tracks", entry.label, entry.count));
    }
    lines.push(String::new());

    lines.push("Average Characteristics:".to_string());
    lines.push(format!("  • Tempo: {:.1} BPM", group.mean_tempo));
    lines.push(format!("  • Energy: {:.1}%", group.mean_energy));
    lines.push(format!("  • Danceability: {:.1}%", group.mean_danceability));
    lines.push(String::new());

    lines.push("Tracks:".to_string());
    for track in &group.tracks {
        lines.push(format!("  • {}", track.file_name));
        lines.push(format!(
            "    {:.1} BPM | {} | {}",
            track.tempo, track.key, track.mood
        ));
    }

    lines.push(banner);
    lines.join("\n")
}

/// File name of a genre report: lowercase, spaces replaced by underscores
pub fn genre_report_file_name(genre: &str) -> String {
    format!("{}_report.txt", genre.to_lowercase().replace(' ', "_"))
}
