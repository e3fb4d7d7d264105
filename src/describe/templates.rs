// Templates - fixed text layouts, one per description format
//
// Every function is pure: the same record always renders the same text.
// Tempo and loudness are printed with one decimal place.

use crate::record::AnalysisRecord;

use super::{podcast_use_case, use_case};

fn strip_spaces(text: &str) -> String {
    text.chars().filter(|c| *c != ' ').collect()
}

fn first_instruments(record: &AnalysisRecord, n: usize) -> String {
    record
        .instruments
        .iter()
        .take(n)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Video-platform description with hashtags
pub fn youtube(record: &AnalysisRecord) -> String {
    let instrument_lines = record
        .instruments
        .iter()
        .map(|inst| format!("• {}", inst))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "🎵 {file} | {genre} Music

🎼 Genre: {genre} - {sub_genre}
🎹 Key: {key}
⚡ Tempo: {tempo:.1} BPM
🎭 Mood: {mood}
⏱️ Duration: {duration}

🎧 Musical Characteristics:
• Energy Level: {energy}%
• Danceability: {danceability}%
• Emotional Valence: {valence}%
• Time Signature: {time_signature}

🎸 Instrumentation:
{instrument_lines}

📊 Technical Details:
• Loudness: {loudness:.1} dB
• Production Quality: Professional

Perfect for: {use_case}

#{genre_tag} #{sub_genre_tag} #Music #Production #Audio",
        file = record.file_name,
        genre = record.genre,
        sub_genre = record.sub_genre,
        key = record.key,
        tempo = record.tempo,
        mood = record.mood,
        duration = record.duration,
        energy = record.energy,
        danceability = record.danceability,
        valence = record.valence,
        time_signature = record.time_signature,
        instrument_lines = instrument_lines,
        loudness = record.loudness,
        use_case = use_case(record),
        genre_tag = strip_spaces(&record.genre),
        sub_genre_tag = strip_spaces(&record.sub_genre),
    )
}

/// Podcast show notes
pub fn podcast(record: &AnalysisRecord) -> String {
    format!(
        "Episode Background Music: {file}

This {mood_lower} {genre_lower} track creates the perfect atmosphere for your podcast. Running at {tempo:.1} BPM in {key}, it features {featured} that provide a professional sonic backdrop without overwhelming dialogue.

🎵 Track Details:
Mood: {mood}
Genre: {genre} - {sub_genre}
Duration: {duration}
Energy Level: {energy}/100
Danceability: {danceability}/100

🎧 Best Used During: {use_case}

Technical Specifications:
{tempo:.1} BPM | {key} | {time_signature}
Loudness: {loudness:.1} dB

This track provides consistent energy throughout, making it ideal for maintaining listener engagement during key moments of your show.",
        file = record.file_name,
        mood_lower = record.mood.to_lowercase(),
        genre_lower = record.genre.to_lowercase(),
        tempo = record.tempo,
        key = record.key,
        featured = first_instruments(record, 3).to_lowercase(),
        mood = record.mood,
        genre = record.genre,
        sub_genre = record.sub_genre,
        duration = record.duration,
        energy = record.energy,
        danceability = record.danceability,
        use_case = podcast_use_case(record),
        time_signature = record.time_signature,
        loudness = record.loudness,
    )
}

/// Music-library metadata sheet with a tag list
pub fn library(record: &AnalysisRecord) -> String {
    let mut tags = vec![
        record.genre.clone(),
        record.sub_genre.clone(),
        record.mood.clone(),
        format!("{:.1}BPM", record.tempo),
        strip_spaces(&record.key),
    ];
    tags.extend(record.instruments.iter().cloned());

    format!(
        "Title: {file}
Genre: {genre}
Sub-Genre: {sub_genre}
Mood: {mood}
Tempo: {tempo:.1} BPM
Key: {key}
Time Signature: {time_signature}
Duration: {duration}

Instruments: {instruments}

Audio Features:
• Energy: {energy}%
• Danceability: {danceability}%
• Valence: {valence}%
• Loudness: {loudness:.1} dB

Tags: {tags}

Description: A {mood_lower} {genre_lower} track featuring {featured}. Perfect for {use_case_lower}.",
        file = record.file_name,
        genre = record.genre,
        sub_genre = record.sub_genre,
        mood = record.mood,
        tempo = record.tempo,
        key = record.key,
        time_signature = record.time_signature,
        duration = record.duration,
        instruments = record.instruments.join(", "),
        energy = record.energy,
        danceability = record.danceability,
        valence = record.valence,
        loudness = record.loudness,
        tags = tags.join(", "),
        mood_lower = record.mood.to_lowercase(),
        genre_lower = record.genre.to_lowercase(),
        featured = first_instruments(record, 3).to_lowercase(),
        use_case_lower = use_case(record).to_lowercase(),
    )
}

/// Short social post
pub fn social(record: &AnalysisRecord) -> String {
    let (emoji, vibe) = if record.energy > 70 {
        ("🔥", "high-energy")
    } else {
        ("✨", "chill")
    };
    let mood_tag = record.mood.split_whitespace().next().unwrap_or_default();

    format!(
        "🎵 New {genre} Release! 🎵

{mood} vibes at {tempo:.1} BPM {emoji}
Key: {key} | {duration}

Featuring: {featured}

Perfect for your {vibe} playlist! 💯

#{genre_tag} #Music #NewMusic #{mood_tag} #Audio #Production #{sub_genre_tag}",
        genre = record.genre,
        mood = record.mood,
        tempo = record.tempo,
        emoji = emoji,
        key = record.key,
        duration = record.duration,
        featured = first_instruments(record, 3),
        vibe = vibe,
        genre_tag = strip_spaces(&record.genre),
        mood_tag = mood_tag,
        sub_genre_tag = strip_spaces(&record.sub_genre),
    )
}
