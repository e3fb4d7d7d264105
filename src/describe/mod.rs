// Describe module - render analysis records into publishable text
//
// Four fixed formats are supported. Rendering never fails for a record
// built by RecordBuilder; `DescriptionSet::render_checked` re-validates
// records that came from elsewhere (e.g. deserialized JSON).

pub mod templates;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::record::AnalysisRecord;

/// Output format of a description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionFormat {
    Youtube,
    Podcast,
    Library,
    Social,
}

impl DescriptionFormat {
    /// All formats in artifact order
    pub const ALL: [DescriptionFormat; 4] = [
        DescriptionFormat::Youtube,
        DescriptionFormat::Podcast,
        DescriptionFormat::Library,
        DescriptionFormat::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptionFormat::Youtube => "youtube",
            DescriptionFormat::Podcast => "podcast",
            DescriptionFormat::Library => "library",
            DescriptionFormat::Social => "social",
        }
    }

    /// Render one record in this format
    pub fn render(&self, record: &AnalysisRecord) -> String {
        match self {
            DescriptionFormat::Youtube => templates::youtube(record),
            DescriptionFormat::Podcast => templates::podcast(record),
            DescriptionFormat::Library => templates::library(record),
            DescriptionFormat::Social => templates::social(record),
        }
    }
}

impl fmt::Display for DescriptionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DescriptionFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DescriptionFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| format!("unknown description format '{}'", s))
    }
}

/// All four descriptions of one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionSet {
    pub youtube: String,
    pub podcast: String,
    pub library: String,
    pub social: String,
}

impl DescriptionSet {
    pub fn render(record: &AnalysisRecord) -> Self {
        Self {
            youtube: templates::youtube(record),
            podcast: templates::podcast(record),
            library: templates::library(record),
            social: templates::social(record),
        }
    }

    /// Validate the record first, then render
    pub fn render_checked(record: &AnalysisRecord) -> Result<Self, RenderError> {
        record.check_invariants()?;
        Ok(Self::render(record))
    }

    pub fn get(&self, format: DescriptionFormat) -> &str {
        match format {
            DescriptionFormat::Youtube => &self.youtube,
            DescriptionFormat::Podcast => &self.podcast,
            DescriptionFormat::Library => &self.library,
            DescriptionFormat::Social => &self.social,
        }
    }

    /// (format, text) pairs in artifact order
    pub fn iter(&self) -> impl Iterator<Item = (DescriptionFormat, &str)> {
        DescriptionFormat::ALL
            .into_iter()
            .map(move |format| (format, self.get(format)))
    }
}

/// General-purpose use case, first matching rule wins
pub fn use_case(record: &AnalysisRecord) -> &'static str {
    if record.energy > 75 && record.danceability > 70 {
        "High-energy workouts, parties, gaming, and intense activities"
    } else if record.energy < 40 && record.valence < 50 {
        "Relaxation, meditation, studying, and calm focus work"
    } else if record.danceability > 70 {
        "Dancing, social gatherings, and upbeat content"
    } else if record.valence > 70 {
        "Uplifting content, vlogs, celebrations, and positive moments"
    } else {
        "Background music, creative work, podcasts, and versatile content"
    }
}

/// Podcast placement, chosen by energy alone
pub fn podcast_use_case(record: &AnalysisRecord) -> &'static str {
    if record.energy > 70 {
        "High-energy segments, show introductions, exciting announcements, and climactic moments"
    } else if record.energy < 40 {
        "Thoughtful discussions, emotional stories, meditation segments, and closing thoughts"
    } else {
        "Transitions between segments, background for interviews, and general podcast atmosphere"
    }
}
