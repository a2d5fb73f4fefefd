use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

mod query;
mod song;

pub use query::Query;
pub use song::{format_duration, AudioFeatures, SongRecord, FEATURE_COUNT};

/// Genres the catalog is curated for
///
/// Serialized with the display name (e.g. "Hip Hop"); the catalog stores the
/// lower-cased key (e.g. "hip hop") on every row.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    #[serde(rename = "Dance Pop")]
    DancePop,
    Electronic,
    Electropop,
    #[serde(rename = "Hip Hop")]
    HipHop,
    Jazz,
    #[serde(rename = "K-pop")]
    KPop,
    Latin,
    #[default]
    Pop,
    #[serde(rename = "Pop Rap")]
    PopRap,
    #[serde(rename = "R&B")]
    RnB,
    Rock,
}

impl Genre {
    /// Every genre, in the order the genre picker lists them
    pub const ALL: [Genre; 11] = [
        Genre::DancePop,
        Genre::Electronic,
        Genre::Electropop,
        Genre::HipHop,
        Genre::Jazz,
        Genre::KPop,
        Genre::Latin,
        Genre::Pop,
        Genre::PopRap,
        Genre::RnB,
        Genre::Rock,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Genre::DancePop => "Dance Pop",
            Genre::Electronic => "Electronic",
            Genre::Electropop => "Electropop",
            Genre::HipHop => "Hip Hop",
            Genre::Jazz => "Jazz",
            Genre::KPop => "K-pop",
            Genre::Latin => "Latin",
            Genre::Pop => "Pop",
            Genre::PopRap => "Pop Rap",
            Genre::RnB => "R&B",
            Genre::Rock => "Rock",
        }
    }

    /// Lower-cased name stored on catalog rows
    pub fn catalog_key(&self) -> &'static str {
        match self {
            Genre::DancePop => "dance pop",
            Genre::Electronic => "electronic",
            Genre::Electropop => "electropop",
            Genre::HipHop => "hip hop",
            Genre::Jazz => "jazz",
            Genre::KPop => "k-pop",
            Genre::Latin => "latin",
            Genre::Pop => "pop",
            Genre::PopRap => "pop rap",
            Genre::RnB => "r&b",
            Genre::Rock => "rock",
        }
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Returned when a name is outside the genre vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown genre: {0}")]
pub struct UnknownGenre(pub String);

impl FromStr for Genre {
    type Err = UnknownGenre;

    /// Case-insensitive; "korean pop" is an alias of K-pop
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized == "korean pop" {
            return Ok(Genre::KPop);
        }
        Genre::ALL
            .into_iter()
            .find(|genre| genre.catalog_key() == normalized)
            .ok_or_else(|| UnknownGenre(s.to_string()))
    }
}
