use serde::{Deserialize, Serialize};

/// Number of dimensions in the similarity space
pub const FEATURE_COUNT: usize = 6;

/// Audio descriptors used as the similarity metric space
///
/// Five features are normalized to [0, 1]; tempo is in beats per minute.
/// Distances are computed on these raw values, so tempo dominates the metric.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub acousticness: f64,
    pub danceability: f64,
    pub energy: f64,
    pub instrumentalness: f64,
    pub valence: f64,
    pub tempo: f64,
}

impl AudioFeatures {
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.acousticness,
            self.danceability,
            self.energy,
            self.instrumentalness,
            self.valence,
            self.tempo,
        ]
    }

    /// Euclidean distance between two feature vectors
    pub fn distance(&self, other: &AudioFeatures) -> f64 {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

impl From<[f64; FEATURE_COUNT]> for AudioFeatures {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        let [acousticness, danceability, energy, instrumentalness, valence, tempo] = values;
        Self {
            acousticness,
            danceability,
            energy,
            instrumentalness,
            valence,
            tempo,
        }
    }
}

/// One catalog row: a track paired with a single one of its genres
#[derive(Debug, Clone, PartialEq)]
pub struct SongRecord {
    /// Track identifier, shared by every row of the same track
    pub uri: String,
    pub name: String,
    pub artists_name: String,
    /// Lower-cased genre key (see [`crate::models::Genre::catalog_key`])
    pub genre: String,
    pub playlist: String,
    pub release_date: String,
    pub release_year: i32,
    pub features: AudioFeatures,
    pub popularity: u32,
    pub duration_ms: u64,
    pub lyrics: String,
}

/// Formats a track length as "M min S s"
pub fn format_duration(duration_ms: u64) -> String {
    let total_secs = (duration_ms + 500) / 1000;
    format!("{} min {} s", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let features = AudioFeatures::from([0.2, 0.5, 0.7, 0.0, 0.3, 120.0]);
        assert_eq!(features.distance(&features), 0.0);
    }

    #[test]
    fn test_distance_is_unweighted_euclidean() {
        let a = AudioFeatures::from([0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let b = AudioFeatures::from([0.0, 0.0, 0.0, 0.0, 0.0, 4.0]);
        let c = AudioFeatures::from([1.0, 1.0, 1.0, 1.0, 0.0, 0.0]);
        assert_eq!(a.distance(&b), 4.0);
        assert_eq!(a.distance(&c), 2.0);
    }

    #[test]
    fn test_to_array_order() {
        let features = AudioFeatures {
            acousticness: 1.0,
            danceability: 2.0,
            energy: 3.0,
            instrumentalness: 4.0,
            valence: 5.0,
            tempo: 6.0,
        };
        assert_eq!(features.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(210_000), "3 min 30 s");
        assert_eq!(format_duration(59_600), "1 min 0 s");
        assert_eq!(format_duration(0), "0 min 0 s");
    }
}
