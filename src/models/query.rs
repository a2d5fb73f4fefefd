use serde::{Deserialize, Serialize};

use super::AudioFeatures;

/// A recommendation request as the user sees it in the sidebar
///
/// Two queries are the same search only if every field matches, including
/// each component of the feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub genre: String,
    pub start_year: i32,
    pub end_year: i32,
    pub features: AudioFeatures,
}

impl Query {
    pub fn new(
        genre: impl Into<String>,
        start_year: i32,
        end_year: i32,
        features: AudioFeatures,
    ) -> Self {
        Self {
            genre: genre.into(),
            start_year,
            end_year,
            features,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries_differing_in_one_feature_are_not_equal() {
        let a = Query::new("Pop", 1990, 2019, AudioFeatures::default());
        let mut b = a.clone();
        assert_eq!(a, b);

        b.features.valence = 0.01;
        assert_ne!(a, b);
    }

    #[test]
    fn test_query_deserialize() {
        let json = r#"{
            "genre": "Rock",
            "start_year": 2000,
            "end_year": 2010,
            "features": {
                "acousticness": 0.1,
                "danceability": 0.2,
                "energy": 0.3,
                "instrumentalness": 0.4,
                "valence": 0.5,
                "tempo": 128.0
            }
        }"#;
        let query: Query = serde_json::from_str(json).unwrap();
        assert_eq!(query.genre, "Rock");
        assert_eq!(query.end_year, 2010);
        assert_eq!(query.features.tempo, 128.0);
    }
}
