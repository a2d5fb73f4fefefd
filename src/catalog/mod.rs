use crate::models::SongRecord;

mod load;

pub use load::{load_catalog, load_from_reader, release_year, CatalogError};

/// In-memory, read-only song catalog
///
/// Holds one row per (track, genre) pair in catalog order. Every view
/// returned here borrows from the store and preserves that order.
#[derive(Debug, Default)]
pub struct CatalogStore {
    records: Vec<SongRecord>,
}

impl CatalogStore {
    pub fn new(records: Vec<SongRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every row, unscoped by genre
    pub fn all_records(&self) -> Vec<&SongRecord> {
        self.records.iter().collect()
    }

    /// Rows of `genre` (case-insensitive) released within the inclusive year range
    ///
    /// A genre outside the vocabulary simply matches nothing.
    pub fn filter_by_genre_and_year(
        &self,
        genre: &str,
        start_year: i32,
        end_year: i32,
    ) -> Vec<&SongRecord> {
        let genre = genre.trim().to_lowercase();
        self.records
            .iter()
            .filter(|song| song.genre == genre)
            .filter(|song| song.release_year >= start_year && song.release_year <= end_year)
            .collect()
    }

    /// Rows whose artist name matches exactly
    pub fn by_artist(&self, artists_name: &str) -> Vec<&SongRecord> {
        self.records
            .iter()
            .filter(|song| song.artists_name == artists_name)
            .collect()
    }

    /// Rows saved in the given playlist (exact match)
    pub fn by_playlist(&self, playlist: &str) -> Vec<&SongRecord> {
        self.records
            .iter()
            .filter(|song| song.playlist == playlist)
            .collect()
    }

    /// First row of the track with this uri
    pub fn find_by_uri(&self, uri: &str) -> Option<&SongRecord> {
        self.records.iter().find(|song| song.uri == uri)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::song;
    use super::*;

    fn create_test_catalog() -> CatalogStore {
        CatalogStore::new(vec![
            SongRecord {
                release_year: 1995,
                ..song("a", 80, [0.1, 0.2, 0.3, 0.0, 0.5, 100.0])
            },
            SongRecord {
                genre: "rock".to_string(),
                release_year: 2001,
                ..song("b", 60, [0.4, 0.5, 0.6, 0.1, 0.2, 140.0])
            },
            SongRecord {
                release_year: 2019,
                ..song("c", 70, [0.9, 0.1, 0.2, 0.0, 0.7, 90.0])
            },
            SongRecord {
                release_year: 1990,
                ..song("b", 60, [0.4, 0.5, 0.6, 0.1, 0.2, 140.0])
            },
        ])
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let catalog = create_test_catalog();
        let songs = catalog.filter_by_genre_and_year("Pop", 1900, 2100);
        assert_eq!(songs.len(), 3);
        assert!(songs.iter().all(|s| s.genre == "pop"));

        let rock = catalog.filter_by_genre_and_year("ROCK", 1900, 2100);
        assert_eq!(rock.len(), 1);
        assert_eq!(rock[0].uri, "b");
    }

    #[test]
    fn test_filter_year_bounds_are_inclusive() {
        let catalog = create_test_catalog();
        let songs = catalog.filter_by_genre_and_year("pop", 1990, 2019);
        let uris: Vec<&str> = songs.iter().map(|s| s.uri.as_str()).collect();
        assert_eq!(uris, vec!["a", "c", "b"]);

        let songs = catalog.filter_by_genre_and_year("pop", 1991, 2018);
        let uris: Vec<&str> = songs.iter().map(|s| s.uri.as_str()).collect();
        assert_eq!(uris, vec!["a"]);
    }

    #[test]
    fn test_unknown_genre_yields_empty() {
        let catalog = create_test_catalog();
        assert!(catalog.filter_by_genre_and_year("polka", 1900, 2100).is_empty());
    }

    #[test]
    fn test_empty_year_window_yields_empty() {
        let catalog = create_test_catalog();
        assert!(catalog.filter_by_genre_and_year("pop", 2010, 2000).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let catalog = create_test_catalog();
        let first = catalog.filter_by_genre_and_year("pop", 1990, 2019);
        let second = catalog.filter_by_genre_and_year("pop", 1990, 2019);
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_records_keeps_catalog_order() {
        let catalog = create_test_catalog();
        let uris: Vec<&str> = catalog
            .all_records()
            .iter()
            .map(|s| s.uri.as_str())
            .collect();
        assert_eq!(uris, vec!["a", "b", "c", "b"]);
    }

    #[test]
    fn test_find_by_uri_returns_first_row() {
        let catalog = create_test_catalog();
        let found = catalog.find_by_uri("b").unwrap();
        assert_eq!(found.genre, "rock");
        assert!(catalog.find_by_uri("missing").is_none());
    }

    #[test]
    fn test_by_artist_and_playlist() {
        let catalog = create_test_catalog();
        assert_eq!(catalog.by_artist("Artist b").len(), 2);
        assert!(catalog.by_artist("artist b").is_empty());
        assert_eq!(catalog.by_playlist("Today's Top Hits").len(), 4);
    }
}
