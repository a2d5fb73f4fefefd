use rand::{seq::index, Rng};
use serde::Serialize;

use crate::{catalog::CatalogStore, models::SongRecord, services::neighbors};

/// How many neighbors the audio-similar search inspects
pub const SIMILAR_SEARCH_DEPTH: usize = 50;
/// Only the first unique songs of the search are eligible for sampling
pub const SIMILAR_SAMPLE_POOL: usize = 10;
/// How many audio-similar songs are suggested
pub const SIMILAR_SAMPLE_SIZE: usize = 3;
/// Cap for same-artist and same-playlist suggestions
pub const RELATED_LIMIT: usize = 3;

/// Secondary suggestions shown under one recommended song
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedSongs {
    /// "<name> by <artist>" entries with similar musicality
    pub similar: Vec<String>,
    pub same_artist: Vec<String>,
    pub playlist: String,
    pub same_playlist: Vec<String>,
}

/// Finds songs related to a recommendation by sound, artist and playlist
pub struct RelatedSongsResolver<'a> {
    catalog: &'a CatalogStore,
}

impl<'a> RelatedSongsResolver<'a> {
    pub fn new(catalog: &'a CatalogStore) -> Self {
        Self { catalog }
    }

    /// All three suggestion sets for `song`
    pub fn resolve<R: Rng + ?Sized>(&self, song: &SongRecord, rng: &mut R) -> RelatedSongs {
        RelatedSongs {
            similar: self.audio_similar(song, rng),
            same_artist: self.same_artist(song),
            playlist: song.playlist.clone(),
            same_playlist: self.same_playlist(song),
        }
    }

    /// A random few of the songs that sound closest to `song`
    ///
    /// Searches the whole catalog's popularity-capped pool, keeps the first
    /// unique (name, artist) pairs in ranked order and samples from the
    /// closest [`SIMILAR_SAMPLE_POOL`] of them.
    pub fn audio_similar<R: Rng + ?Sized>(
        &self,
        song: &SongRecord,
        rng: &mut R,
    ) -> Vec<String> {
        let all = self.catalog.all_records();
        let ranked = neighbors::rank(&all, &song.features, SIMILAR_SEARCH_DEPTH);

        let mut unique: Vec<(&str, &str)> = Vec::new();
        for neighbor in &ranked {
            let pair = (
                neighbor.song.name.as_str(),
                neighbor.song.artists_name.as_str(),
            );
            if !unique.contains(&pair) {
                unique.push(pair);
            }
        }
        unique.truncate(SIMILAR_SAMPLE_POOL);

        let amount = SIMILAR_SAMPLE_SIZE.min(unique.len());
        index::sample(rng, unique.len(), amount)
            .into_iter()
            .map(|i| {
                let (name, artist) = unique[i];
                format!("{} by {}", name, artist)
            })
            .collect()
    }

    /// Most popular songs by the same artist, `song` itself included
    pub fn same_artist(&self, song: &SongRecord) -> Vec<String> {
        most_popular_names(self.catalog.by_artist(&song.artists_name))
    }

    /// Most popular songs saved in the same playlist
    pub fn same_playlist(&self, song: &SongRecord) -> Vec<String> {
        most_popular_names(self.catalog.by_playlist(&song.playlist))
    }
}

/// Distinct names by descending popularity, capped to [`RELATED_LIMIT`]
///
/// Equal popularity keeps catalog order; the first occurrence of a name wins.
fn most_popular_names(mut songs: Vec<&SongRecord>) -> Vec<String> {
    songs.sort_by(|a, b| b.popularity.cmp(&a.popularity));

    let mut names: Vec<String> = Vec::new();
    for song in songs {
        if names.len() == RELATED_LIMIT {
            break;
        }
        if !names.contains(&song.name) {
            names.push(song.name.clone());
        }
    }
    names
}
