use std::{io::Read, path::Path};

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use super::CatalogStore;
use crate::models::{AudioFeatures, Genre, SongRecord, FEATURE_COUNT};

/// Errors raised while building the catalog
///
/// A malformed catalog is fatal: rows are never imputed.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid release date {release_date:?} for track {uri}")]
    InvalidReleaseDate { uri: String, release_date: String },

    #[error("Non-finite audio features for track {uri}: {features:?}")]
    InvalidFeatures { uri: String, features: [f64; FEATURE_COUNT] },
}

/// One track as exported to `songs.csv`; other columns are ignored
#[derive(Debug, Deserialize)]
struct TrackRow {
    uri: String,
    name: String,
    artists_name: String,
    /// List literal, e.g. `['dance pop', 'pop']`
    genres: String,
    playlist: String,
    release_date: String,
    acousticness: f64,
    danceability: f64,
    energy: f64,
    instrumentalness: f64,
    valence: f64,
    tempo: f64,
    popularity: u32,
    duration_ms: u64,
    #[serde(default)]
    lyrics: String,
}

/// Loads the catalog from a `songs.csv` export
pub fn load_catalog(path: impl AsRef<Path>) -> Result<CatalogStore, CatalogError> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "Loading song catalog");
    let reader = csv::Reader::from_path(path)?;
    read_tracks(reader)
}

/// Loads the catalog from any CSV source with a header row
pub fn load_from_reader<R: Read>(source: R) -> Result<CatalogStore, CatalogError> {
    read_tracks(csv::Reader::from_reader(source))
}

fn read_tracks<R: Read>(mut reader: csv::Reader<R>) -> Result<CatalogStore, CatalogError> {
    let mut records = Vec::new();
    let mut tracks = 0usize;
    let mut skipped = 0usize;

    for row in reader.deserialize::<TrackRow>() {
        let row = row?;
        tracks += 1;

        let exploded = explode(row)?;
        if exploded.is_empty() {
            skipped += 1;
        }
        records.extend(exploded);
    }

    tracing::info!(
        tracks,
        rows = records.len(),
        skipped,
        "Song catalog loaded"
    );

    Ok(CatalogStore::new(records))
}

/// Turns a track into one row per supported genre
fn explode(row: TrackRow) -> Result<Vec<SongRecord>, CatalogError> {
    let mut genres: Vec<Genre> = Vec::new();
    for raw in parse_genre_list(&row.genres) {
        if let Ok(genre) = raw.parse::<Genre>() {
            if !genres.contains(&genre) {
                genres.push(genre);
            }
        }
    }

    if genres.is_empty() {
        tracing::debug!(uri = %row.uri, genres = %row.genres, "Track has no supported genre");
        return Ok(Vec::new());
    }

    let release_year =
        release_year(&row.release_date).ok_or_else(|| CatalogError::InvalidReleaseDate {
            uri: row.uri.clone(),
            release_date: row.release_date.clone(),
        })?;

    let features = AudioFeatures {
        acousticness: row.acousticness,
        danceability: row.danceability,
        energy: row.energy,
        instrumentalness: row.instrumentalness,
        valence: row.valence,
        tempo: row.tempo,
    };
    if !features.to_array().iter().all(|v| v.is_finite()) {
        return Err(CatalogError::InvalidFeatures {
            uri: row.uri,
            features: features.to_array(),
        });
    }

    Ok(genres
        .into_iter()
        .map(|genre| SongRecord {
            uri: row.uri.clone(),
            name: row.name.clone(),
            artists_name: row.artists_name.clone(),
            genre: genre.catalog_key().to_string(),
            playlist: row.playlist.clone(),
            release_date: row.release_date.clone(),
            release_year,
            features,
            popularity: row.popularity,
            duration_ms: row.duration_ms,
            lyrics: row.lyrics.clone(),
        })
        .collect())
}

/// Splits a list literal like `['pop', "r&b"]` into its items
fn parse_genre_list(raw: &str) -> Vec<String> {
    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|item| item.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Year of a release date given at day, month or year precision
pub fn release_year(release_date: &str) -> Option<i32> {
    let date = release_date.trim();
    [
        date.to_string(),
        format!("{}-01", date),
        format!("{}-01-01", date),
    ]
    .iter()
    .find_map(|candidate| NaiveDate::parse_from_str(candidate, "%Y-%m-%d").ok())
    .map(|parsed| parsed.year())
}
