use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{format_duration, AudioFeatures, Genre, Query};
use crate::services::{
    recommendations::{self, PageRequest, RecommendationPage},
    Neighbor, RelatedSongs, RelatedSongsResolver,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub genre: String,
    pub start_year: i32,
    pub end_year: i32,
    pub features: AudioFeatures,
}

impl RecommendationRequest {
    /// Checks the request against the query boundary and builds the query
    fn into_query(self) -> AppResult<Query> {
        let genre = self
            .genre
            .parse::<Genre>()
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;

        if self.start_year > self.end_year {
            return Err(AppError::InvalidInput(format!(
                "start_year {} is after end_year {}",
                self.start_year, self.end_year
            )));
        }

        if self.features.to_array().iter().any(|v| !v.is_finite()) {
            return Err(AppError::InvalidInput(
                "Audio features must be finite numbers".to_string(),
            ));
        }

        Ok(Query::new(
            genre.display_name(),
            self.start_year,
            self.end_year,
            self.features,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SongView {
    pub uri: String,
    pub name: String,
    pub artists_name: String,
    pub genre: String,
    pub playlist: String,
    pub release_date: String,
    pub release_year: i32,
    pub popularity: u32,
    pub duration_ms: u64,
    pub duration: String,
    pub lyrics: String,
    pub features: AudioFeatures,
    pub distance: f64,
}

impl From<&Neighbor<'_>> for SongView {
    fn from(neighbor: &Neighbor<'_>) -> Self {
        let song = neighbor.song;
        Self {
            uri: song.uri.clone(),
            name: song.name.clone(),
            artists_name: song.artists_name.clone(),
            genre: song.genre.clone(),
            playlist: song.playlist.clone(),
            release_date: song.release_date.clone(),
            release_year: song.release_year,
            popularity: song.popularity,
            duration_ms: song.duration_ms,
            duration: format_duration(song.duration_ms),
            lyrics: song.lyrics.clone(),
            features: song.features,
            distance: neighbor.distance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub cursor: usize,
    pub page_size: usize,
    pub total_results: usize,
    pub exhausted: bool,
    pub songs: Vec<SongView>,
}

impl From<RecommendationPage<'_>> for PageResponse {
    fn from(page: RecommendationPage<'_>) -> Self {
        Self {
            cursor: page.cursor,
            page_size: page.page_size,
            total_results: page.total_results,
            exhausted: page.exhausted,
            songs: page.songs.iter().map(SongView::from).collect(),
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Genre vocabulary in picker order
pub async fn list_genres() -> Json<Vec<&'static str>> {
    Json(Genre::ALL.iter().map(Genre::display_name).collect())
}

/// Start a new recommendation session
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let session_id = state.create_session().await;
    (StatusCode::CREATED, Json(SessionResponse { session_id }))
}

/// End a recommendation session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if state.remove_session(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {}", id)))
    }
}

/// Page of recommendations at the session's cursor
pub async fn current_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<PageResponse>> {
    page_for(&state, id, request, PageRequest::Current).await
}

/// Advance one page, then return it
pub async fn more_recommendations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<PageResponse>> {
    page_for(&state, id, request, PageRequest::More).await
}

async fn page_for(
    state: &AppState,
    id: Uuid,
    request: RecommendationRequest,
    page_request: PageRequest,
) -> AppResult<Json<PageResponse>> {
    let query = request.into_query()?;
    let handle = state
        .session(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {}", id)))?;

    let mut session = handle.lock().await;
    let page = recommendations::evaluate(&state.catalog, &mut session, &query, page_request);

    tracing::info!(
        session_id = %id,
        cursor = page.cursor,
        total = page.total_results,
        returned = page.songs.len(),
        "Serving recommendation page"
    );

    Ok(Json(PageResponse::from(page)))
}

/// Similar, same-artist and same-playlist suggestions for one song
pub async fn related_songs(
    State(state): State<AppState>,
    Path(uri): Path<String>,
) -> AppResult<Json<RelatedSongs>> {
    let song = state
        .catalog
        .find_by_uri(&uri)
        .ok_or_else(|| AppError::NotFound(format!("Song {}", uri)))?;

    let resolver = RelatedSongsResolver::new(&state.catalog);
    let mut rng = state.request_rng().await;
    let related = resolver.resolve(song, &mut rng);

    tracing::debug!(
        uri = %uri,
        similar = related.similar.len(),
        same_artist = related.same_artist.len(),
        same_playlist = related.same_playlist.len(),
        "Resolved related songs"
    );

    Ok(Json(related))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(genre: &str, start_year: i32, end_year: i32) -> RecommendationRequest {
        RecommendationRequest {
            genre: genre.to_string(),
            start_year,
            end_year,
            features: AudioFeatures::default(),
        }
    }

    #[test]
    fn test_into_query_canonicalizes_genre() {
        let query = request("korean pop", 1990, 2019).into_query().unwrap();
        assert_eq!(query.genre, "K-pop");
    }

    #[test]
    fn test_into_query_rejects_unknown_genre() {
        let result = request("polka", 1990, 2019).into_query();
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_into_query_rejects_reversed_years() {
        let result = request("Pop", 2019, 1990).into_query();
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_into_query_accepts_single_year() {
        let query = request("Rock", 2005, 2005).into_query().unwrap();
        assert_eq!(query.start_year, query.end_year);
    }
}
