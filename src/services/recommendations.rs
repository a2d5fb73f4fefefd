use crate::{
    catalog::CatalogStore,
    models::Query,
    services::{
        neighbors::{self, Neighbor, CANDIDATE_POOL_LIMIT},
        session::{Advance, RecommendationSession},
    },
};

/// What the user asked for on this evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// Show the page at the current cursor
    Current,
    /// "Recommend more songs": advance one page first
    More,
}

/// One page of ranked recommendations
#[derive(Debug, Clone)]
pub struct RecommendationPage<'a> {
    pub cursor: usize,
    pub page_size: usize,
    pub total_results: usize,
    /// True once the cursor has moved past the last result
    pub exhausted: bool,
    pub songs: Vec<Neighbor<'a>>,
}

/// Ranks every matching song against the query's feature vector
///
/// Matching rows are capped to the most popular pool and the whole pool is
/// returned in ascending distance order.
pub fn recommend<'a>(catalog: &'a CatalogStore, query: &Query) -> Vec<Neighbor<'a>> {
    let matching =
        catalog.filter_by_genre_and_year(&query.genre, query.start_year, query.end_year);
    let pool_size = matching.len().min(CANDIDATE_POOL_LIMIT);

    let ranked = neighbors::rank(&matching, &query.features, pool_size);

    tracing::info!(
        genre = %query.genre,
        start_year = query.start_year,
        end_year = query.end_year,
        matching = matching.len(),
        ranked = ranked.len(),
        "Recommendations ranked"
    );

    ranked
}

/// Evaluates `query` for a session and returns the page it should display
///
/// The ranking is recomputed on every call. A changed query resets the
/// session before any advance is applied.
pub fn evaluate<'a>(
    catalog: &'a CatalogStore,
    session: &mut RecommendationSession,
    query: &Query,
    request: PageRequest,
) -> RecommendationPage<'a> {
    let ranked = recommend(catalog, query);
    session.observe(query);

    if request == PageRequest::More {
        if let Advance::Exhausted = session.advance(ranked.len()) {
            tracing::info!(
                cursor = session.cursor(),
                total = ranked.len(),
                "No songs left to recommend"
            );
        }
    }

    RecommendationPage {
        cursor: session.cursor(),
        page_size: session.page_size(),
        total_results: ranked.len(),
        exhausted: session.is_exhausted(ranked.len()),
        songs: session.current_page(&ranked).to_vec(),
    }
}
