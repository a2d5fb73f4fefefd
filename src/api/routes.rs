use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::AppState;
use crate::middleware::make_span_with_request_id;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/genres", get(handlers::list_genres))
        // Recommendation sessions
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/:id", delete(handlers::delete_session))
        .route("/sessions/:id/recommendations", post(handlers::current_page))
        .route(
            "/sessions/:id/recommendations/more",
            post(handlers::more_recommendations),
        )
        // Suggestions for a displayed song
        .route("/songs/:uri/related", get(handlers::related_songs))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
