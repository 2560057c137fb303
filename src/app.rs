use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/flights", post(handlers::ingest_flights).get(handlers::list_flights))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/routes/geo", get(handlers::get_route_geo))
        .with_state(state)
}
