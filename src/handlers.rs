use crate::errors::AppError;
use crate::models::{
    AirportPoint, Dataset, FlightQuery, FlightRow, IngestResponse, RouteGeo, RouteGeoResponse,
    StatsResponse, SummaryResponse, UnresolvedRoute,
};
use crate::state::AppState;
use crate::stats::{build_stats, build_summary, filter_flights, FlightFilter};
use crate::ui::render_index;
use crate::{geo, ingest};
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use tracing::info;

const DEFAULT_TABLE_ROWS: usize = 100;
const MAX_TABLE_ROWS: usize = 500;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let dataset = state.dataset.lock().await;
    Html(render_index(&build_summary(&dataset)))
}

/// Replaces the dataset with the parsed body. The whole CSV is rejected only
/// when it yields no valid rows; per-row failures are skipped and reported.
pub async fn ingest_flights(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<IngestResponse>, AppError> {
    let parsed = ingest::parse_csv(&body)?;
    info!(
        "ingested {} flights ({} rows skipped)",
        parsed.flights.len(),
        parsed.skipped
    );

    let mut dataset = state.dataset.lock().await;
    *dataset = Dataset {
        flights: parsed.flights,
        skipped: parsed.skipped,
        source: "upload".to_string(),
    };

    Ok(Json(IngestResponse {
        rows: dataset.flights.len(),
        skipped: dataset.skipped,
        source: dataset.source.clone(),
    }))
}

pub async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, AppError> {
    let dataset = state.dataset.lock().await;
    Ok(Json(build_summary(&dataset)))
}

/// The aggregation re-runs over the filtered subset on every request; the
/// dataset itself is never mutated by a filter change.
pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<FlightQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    let filter = FlightFilter::from_query(&query)?;
    let dataset = state.dataset.lock().await;
    let subset = filter_flights(&dataset.flights, &filter);
    Ok(Json(build_stats(&subset)))
}

pub async fn list_flights(
    State(state): State<AppState>,
    Query(query): Query<FlightQuery>,
) -> Result<Json<Vec<FlightRow>>, AppError> {
    let filter = FlightFilter::from_query(&query)?;
    let limit = query.limit.unwrap_or(DEFAULT_TABLE_ROWS).min(MAX_TABLE_ROWS);

    let dataset = state.dataset.lock().await;
    let mut subset = filter_flights(&dataset.flights, &filter);
    subset.sort_by(|a, b| b.landed_at.cmp(&a.landed_at));

    let rows = subset
        .iter()
        .take(limit)
        .map(|record| FlightRow::from_record(record))
        .collect();
    Ok(Json(rows))
}

/// Joins the top routes against the gazetteer for the map view. Routes with
/// an endpoint the gazetteer does not know are listed but carry no path.
pub async fn get_route_geo(
    State(state): State<AppState>,
    Query(query): Query<FlightQuery>,
) -> Result<Json<RouteGeoResponse>, AppError> {
    let filter = FlightFilter::from_query(&query)?;
    let dataset = state.dataset.lock().await;
    let subset = filter_flights(&dataset.flights, &filter);
    let stats = build_stats(&subset);

    let mut routes = Vec::new();
    let mut unresolved = Vec::new();
    for route in &stats.top_routes {
        match (
            state.airports.get(&route.origin),
            state.airports.get(&route.destination),
        ) {
            (Some(origin), Some(destination)) => routes.push(RouteGeo {
                origin: airport_point(&route.origin, origin),
                destination: airport_point(&route.destination, destination),
                count: route.count,
            }),
            _ => unresolved.push(UnresolvedRoute {
                origin: route.origin.clone(),
                destination: route.destination.clone(),
                count: route.count,
            }),
        }
    }

    Ok(Json(RouteGeoResponse { routes, unresolved }))
}

fn airport_point(code: &str, airport: &geo::Airport) -> AirportPoint {
    AirportPoint {
        code: code.to_string(),
        name: airport.name.clone(),
        lat: airport.lat,
        lon: airport.lon,
    }
}
