use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One parsed flight event. `landed_at` drives every aggregation; the
/// departure timestamp is carried through to the detail table only.
#[derive(Debug, Clone)]
pub struct FlightRecord {
    pub landed_at: DateTime<Utc>,
    pub departed_at: Option<DateTime<Utc>>,
    pub aircraft_id: String,
    pub origin: String,
    pub destination: String,
    pub callsign: Option<String>,
    pub registration: Option<String>,
}

/// The in-memory dataset behind every endpoint. Replaced wholesale on upload.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub flights: Vec<FlightRecord>,
    pub skipped: u64,
    pub source: String,
}

#[derive(Debug, Deserialize)]
pub struct FlightQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub dest: Option<String>,
    pub origin: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub rows: usize,
    pub skipped: u64,
    pub source: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub flights: usize,
    pub skipped: u64,
    pub unique_aircraft: usize,
    pub airports: usize,
    pub first_day: Option<String>,
    pub last_day: Option<String>,
    pub source: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountEntry {
    pub value: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct AirportEntry {
    pub code: String,
    pub count: u64,
    pub day_of_week: [u64; 7],
    pub hour_of_day: [u64; 24],
}

#[derive(Debug, Serialize)]
pub struct RouteEntry {
    pub origin: String,
    pub destination: String,
    pub count: u64,
    pub day_of_week: [u64; 7],
    pub hour_of_day: [u64; 24],
}

#[derive(Debug, Serialize)]
pub struct DailyActivityPoint {
    pub date: String,
    pub unique_aircraft: u64,
    pub landings: u64,
}

#[derive(Debug, Serialize)]
pub struct ArrivalsEntry {
    pub destination: String,
    pub count: u64,
    pub origins: Vec<CountEntry>,
}

#[derive(Debug, Serialize)]
pub struct IdentifierStats {
    pub unique: usize,
    pub top: Vec<CountEntry>,
    pub all: Vec<CountEntry>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub flights: usize,
    pub top_airports: Vec<AirportEntry>,
    pub top_routes: Vec<RouteEntry>,
    pub day_of_week: [u64; 7],
    pub hour_of_day: [u64; 24],
    pub daily: Vec<DailyActivityPoint>,
    pub arrivals_from: Vec<ArrivalsEntry>,
    pub aircraft: IdentifierStats,
    pub callsigns: IdentifierStats,
    pub registrations: IdentifierStats,
}

#[derive(Debug, Serialize)]
pub struct FlightRow {
    pub landed_at: String,
    pub departed_at: Option<String>,
    pub aircraft_id: String,
    pub origin: String,
    pub destination: String,
    pub callsign: Option<String>,
    pub registration: Option<String>,
}

impl FlightRow {
    pub fn from_record(record: &FlightRecord) -> Self {
        Self {
            landed_at: record.landed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            departed_at: record
                .departed_at
                .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
            aircraft_id: record.aircraft_id.clone(),
            origin: record.origin.clone(),
            destination: record.destination.clone(),
            callsign: record.callsign.clone(),
            registration: record.registration.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AirportPoint {
    pub code: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub struct RouteGeo {
    pub origin: AirportPoint,
    pub destination: AirportPoint,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct UnresolvedRoute {
    pub origin: String,
    pub destination: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct RouteGeoResponse {
    pub routes: Vec<RouteGeo>,
    pub unresolved: Vec<UnresolvedRoute>,
}
