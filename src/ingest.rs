use crate::errors::AppError;
use crate::models::FlightRecord;
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

/// Outcome of parsing one CSV document: the valid rows plus how many were
/// dropped along the way.
#[derive(Debug, Default)]
pub struct ParsedCsv {
    pub flights: Vec<FlightRecord>,
    pub skipped: u64,
}

#[derive(Debug, Default)]
struct Columns {
    landed_at: Option<usize>,
    departed_at: Option<usize>,
    aircraft_id: Option<usize>,
    origin: Option<usize>,
    destination: Option<usize>,
    callsign: Option<usize>,
    registration: Option<usize>,
}

impl Columns {
    fn from_header(header: &csv::StringRecord) -> Self {
        let mut columns = Self::default();
        for (i, field) in header.iter().enumerate() {
            let name = field.trim().to_ascii_lowercase();
            let slot = match name.as_str() {
                "landed_at" | "landing_time" | "arrival_time" | "timestamp" | "time" => {
                    &mut columns.landed_at
                }
                "departed_at" | "takeoff_time" | "departure_time" => &mut columns.departed_at,
                "aircraft_id" | "aircraft" | "hex" | "icao24" => &mut columns.aircraft_id,
                "origin" | "origin_code" | "from" | "departure_airport" => &mut columns.origin,
                "destination" | "destination_code" | "to" | "arrival_airport" => {
                    &mut columns.destination
                }
                "callsign" | "flight" => &mut columns.callsign,
                "registration" | "reg" | "tail_number" => &mut columns.registration,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(i);
            }
        }
        columns
    }

    fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.landed_at.is_none() {
            missing.push("landing timestamp");
        }
        if self.aircraft_id.is_none() {
            missing.push("aircraft id");
        }
        if self.origin.is_none() {
            missing.push("origin");
        }
        if self.destination.is_none() {
            missing.push("destination");
        }
        missing
    }
}

/// Parses a flight-event CSV. The first record must be a header naming at
/// least the landing timestamp, aircraft id, origin, and destination columns;
/// extra columns are ignored. Rows with a missing or unparseable required
/// field are skipped and counted. A document that yields no valid rows at all
/// is rejected so the caller can surface one error string to the user.
pub fn parse_csv(input: &str) -> Result<ParsedCsv, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(input.as_bytes());

    let mut records = reader.records();
    let header = loop {
        match records.next() {
            Some(Ok(record)) if record.iter().all(|field| field.trim().is_empty()) => continue,
            Some(Ok(record)) => break record,
            Some(Err(err)) => return Err(AppError::bad_request(format!("unreadable CSV: {err}"))),
            None => return Err(AppError::bad_request("CSV is empty")),
        }
    };

    let columns = Columns::from_header(&header);
    let missing = columns.missing();
    if !missing.is_empty() {
        return Err(AppError::bad_request(format!(
            "CSV header is missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut parsed = ParsedCsv::default();
    for (row, record) in records.enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                debug!("skipping row {}: {err}", row + 2);
                parsed.skipped += 1;
                continue;
            }
        };
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        match parse_row(&columns, &record) {
            Some(flight) => parsed.flights.push(flight),
            None => parsed.skipped += 1,
        }
    }

    if parsed.flights.is_empty() {
        return Err(AppError::bad_request(format!(
            "no valid flight rows found ({} malformed rows skipped)",
            parsed.skipped
        )));
    }

    Ok(parsed)
}

fn parse_row(columns: &Columns, record: &csv::StringRecord) -> Option<FlightRecord> {
    let field = |index: Option<usize>| {
        index
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    let landed_at = parse_timestamp(field(columns.landed_at)?)?;
    let aircraft_id = field(columns.aircraft_id)?.to_string();
    let origin = parse_airport_code(field(columns.origin)?)?;
    let destination = parse_airport_code(field(columns.destination)?)?;

    // Optional fields never fail a row; an unparseable departure is dropped.
    let departed_at = field(columns.departed_at).and_then(parse_timestamp);
    let callsign = field(columns.callsign).map(|value| value.to_uppercase());
    let registration = field(columns.registration).map(|value| value.to_uppercase());

    Some(FlightRecord {
        landed_at,
        departed_at,
        aircraft_id,
        origin,
        destination,
        callsign,
        registration,
    })
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// IATA (3) or ICAO (4) style codes, uppercased.
fn parse_airport_code(value: &str) -> Option<String> {
    let code = value.to_uppercase();
    if (3..=4).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(code)
    } else {
        None
    }
}
