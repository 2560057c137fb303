use crate::errors::AppError;
use crate::models::{
    AirportEntry, ArrivalsEntry, CountEntry, DailyActivityPoint, Dataset, FlightQuery,
    FlightRecord, IdentifierStats, RouteEntry, StatsResponse, SummaryResponse,
};
use chrono::{Datelike, Duration, NaiveDate, Timelike};
use std::collections::{BTreeMap, HashMap, HashSet};

pub const TOP_AIRPORTS: usize = 20;
pub const TOP_ROUTES: usize = 20;
const TOP_IDENTIFIERS: usize = 5;

/// User-selected subset of the dataset. All bounds are inclusive and apply to
/// the landing timestamp's UTC calendar date.
#[derive(Debug, Clone, Default)]
pub struct FlightFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub destination: Option<String>,
    pub origin: Option<String>,
}

impl FlightFilter {
    pub fn from_query(query: &FlightQuery) -> Result<Self, AppError> {
        let from = parse_date(query.from.as_deref(), "from")?;
        let to = parse_date(query.to.as_deref(), "to")?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::bad_request("'from' must not be after 'to'"));
            }
        }

        Ok(Self {
            from,
            to,
            destination: parse_code(query.dest.as_deref()),
            origin: parse_code(query.origin.as_deref()),
        })
    }

    pub fn matches(&self, flight: &FlightRecord) -> bool {
        let day = flight.landed_at.date_naive();
        if self.from.is_some_and(|from| day < from) {
            return false;
        }
        if self.to.is_some_and(|to| day > to) {
            return false;
        }
        if let Some(destination) = &self.destination {
            if flight.destination != *destination {
                return false;
            }
        }
        if let Some(origin) = &self.origin {
            if flight.origin != *origin {
                return false;
            }
        }
        true
    }
}

fn parse_date(value: Option<&str>, name: &str) -> Result<Option<NaiveDate>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                AppError::bad_request(format!("invalid '{name}' date {value:?}, expected YYYY-MM-DD"))
            }),
    }
}

fn parse_code(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_uppercase)
}

pub fn filter_flights<'a>(
    flights: &'a [FlightRecord],
    filter: &FlightFilter,
) -> Vec<&'a FlightRecord> {
    flights.iter().filter(|f| filter.matches(f)).collect()
}

/// Frequency tally that remembers first-encounter order, so a stable sort by
/// count leaves ties in the order their keys first appeared.
#[derive(Debug, Default)]
struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl Tally {
    fn bump(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn sorted(&self) -> Vec<CountEntry> {
        let mut entries: Vec<CountEntry> = self
            .entries
            .iter()
            .map(|(value, count)| CountEntry {
                value: value.clone(),
                count: *count,
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries
    }
}

#[derive(Debug, Default)]
struct Buckets {
    day_of_week: [u64; 7],
    hour_of_day: [u64; 24],
}

impl Buckets {
    fn bump(&mut self, dow: usize, hour: usize) {
        self.day_of_week[dow] += 1;
        self.hour_of_day[hour] += 1;
    }
}

#[derive(Debug)]
struct AirportAgg {
    code: String,
    count: u64,
    buckets: Buckets,
    origins: Tally,
}

#[derive(Debug)]
struct RouteAgg {
    origin: String,
    destination: String,
    count: u64,
    buckets: Buckets,
}

#[derive(Debug, Default)]
struct DayAgg {
    landings: u64,
    aircraft: HashSet<String>,
}

/// Single pass over the (already filtered) records, producing every derived
/// index the dashboard consumes. Top lists are truncated for reporting only;
/// the arrivals-from table keeps every destination's full count.
pub fn build_stats(flights: &[&FlightRecord]) -> StatsResponse {
    let mut overall = Buckets::default();

    let mut airport_index: HashMap<String, usize> = HashMap::new();
    let mut airports: Vec<AirportAgg> = Vec::new();
    let mut route_index: HashMap<(String, String), usize> = HashMap::new();
    let mut routes: Vec<RouteAgg> = Vec::new();
    let mut days: BTreeMap<NaiveDate, DayAgg> = BTreeMap::new();

    let mut aircraft = Tally::default();
    let mut callsigns = Tally::default();
    let mut registrations = Tally::default();

    for flight in flights {
        let dow = flight.landed_at.weekday().num_days_from_monday() as usize;
        let hour = flight.landed_at.hour() as usize;
        overall.bump(dow, hour);

        let slot = *airport_index
            .entry(flight.destination.clone())
            .or_insert_with(|| {
                airports.push(AirportAgg {
                    code: flight.destination.clone(),
                    count: 0,
                    buckets: Buckets::default(),
                    origins: Tally::default(),
                });
                airports.len() - 1
            });
        let airport = &mut airports[slot];
        airport.count += 1;
        airport.buckets.bump(dow, hour);
        airport.origins.bump(&flight.origin);

        let slot = *route_index
            .entry((flight.origin.clone(), flight.destination.clone()))
            .or_insert_with(|| {
                routes.push(RouteAgg {
                    origin: flight.origin.clone(),
                    destination: flight.destination.clone(),
                    count: 0,
                    buckets: Buckets::default(),
                });
                routes.len() - 1
            });
        let route = &mut routes[slot];
        route.count += 1;
        route.buckets.bump(dow, hour);

        let day = days.entry(flight.landed_at.date_naive()).or_default();
        day.landings += 1;
        day.aircraft.insert(flight.aircraft_id.clone());

        aircraft.bump(&flight.aircraft_id);
        if let Some(callsign) = &flight.callsign {
            callsigns.bump(callsign);
        }
        if let Some(registration) = &flight.registration {
            registrations.bump(registration);
        }
    }

    airports.sort_by(|a, b| b.count.cmp(&a.count));
    routes.sort_by(|a, b| b.count.cmp(&a.count));

    let top_airports = airports
        .iter()
        .take(TOP_AIRPORTS)
        .map(|a| AirportEntry {
            code: a.code.clone(),
            count: a.count,
            day_of_week: a.buckets.day_of_week,
            hour_of_day: a.buckets.hour_of_day,
        })
        .collect();

    let top_routes = routes
        .iter()
        .take(TOP_ROUTES)
        .map(|r| RouteEntry {
            origin: r.origin.clone(),
            destination: r.destination.clone(),
            count: r.count,
            day_of_week: r.buckets.day_of_week,
            hour_of_day: r.buckets.hour_of_day,
        })
        .collect();

    let arrivals_from = airports
        .iter()
        .map(|a| ArrivalsEntry {
            destination: a.code.clone(),
            count: a.count,
            origins: a.origins.sorted(),
        })
        .collect();

    StatsResponse {
        flights: flights.len(),
        top_airports,
        top_routes,
        day_of_week: overall.day_of_week,
        hour_of_day: overall.hour_of_day,
        daily: daily_series(&days),
        arrivals_from,
        aircraft: identifier_stats(&aircraft),
        callsigns: identifier_stats(&callsigns),
        registrations: identifier_stats(&registrations),
    }
}

/// One point per calendar day between the earliest and latest landing,
/// inclusive. Days with no activity stay in the series at zero.
fn daily_series(days: &BTreeMap<NaiveDate, DayAgg>) -> Vec<DailyActivityPoint> {
    let (Some(first), Some(last)) = (days.keys().next(), days.keys().next_back()) else {
        return Vec::new();
    };

    let mut series = Vec::new();
    let mut day = *first;
    while day <= *last {
        let agg = days.get(&day);
        series.push(DailyActivityPoint {
            date: day.to_string(),
            unique_aircraft: agg.map_or(0, |a| a.aircraft.len() as u64),
            landings: agg.map_or(0, |a| a.landings),
        });
        day += Duration::days(1);
    }
    series
}

fn identifier_stats(tally: &Tally) -> IdentifierStats {
    let all = tally.sorted();
    let top = all.iter().take(TOP_IDENTIFIERS).cloned().collect();
    IdentifierStats {
        unique: tally.len(),
        top,
        all,
    }
}

pub fn build_summary(dataset: &Dataset) -> SummaryResponse {
    let mut aircraft = HashSet::new();
    let mut airports = HashSet::new();
    let mut first: Option<NaiveDate> = None;
    let mut last: Option<NaiveDate> = None;

    for flight in &dataset.flights {
        aircraft.insert(flight.aircraft_id.as_str());
        airports.insert(flight.origin.as_str());
        airports.insert(flight.destination.as_str());
        let day = flight.landed_at.date_naive();
        first = Some(first.map_or(day, |d| d.min(day)));
        last = Some(last.map_or(day, |d| d.max(day)));
    }

    SummaryResponse {
        flights: dataset.flights.len(),
        skipped: dataset.skipped,
        unique_aircraft: aircraft.len(),
        airports: airports.len(),
        first_day: first.map(|d| d.to_string()),
        last_day: last.map(|d| d.to_string()),
        source: dataset.source.clone(),
    }
}
