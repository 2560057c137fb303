use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

const SAMPLE_CSV: &str = "\
landing_time,takeoff_time,aircraft_id,origin,destination,callsign,registration
2026-03-02T08:10:00Z,2026-03-02T06:55:00Z,abc123,EGLL,LFPG,BAW334,G-EUYO
2026-03-02T09:20:00Z,,def456,KJFK,LFPG,,N123AB
2026-03-03T11:05:00Z,2026-03-03T09:40:00Z,abc123,LFPG,EGLL,BAW335,G-EUYO
2026-03-05T21:45:00Z,,ghi789,EHAM,EGLL,KLM101,PH-BXA
not-a-timestamp,,bad,EGLL,LFPG,,
";

#[derive(Debug, Deserialize)]
struct IngestResponse {
    rows: usize,
    skipped: u64,
    source: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    flights: usize,
    skipped: u64,
    unique_aircraft: usize,
    airports: usize,
    first_day: Option<String>,
    last_day: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AirportEntry {
    code: String,
    count: u64,
    day_of_week: Vec<u64>,
    hour_of_day: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct RouteEntry {
    origin: String,
    destination: String,
    count: u64,
}

#[derive(Debug, Deserialize)]
struct DailyPoint {
    date: String,
    unique_aircraft: u64,
    landings: u64,
}

#[derive(Debug, Deserialize)]
struct CountEntry {
    value: String,
    count: u64,
}

#[derive(Debug, Deserialize)]
struct ArrivalsEntry {
    destination: String,
    count: u64,
    origins: Vec<CountEntry>,
}

#[derive(Debug, Deserialize)]
struct IdentifierStats {
    unique: usize,
    top: Vec<CountEntry>,
    all: Vec<CountEntry>,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    flights: usize,
    top_airports: Vec<AirportEntry>,
    top_routes: Vec<RouteEntry>,
    day_of_week: Vec<u64>,
    hour_of_day: Vec<u64>,
    daily: Vec<DailyPoint>,
    arrivals_from: Vec<ArrivalsEntry>,
    aircraft: IdentifierStats,
    callsigns: IdentifierStats,
    registrations: IdentifierStats,
}

#[derive(Debug, Deserialize)]
struct RouteGeoResponse {
    routes: Vec<RouteGeo>,
    unresolved: Vec<RouteRef>,
}

#[derive(Debug, Deserialize)]
struct RouteGeo {
    origin: AirportPoint,
    destination: AirportPoint,
    count: u64,
}

#[derive(Debug, Deserialize)]
struct AirportPoint {
    code: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct RouteRef {
    origin: String,
    destination: String,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/summary")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(dataset_path: Option<&str>) -> TestServer {
    let port = pick_free_port();
    let mut command = Command::new(env!("CARGO_BIN_EXE_flightdeck"));
    command
        .env("PORT", port.to_string())
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    if let Some(path) = dataset_path {
        command.env("FLIGHTDECK_DATASET_PATH", path);
    }
    let child = command.spawn().expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server(None).await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn upload_csv(client: &Client, base_url: &str, csv: &str) -> IngestResponse {
    let response = client
        .post(format!("{base_url}/api/flights"))
        .header("content-type", "text/csv")
        .body(csv.to_string())
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

#[tokio::test]
async fn http_ingest_reports_rows_and_skips() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let outcome = upload_csv(&client, &server.base_url, SAMPLE_CSV).await;
    assert_eq!(outcome.rows, 4);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.source, "upload");

    let summary: SummaryResponse = client
        .get(format!("{}/api/summary", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary.flights, 4);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.unique_aircraft, 3);
    assert_eq!(summary.airports, 4);
    assert_eq!(summary.first_day.as_deref(), Some("2026-03-02"));
    assert_eq!(summary.last_day.as_deref(), Some("2026-03-05"));
}

#[tokio::test]
async fn http_stats_satisfy_aggregation_invariants() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    upload_csv(&client, &server.base_url, SAMPLE_CSV).await;

    let stats: StatsResponse = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stats.flights, 4);
    assert_eq!(stats.day_of_week.len(), 7);
    assert_eq!(stats.hour_of_day.len(), 24);
    assert_eq!(stats.day_of_week.iter().sum::<u64>(), 4);
    assert_eq!(stats.hour_of_day.iter().sum::<u64>(), 4);

    // per-destination counts cover every row
    let by_destination: u64 = stats.arrivals_from.iter().map(|a| a.count).sum();
    assert_eq!(by_destination, 4);

    // 2026-03-02 .. 2026-03-05 inclusive, with an idle day in between
    assert_eq!(stats.daily.len(), 4);
    assert_eq!(stats.daily[0].date, "2026-03-02");
    assert_eq!(stats.daily[0].landings, 2);
    assert_eq!(stats.daily[0].unique_aircraft, 2);
    assert_eq!(stats.daily[2].landings, 0);
    assert_eq!(stats.daily[2].unique_aircraft, 0);

    let lfpg = stats
        .top_airports
        .iter()
        .find(|a| a.code == "LFPG")
        .expect("LFPG missing");
    assert_eq!(lfpg.count, 2);
    assert_eq!(lfpg.day_of_week.iter().sum::<u64>(), 2);
    assert_eq!(lfpg.hour_of_day.iter().sum::<u64>(), 2);

    let arrivals = stats
        .arrivals_from
        .iter()
        .find(|a| a.destination == "EGLL")
        .expect("EGLL missing");
    assert_eq!(arrivals.count, 2);
    assert_eq!(arrivals.origins.len(), 2);

    assert_eq!(stats.aircraft.unique, 3);
    assert_eq!(stats.aircraft.top[0].value, "abc123");
    assert_eq!(stats.aircraft.top[0].count, 2);
    assert_eq!(stats.aircraft.all.len(), 3);
    assert_eq!(stats.callsigns.unique, 3);
    assert_eq!(stats.registrations.unique, 3);

    let route = stats
        .top_routes
        .iter()
        .find(|r| r.origin == "EGLL" && r.destination == "LFPG")
        .expect("route missing");
    assert_eq!(route.count, 1);
}

#[tokio::test]
async fn http_stats_filters_narrow_the_subset() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    upload_csv(&client, &server.base_url, SAMPLE_CSV).await;

    let stats: StatsResponse = client
        .get(format!("{}/api/stats?dest=LFPG", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.flights, 2);
    assert_eq!(stats.arrivals_from.len(), 1);
    assert_eq!(stats.arrivals_from[0].destination, "LFPG");

    let stats: StatsResponse = client
        .get(format!(
            "{}/api/stats?from=2026-03-03&to=2026-03-05",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.flights, 2);
    assert_eq!(stats.daily.len(), 3);

    let response = client
        .get(format!("{}/api/stats?from=bogus", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_flight_table_is_filtered_and_newest_first() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    upload_csv(&client, &server.base_url, SAMPLE_CSV).await;

    let rows: Vec<serde_json::Value> = client
        .get(format!("{}/api/flights?dest=EGLL", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["aircraft_id"], "ghi789");
    assert_eq!(rows[1]["aircraft_id"], "abc123");

    let rows: Vec<serde_json::Value> = client
        .get(format!("{}/api/flights?limit=1", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn http_route_geo_joins_the_gazetteer() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let csv = "\
landing_time,aircraft_id,origin,destination
2026-03-02T08:10:00Z,abc123,EGLL,LFPG
2026-03-02T09:10:00Z,def456,EGLL,LFPG
2026-03-02T10:10:00Z,ghi789,XXZZ,LFPG
";
    upload_csv(&client, &server.base_url, csv).await;

    let geo: RouteGeoResponse = client
        .get(format!("{}/api/routes/geo", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(geo.routes.len(), 1);
    let route = &geo.routes[0];
    assert_eq!(route.origin.code, "EGLL");
    assert_eq!(route.destination.code, "LFPG");
    assert_eq!(route.count, 2);
    assert!((route.origin.lat - 51.47).abs() < 0.1);
    assert!((route.destination.lon - 2.55).abs() < 0.1);

    assert_eq!(geo.unresolved.len(), 1);
    assert_eq!(geo.unresolved[0].origin, "XXZZ");
    assert_eq!(geo.unresolved[0].destination, "LFPG");
}

#[tokio::test]
async fn http_rejects_csv_with_no_valid_rows() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/flights", server.base_url))
        .header("content-type", "text/csv")
        .body("this,is,not\na,flight,log\n")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let message = response.text().await.unwrap();
    assert!(message.contains("missing required columns"));
}

#[tokio::test]
async fn http_preloads_dataset_from_env_path() {
    let _guard = TEST_LOCK.lock().await;

    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("flightdeck_http_{}_{}.csv", std::process::id(), nanos));
    std::fs::write(&path, SAMPLE_CSV).unwrap();

    let server = spawn_server(Some(&path.to_string_lossy())).await;
    let client = Client::new();

    let summary: SummaryResponse = client
        .get(format!("{}/api/summary", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary.flights, 4);
    assert_eq!(summary.skipped, 1);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn http_index_serves_the_dashboard() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("<title>Flightdeck</title>"));
    assert!(body.contains("Top airports"));
}
