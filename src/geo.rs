use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct Airport {
    pub icao: String,
    pub iata: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

pub fn load_airports() -> Vec<Airport> {
    serde_json::from_str(include_str!("airports.json")).expect("Failed to parse airports.json")
}

/// Gazetteer keyed by both ICAO and IATA codes, built once at startup.
pub fn airport_index() -> HashMap<String, Airport> {
    let mut index = HashMap::new();
    for airport in load_airports() {
        index.insert(airport.iata.clone(), airport.clone());
        index.insert(airport.icao.clone(), airport);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airport_loading() {
        let airports = load_airports();
        assert!(!airports.is_empty(), "Airports list should not be empty");

        // specific checks
        let heathrow = airports
            .iter()
            .find(|a| a.icao == "EGLL")
            .expect("Heathrow missing");
        assert_eq!(heathrow.iata, "LHR");
        assert!(heathrow.name.contains("Heathrow"));

        let sydney = airports
            .iter()
            .find(|a| a.icao == "YSSY")
            .expect("Sydney missing");
        assert!(sydney.lat < 0.0);

        for airport in &airports {
            assert!((-90.0..=90.0).contains(&airport.lat), "{}", airport.icao);
            assert!((-180.0..=180.0).contains(&airport.lon), "{}", airport.icao);
        }
    }

    #[test]
    fn test_index_resolves_both_code_forms() {
        let index = airport_index();
        let by_icao = index.get("EGLL").expect("EGLL missing");
        let by_iata = index.get("LHR").expect("LHR missing");
        assert_eq!(by_icao.name, by_iata.name);
        assert!(index.get("ZZZZ").is_none());
    }
}
