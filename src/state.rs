use crate::geo::Airport;
use crate::models::Dataset;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Mutex<Dataset>>,
    pub airports: Arc<HashMap<String, Airport>>,
}

impl AppState {
    pub fn new(dataset: Dataset, airports: HashMap<String, Airport>) -> Self {
        Self {
            dataset: Arc::new(Mutex::new(dataset)),
            airports: Arc::new(airports),
        }
    }
}
