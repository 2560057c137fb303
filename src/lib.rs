pub mod app;
pub mod errors;
pub mod geo;
pub mod handlers;
pub mod ingest;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use state::AppState;
pub use storage::{load_dataset, resolve_dataset_path};
