use crate::ingest;
use crate::models::Dataset;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info};

/// Optional CSV asset to pre-load at startup. No default: without the env
/// var the server starts with an empty dataset and waits for an upload.
pub fn resolve_dataset_path() -> Option<PathBuf> {
    env::var("FLIGHTDECK_DATASET_PATH").ok().map(PathBuf::from)
}

pub async fn load_dataset(path: Option<&Path>) -> Dataset {
    let Some(path) = path else {
        return Dataset::default();
    };

    let text = match fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) => {
            error!("failed to read dataset file {}: {err}", path.display());
            return Dataset::default();
        }
    };

    match ingest::parse_csv(&text) {
        Ok(parsed) => {
            let source = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            info!(
                "loaded {} flights from {} ({} rows skipped)",
                parsed.flights.len(),
                path.display(),
                parsed.skipped
            );
            Dataset {
                flights: parsed.flights,
                skipped: parsed.skipped,
                source,
            }
        }
        Err(err) => {
            error!("failed to parse dataset file {}: {}", path.display(), err.message);
            Dataset::default()
        }
    }
}
