use std::path::PathBuf;

use chrono::NaiveDate;

use crate::{photos::DEFAULT_PREVIEW_CAPACITY, schedule::TripAnchors};

/// Server configuration loaded from environment variables.
///
/// | Env Var            | Default               |
/// |--------------------|-----------------------|
/// | `DATABASE_URL`     | `sqlite://trip.db`    |
/// | `HOST`             | `0.0.0.0`             |
/// | `PORT`             | `3000`                |
/// | `PHOTO_DIR`        | unset (no uploads)    |
/// | `PUBLIC_BASE_URL`  | empty (relative URLs) |
/// | `PHOTO_LIST_LIMIT` | `100`                 |
/// | `PREVIEW_LIMIT`    | `50`                  |
/// | `TRIP_START`       | `2025-08-30`          |
/// | `TRIP_END`         | `2025-09-07`          |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub photo_dir: Option<PathBuf>,
    pub public_base_url: String,
    pub photo_list_limit: usize,
    /// Fallback previews kept in memory before the oldest is dropped.
    pub preview_limit: usize,
    pub anchors: TripAnchors,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://trip.db".into());
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let photo_dir = std::env::var("PHOTO_DIR")
            .ok()
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from);
        let public_base_url = std::env::var("PUBLIC_BASE_URL").unwrap_or_default();
        let photo_list_limit: usize = std::env::var("PHOTO_LIST_LIMIT")
            .unwrap_or_else(|_| "100".into())
            .parse()
            .expect("PHOTO_LIST_LIMIT must be a valid usize");
        let preview_limit: usize = std::env::var("PREVIEW_LIMIT")
            .map(|v| v.parse().expect("PREVIEW_LIMIT must be a valid usize"))
            .unwrap_or(DEFAULT_PREVIEW_CAPACITY);

        let mut anchors = TripAnchors::default();
        if let Some(start) = date_var("TRIP_START") {
            anchors.start = start;
        }
        if let Some(end) = date_var("TRIP_END") {
            anchors.end = end;
        }
        assert!(
            anchors.start <= anchors.end,
            "TRIP_START must not be after TRIP_END"
        );

        Self {
            database_url,
            host,
            port,
            photo_dir,
            public_base_url,
            photo_list_limit,
            preview_limit,
            anchors,
        }
    }
}

fn date_var(name: &str) -> Option<NaiveDate> {
    std::env::var(name).ok().map(|v| {
        v.trim()
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a YYYY-MM-DD date"))
    })
}
