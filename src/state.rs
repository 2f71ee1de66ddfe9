use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error::TripError,
    itinerary::Itinerary,
    models::{FlightRecord, LodgingRecords, ScheduleEntry},
    photos::{self, PhotoBucket, PreviewCache},
    schedule::TripAnchors,
};

/// Last known persisted trip data.
///
/// Each reducer takes the prior state plus the outcome of a confirmed write
/// and returns the next state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripState {
    pub schedule: Vec<ScheduleEntry>,
    pub flights: Vec<FlightRecord>,
    pub photos: Vec<String>,
}

impl TripState {
    pub fn with_schedule_added(mut self, entry: ScheduleEntry) -> Self {
        self.schedule.push(entry);
        self
    }

    pub fn with_schedule_replaced(mut self, entry: ScheduleEntry) -> Self {
        if let Some(slot) = self.schedule.iter_mut().find(|s| s.id == entry.id) {
            *slot = entry;
        }
        self
    }

    pub fn with_schedule_removed(mut self, id: &str) -> Self {
        self.schedule.retain(|s| s.id != id);
        self
    }

    pub fn with_flight_added(mut self, flight: FlightRecord) -> Self {
        self.flights.push(flight);
        self
    }

    pub fn with_flight_replaced(mut self, flight: FlightRecord) -> Self {
        if let Some(slot) = self.flights.iter_mut().find(|f| f.id == flight.id) {
            *slot = flight;
        }
        self
    }

    pub fn with_flight_removed(mut self, id: &str) -> Self {
        self.flights.retain(|f| f.id != id);
        self
    }

    pub fn with_photos_appended(mut self, urls: Vec<String>) -> Self {
        self.photos.extend(urls);
        self
    }
}

#[derive(Clone)]
pub struct AppState {
    /// The single owner of the cached trip data.
    pub itinerary: Arc<Mutex<Itinerary>>,
    /// `None` when no photo directory is configured.
    pub bucket: Option<Arc<PhotoBucket>>,
    pub previews: Arc<PreviewCache>,
    pub anchors: Arc<TripAnchors>,
    pub lodging: Arc<LodgingRecords>,
}

impl AppState {
    /// Loads the itinerary and the photo listing into a fresh cache.
    pub async fn load(config: &Config, pool: SqlitePool) -> Result<Self, TripError> {
        let anchors = Arc::new(config.anchors.clone());
        let bucket = config.photo_dir.as_ref().map(|dir| {
            Arc::new(PhotoBucket::new(
                dir,
                &config.public_base_url,
                config.photo_list_limit,
            ))
        });

        let mut itinerary = Itinerary::load(pool, anchors.clone()).await?;
        itinerary.set_photos(photos::list_or_empty(bucket.as_deref()).await);

        Ok(Self {
            itinerary: Arc::new(Mutex::new(itinerary)),
            bucket,
            previews: Arc::new(PreviewCache::new(config.preview_limit)),
            anchors,
            lodging: Arc::new(LodgingRecords::default()),
        })
    }
}
