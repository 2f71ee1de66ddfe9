//! Writes against the trip tables, with the cached [`TripState`] updated
//! only once a write has been confirmed.

use std::sync::Arc;

use nanoid::nanoid;
use sqlx::SqlitePool;

use crate::{
    db,
    error::TripError,
    models::{Area, FlightRecord, NewFlight, NewScheduleEntry, ScheduleEntry},
    schedule::{Entry, TripAnchors, TripView},
    state::TripState,
};

pub struct Itinerary {
    pool: SqlitePool,
    anchors: Arc<TripAnchors>,
    state: TripState,
}

impl Itinerary {
    /// Reads the schedule and flights into a fresh cache.
    pub async fn load(pool: SqlitePool, anchors: Arc<TripAnchors>) -> Result<Self, TripError> {
        let mut itinerary = Self {
            pool,
            anchors,
            state: TripState::default(),
        };
        itinerary.reload().await?;
        Ok(itinerary)
    }

    /// Replaces the cached schedule and flights with what is stored now.
    pub async fn reload(&mut self) -> Result<(), TripError> {
        let schedule = db::get_schedule(&self.pool)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to load schedule"))?;
        let flights = db::get_flights(&self.pool)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to load flights"))?;
        tracing::debug!(
            schedule = schedule.len(),
            flights = flights.len(),
            "itinerary reloaded"
        );
        self.state = TripState {
            schedule,
            flights,
            photos: std::mem::take(&mut self.state.photos),
        };
        Ok(())
    }

    pub fn state(&self) -> &TripState {
        &self.state
    }

    pub fn view(&self, area: Option<Area>) -> TripView {
        TripView::build(&self.state.schedule, &self.state.flights, &self.anchors, area)
    }

    pub async fn add_schedule(&mut self, new: NewScheduleEntry) -> Result<ScheduleEntry, TripError> {
        let entry = new.validate()?.with_id(format!("sch_{}", nanoid!(8)));
        db::insert_schedule(&self.pool, &entry)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to add schedule entry"))?;

        tracing::info!(id = %entry.id, title = %entry.title, "schedule entry added");
        self.apply(|s| s.with_schedule_added(entry.clone()));
        Ok(entry)
    }

    pub async fn update_schedule(
        &mut self,
        id: &str,
        changes: NewScheduleEntry,
    ) -> Result<ScheduleEntry, TripError> {
        self.ensure_editable(id)?;
        let entry = changes.validate()?.with_id(id.to_string());
        let touched = db::update_schedule(&self.pool, &entry)
            .await
            .inspect_err(|e| tracing::error!(error = %e, id, "failed to update schedule entry"))?;
        if touched == 0 {
            return Err(not_found("schedule entry", id));
        }

        tracing::info!(id, "schedule entry updated");
        self.apply(|s| s.with_schedule_replaced(entry.clone()));
        Ok(entry)
    }

    pub async fn delete_schedule(&mut self, id: &str) -> Result<(), TripError> {
        self.ensure_editable(id)?;
        let touched = db::delete_schedule(&self.pool, id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, id, "failed to delete schedule entry"))?;
        if touched == 0 {
            return Err(not_found("schedule entry", id));
        }

        tracing::info!(id, "schedule entry deleted");
        self.apply(|s| s.with_schedule_removed(id));
        Ok(())
    }

    pub async fn add_flight(&mut self, new: NewFlight) -> Result<FlightRecord, TripError> {
        let flight = new.validate()?.with_id(format!("flt_{}", nanoid!(8)));
        db::insert_flight(&self.pool, &flight)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to add flight"))?;

        tracing::info!(id = %flight.id, flight = %flight.flight, "flight added");
        self.apply(|s| s.with_flight_added(flight.clone()));
        Ok(flight)
    }

    pub async fn update_flight(
        &mut self,
        id: &str,
        changes: NewFlight,
    ) -> Result<FlightRecord, TripError> {
        let flight = changes.validate()?.with_id(id.to_string());
        let touched = db::update_flight(&self.pool, &flight)
            .await
            .inspect_err(|e| tracing::error!(error = %e, id, "failed to update flight"))?;
        if touched == 0 {
            return Err(not_found("flight", id));
        }

        tracing::info!(id, "flight updated");
        self.apply(|s| s.with_flight_replaced(flight.clone()));
        Ok(flight)
    }

    pub async fn delete_flight(&mut self, id: &str) -> Result<(), TripError> {
        let touched = db::delete_flight(&self.pool, id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, id, "failed to delete flight"))?;
        if touched == 0 {
            return Err(not_found("flight", id));
        }

        tracing::info!(id, "flight deleted");
        self.apply(|s| s.with_flight_removed(id));
        Ok(())
    }

    /// Photos live in object storage, not in the tables; the caller owns the
    /// upload and hands over the resulting references.
    pub fn append_photos(&mut self, urls: Vec<String>) {
        if !urls.is_empty() {
            self.apply(|s| s.with_photos_appended(urls));
        }
    }

    pub fn set_photos(&mut self, urls: Vec<String>) {
        self.state.photos = urls;
    }

    fn apply(&mut self, reduce: impl FnOnce(TripState) -> TripState) {
        self.state = reduce(std::mem::take(&mut self.state));
    }

    /// Flight projections are never stored, so they can't be edited or deleted.
    fn ensure_editable(&self, id: &str) -> Result<(), TripError> {
        match self.view(None).find(id) {
            Some(Entry::Synthesized { .. }) => Err(TripError::NotEditable(id.to_string())),
            _ => Ok(()),
        }
    }
}

fn not_found(entity: &'static str, id: &str) -> TripError {
    TripError::NotFound {
        entity,
        id: id.to_string(),
    }
}
