use crate::{
    address,
    error::{AppError, AppResult, TripError},
    models::{Area, FlightRecord, LodgingRecords, NewFlight, NewScheduleEntry, ScheduleEntry},
    photos::{self, UploadedFile},
    schedule::{DayGroup, Entry},
    state::AppState,
    timefmt,
};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct TripQuery {
    area: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Persisted,
    Synthesized,
}

#[derive(Serialize)]
pub struct EntryView {
    #[serde(flatten)]
    entry: ScheduleEntry,
    kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_flight_id: Option<String>,
    editable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    map_link: Option<String>,
}

impl From<Entry> for EntryView {
    fn from(entry: Entry) -> Self {
        let editable = entry.is_editable();
        let (entry, kind, source_flight_id) = match entry {
            Entry::Persisted(e) => (e, EntryKind::Persisted, None),
            Entry::Synthesized {
                entry,
                source_flight_id,
            } => (entry, EntryKind::Synthesized, Some(source_flight_id)),
        };
        let display_time = entry.time.as_deref().and_then(|t| {
            timefmt::display_12h(t)
                .inspect_err(|e| tracing::warn!(id = %entry.id, error = %e, "unreadable entry time"))
                .ok()
        });
        let map_link = entry.address.as_deref().map(timefmt::map_link);
        Self {
            entry,
            kind,
            source_flight_id,
            editable,
            display_time,
            map_link,
        }
    }
}

#[derive(Serialize)]
pub struct DayView {
    date: NaiveDate,
    display_date: String,
    entries: Vec<EntryView>,
}

impl From<DayGroup> for DayView {
    fn from(group: DayGroup) -> Self {
        Self {
            date: group.date,
            display_date: timefmt::display_date(group.date),
            entries: group.entries.into_iter().map(EntryView::from).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct TripResponse {
    start: NaiveDate,
    end: NaiveDate,
    days: Vec<DayView>,
    photos: Vec<String>,
}

fn parse_area_filter(raw: Option<&str>) -> Result<Option<Area>, TripError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => v.parse().map(Some),
    }
}

pub async fn get_trip(
    State(app_state): State<AppState>,
    Query(query): Query<TripQuery>,
) -> AppResult<Json<TripResponse>> {
    let area = parse_area_filter(query.area.as_deref())?;
    let itinerary = app_state.itinerary.lock().await;
    let view = itinerary.view(area);
    Ok(Json(TripResponse {
        start: app_state.anchors.start,
        end: app_state.anchors.end,
        days: view.days.into_iter().map(DayView::from).collect(),
        photos: itinerary.state().photos.clone(),
    }))
}

pub async fn get_schedule(State(app_state): State<AppState>) -> Json<Vec<ScheduleEntry>> {
    Json(app_state.itinerary.lock().await.state().schedule.clone())
}

pub async fn create_schedule_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<NewScheduleEntry>,
) -> AppResult<(StatusCode, Json<ScheduleEntry>)> {
    let entry = app_state.itinerary.lock().await.add_schedule(payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_schedule_handler(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<NewScheduleEntry>,
) -> AppResult<Json<ScheduleEntry>> {
    let entry = app_state
        .itinerary
        .lock()
        .await
        .update_schedule(&id, payload)
        .await?;
    Ok(Json(entry))
}

pub async fn delete_schedule_handler(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    app_state.itinerary.lock().await.delete_schedule(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_flights(State(app_state): State<AppState>) -> Json<Vec<FlightRecord>> {
    Json(app_state.itinerary.lock().await.state().flights.clone())
}

pub async fn create_flight_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<NewFlight>,
) -> AppResult<(StatusCode, Json<FlightRecord>)> {
    let flight = app_state.itinerary.lock().await.add_flight(payload).await?;
    Ok((StatusCode::CREATED, Json(flight)))
}

pub async fn update_flight_handler(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<NewFlight>,
) -> AppResult<Json<FlightRecord>> {
    let flight = app_state
        .itinerary
        .lock()
        .await
        .update_flight(&id, payload)
        .await?;
    Ok(Json(flight))
}

pub async fn delete_flight_handler(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    app_state.itinerary.lock().await.delete_flight(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_lodging(State(app_state): State<AppState>) -> Json<LodgingRecords> {
    Json(app_state.lodging.as_ref().clone())
}

#[derive(Serialize)]
pub struct UploadResponse {
    url: String,
}

#[derive(Serialize)]
pub struct PhotosResponse {
    photos: Vec<String>,
}

async fn read_files(mut multipart: Multipart) -> AppResult<Vec<UploadedFile>> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("photo").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        files.push(UploadedFile {
            name,
            content_type,
            bytes,
        });
    }
    Ok(files)
}

/// Stores one file and answers with its public URL.
pub async fn upload_photo(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let file = read_files(multipart)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let bucket = app_state
        .bucket
        .as_ref()
        .ok_or(AppError::StorageUnavailable)?;

    let path = bucket.upload(&file.name, &file.bytes).await?;
    let url = bucket.public_url(&path);
    tracing::info!(url = %url, "photo uploaded");
    app_state
        .itinerary
        .lock()
        .await
        .append_photos(vec![url.clone()]);
    Ok(Json(UploadResponse { url }))
}

pub async fn list_photos(State(app_state): State<AppState>) -> AppResult<Json<PhotosResponse>> {
    let bucket = app_state
        .bucket
        .as_ref()
        .ok_or(AppError::StorageUnavailable)?;
    let photos = bucket.list_urls().await?;
    Ok(Json(PhotosResponse { photos }))
}

/// Uploads a batch; files that can't be stored come back as preview URLs.
pub async fn upload_photos(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<PhotosResponse>> {
    let files = read_files(multipart).await?;
    if files.is_empty() {
        return Err(AppError::BadRequest("No file provided".to_string()));
    }

    let photos = photos::upload_all(
        app_state.bucket.clone(),
        app_state.previews.clone(),
        files,
    )
    .await;
    app_state
        .itinerary
        .lock()
        .await
        .append_photos(photos.clone());
    Ok(Json(PhotosResponse { photos }))
}

pub async fn get_preview(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let preview = app_state
        .previews
        .get(&id)
        .ok_or_else(|| AppError::NotFound("no such preview".to_string()))?;

    let mut response = preview.bytes.into_response();
    if let Some(content_type) = preview
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
    {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
    }
    Ok(response)
}

#[derive(Deserialize)]
pub struct AddressQuery {
    #[serde(default)]
    q: String,
}

pub async fn suggest_addresses(Query(query): Query<AddressQuery>) -> Json<Vec<&'static str>> {
    Json(address::suggest(&query.q))
}

/// Drops the cache and reads everything from storage again.
pub async fn reload_handler(State(app_state): State<AppState>) -> AppResult<StatusCode> {
    let photos = photos::list_or_empty(app_state.bucket.as_deref()).await;
    let mut itinerary = app_state.itinerary.lock().await;
    itinerary.reload().await?;
    itinerary.set_photos(photos);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_filter_accepts_all_and_blank() {
        assert_eq!(parse_area_filter(None).unwrap(), None);
        assert_eq!(parse_area_filter(Some("All")).unwrap(), None);
        assert_eq!(parse_area_filter(Some(" ")).unwrap(), None);
        assert_eq!(parse_area_filter(Some("Ibiza")).unwrap(), Some(Area::Ibiza));
        assert!(parse_area_filter(Some("Madrid")).is_err());
    }
}
