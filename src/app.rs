use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{handlers, state::AppState};

pub fn build_router(app_state: AppState) -> Router {
    let mut app = Router::new()
        .route("/api/trip", get(handlers::get_trip))
        .route("/api/reload", post(handlers::reload_handler))
        .route(
            "/api/schedule",
            get(handlers::get_schedule).post(handlers::create_schedule_handler),
        )
        .route(
            "/api/schedule/{id}",
            put(handlers::update_schedule_handler).delete(handlers::delete_schedule_handler),
        )
        .route(
            "/api/flights",
            get(handlers::get_flights).post(handlers::create_flight_handler),
        )
        .route(
            "/api/flights/{id}",
            put(handlers::update_flight_handler).delete(handlers::delete_flight_handler),
        )
        .route("/api/lodging", get(handlers::get_lodging))
        .route("/api/upload", post(handlers::upload_photo))
        .route(
            "/api/photos",
            get(handlers::list_photos).post(handlers::upload_photos),
        )
        .route("/api/previews/{id}", get(handlers::get_preview))
        .route("/api/addresses", get(handlers::suggest_addresses));

    if let Some(bucket) = &app_state.bucket {
        app = app.nest_service("/photos", ServeDir::new(bucket.root()));
    }

    app.layer(TraceLayer::new_for_http()).with_state(app_state)
}
