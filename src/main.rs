use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trip_planner::{app, config::Config, db, seed, state::AppState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trip_planner=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .expect("failed to parse DATABASE_URL")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await
        .expect("failed to connect to db");

    db::init_schema(&pool)
        .await
        .expect("failed to create trip tables");

    match seed::seed_if_empty(&pool).await {
        Ok(0) => {}
        Ok(n) => tracing::info!(rows = n, "default itinerary seeded"),
        Err(e) => tracing::error!(error = %e, "could not seed the default itinerary"),
    }

    if config.photo_dir.is_none() {
        tracing::warn!("PHOTO_DIR is not set, photo uploads will only produce local previews");
    }

    let app_state = AppState::load(&config, pool)
        .await
        .expect("failed to load itinerary");
    let app = app::build_router(app_state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");
    tracing::info!("listening on {addr}");
    axum::serve(listener, app).await.expect("server error");
}
