use crate::error::TripError;
use crate::models::{FlightRecord, ScheduleEntry};
use sqlx::{Executor, Sqlite, SqlitePool};

pub async fn init_schema(pool: &SqlitePool) -> Result<(), TripError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS schedule (
            id TEXT PRIMARY KEY,
            date DATE NOT NULL,
            time TEXT,
            title TEXT NOT NULL,
            area TEXT NOT NULL,
            location TEXT,
            address TEXT,
            url TEXT,
            notes TEXT
        );",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS flights (
            id TEXT PRIMARY KEY,
            traveler TEXT NOT NULL,
            origin TEXT NOT NULL,
            destination TEXT NOT NULL,
            flight TEXT NOT NULL,
            date DATE NOT NULL,
            departtime TEXT,
            arrivetime TEXT,
            notes TEXT
        );",
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn count_schedule(pool: &SqlitePool) -> Result<i64, TripError> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM schedule")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

pub async fn get_schedule(pool: &SqlitePool) -> Result<Vec<ScheduleEntry>, TripError> {
    sqlx::query_as("SELECT * FROM schedule ORDER BY date")
        .fetch_all(pool)
        .await
        .map_err(TripError::from)
}

/// Accepts a pool or an open transaction.
pub async fn insert_schedule<'e, E>(executor: E, entry: &ScheduleEntry) -> Result<(), TripError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO schedule (id, date, time, title, area, location, address, url, notes)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&entry.id)
    .bind(entry.date)
    .bind(&entry.time)
    .bind(&entry.title)
    .bind(entry.area)
    .bind(&entry.location)
    .bind(&entry.address)
    .bind(&entry.url)
    .bind(&entry.notes)
    .execute(executor)
    .await?;
    Ok(())
}

/// Replaces the row with `entry.id`; returns the number of rows touched.
pub async fn update_schedule(pool: &SqlitePool, entry: &ScheduleEntry) -> Result<u64, TripError> {
    let result = sqlx::query(
        "UPDATE schedule
         SET date = ?, time = ?, title = ?, area = ?, location = ?, address = ?, url = ?, notes = ?
         WHERE id = ?",
    )
    .bind(entry.date)
    .bind(&entry.time)
    .bind(&entry.title)
    .bind(entry.area)
    .bind(&entry.location)
    .bind(&entry.address)
    .bind(&entry.url)
    .bind(&entry.notes)
    .bind(&entry.id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_schedule(pool: &SqlitePool, id: &str) -> Result<u64, TripError> {
    let result = sqlx::query("DELETE FROM schedule WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn get_flights(pool: &SqlitePool) -> Result<Vec<FlightRecord>, TripError> {
    sqlx::query_as("SELECT * FROM flights ORDER BY date")
        .fetch_all(pool)
        .await
        .map_err(TripError::from)
}

pub async fn insert_flight(pool: &SqlitePool, flight: &FlightRecord) -> Result<(), TripError> {
    sqlx::query(
        "INSERT INTO flights (id, traveler, origin, destination, flight, date, departtime, arrivetime, notes)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&flight.id)
    .bind(&flight.traveler)
    .bind(&flight.origin)
    .bind(&flight.destination)
    .bind(&flight.flight)
    .bind(flight.date)
    .bind(&flight.departtime)
    .bind(&flight.arrivetime)
    .bind(&flight.notes)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_flight(pool: &SqlitePool, flight: &FlightRecord) -> Result<u64, TripError> {
    let result = sqlx::query(
        "UPDATE flights
         SET traveler = ?, origin = ?, destination = ?, flight = ?, date = ?,
             departtime = ?, arrivetime = ?, notes = ?
         WHERE id = ?",
    )
    .bind(&flight.traveler)
    .bind(&flight.origin)
    .bind(&flight.destination)
    .bind(&flight.flight)
    .bind(flight.date)
    .bind(&flight.departtime)
    .bind(&flight.arrivetime)
    .bind(&flight.notes)
    .bind(&flight.id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_flight(pool: &SqlitePool, id: &str) -> Result<u64, TripError> {
    let result = sqlx::query("DELETE FROM flights WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
