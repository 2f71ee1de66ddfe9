use chrono::NaiveDate;
use nanoid::nanoid;
use sqlx::SqlitePool;

use crate::{
    db,
    error::TripError,
    models::{Area, ScheduleEntry},
};

struct SeedItem {
    date: &'static str,
    time: Option<&'static str>,
    title: &'static str,
    area: Area,
    location: Option<&'static str>,
    address: Option<&'static str>,
    url: Option<&'static str>,
    notes: Option<&'static str>,
}

const BLANK: SeedItem = SeedItem {
    date: "",
    time: None,
    title: "",
    area: Area::Barcelona,
    location: None,
    address: None,
    url: None,
    notes: None,
};

const BARCELONA_AIRBNB: &str = "https://www.airbnb.com/l/ORgNzpnP?s=67&unique_share_id=38225666-7311-4745-ad81-1de9cc3e6db1";

const DEFAULT_SCHEDULE: &[SeedItem] = &[
    SeedItem { date: "2025-08-30", title: "Night out (drinks)", notes: Some("Evening"), ..BLANK },
    SeedItem {
        date: "2025-08-31",
        time: Some("15:15"),
        title: "Sagrada Família Tour",
        location: Some("Sagrada Família"),
        address: Some("Carrer de Mallorca, 401, 08013 Barcelona, Spain"),
        ..BLANK
    },
    SeedItem {
        date: "2025-08-31",
        time: Some("17:00"),
        title: "Fantasy Football Draft",
        location: Some("Barcelona Airbnb"),
        address: Some("Pg. de Gràcia, 65, L'Eixample, 08008 Barcelona, Spain"),
        url: Some(BARCELONA_AIRBNB),
        ..BLANK
    },
    SeedItem {
        date: "2025-08-31",
        time: Some("20:00"),
        title: "Watch FC Barcelona match at a bar",
        location: Some("Bar (TBD)"),
        notes: Some("After fantasy draft"),
        ..BLANK
    },
    SeedItem {
        date: "2025-09-01",
        time: Some("16:00"),
        title: "Paella Cooking Class",
        location: Some("Cooking Class"),
        address: Some("Carrer de Negrevernís, 30, 08034 Barcelona, Catalonia, Spain"),
        ..BLANK
    },
    SeedItem {
        date: "2025-09-01",
        time: Some("21:30"),
        title: "Flamenco Show @ 23 Robadors",
        location: Some("23 Robadors"),
        address: Some("Carrer d'en Robador, 23, 08001 Barcelona, Spain"),
        url: Some("https://23robadors.com/"),
        notes: Some("Confirm start time on site"),
        ..BLANK
    },
    SeedItem {
        date: "2025-09-02",
        time: Some("13:30"),
        title: "Sailing",
        location: Some("Marina"),
        address: Some("Passeig de Joan de Borbó, 103, 08039 Barcelona, Catalonia, Spain"),
        ..BLANK
    },
    SeedItem {
        date: "2025-09-02",
        time: Some("20:15"),
        title: "Dinner: Bacaro",
        address: Some("Carrer de Jerusalem, 6, 08001 Barcelona"),
        ..BLANK
    },
    SeedItem { date: "2025-09-02", time: Some("22:30"), title: "Drinks after dinner", notes: Some("After Bacaro, late"), ..BLANK },
    SeedItem {
        date: "2025-09-03",
        time: Some("10:00"),
        title: "Commute to BCN Airport",
        location: Some("Barcelona–El Prat (BCN)"),
        address: Some("Aeropuerto de Barcelona-El Prat, 08820 El Prat de Llobregat, Barcelona, Spain"),
        ..BLANK
    },
    SeedItem { date: "2025-09-03", time: Some("12:30"), title: "Flight: Barcelona → Ibiza (FR3129)", notes: Some("Arrive 13:40"), ..BLANK },
    SeedItem { date: "2025-09-04", title: "Dinner: Ohana Ibiza", area: Area::Ibiza, ..BLANK },
    SeedItem { date: "2025-09-05", time: Some("17:00"), title: "Calvin Harris @ Ushuaïa", area: Area::Ibiza, notes: Some("5–11 pm"), ..BLANK },
    SeedItem { date: "2025-09-05", time: Some("23:30"), title: "David Guetta @ UNVRS", area: Area::Ibiza, notes: Some("11:30 pm – sunrise"), ..BLANK },
    SeedItem { date: "2025-09-06", title: "Chill day", area: Area::Ibiza, ..BLANK },
];

impl SeedItem {
    fn to_entry(&self) -> Result<ScheduleEntry, TripError> {
        let date: NaiveDate = self
            .date
            .parse()
            .map_err(|_| TripError::InvalidFormat(format!("bad seed date '{}'", self.date)))?;
        Ok(ScheduleEntry {
            id: format!("sch_{}", nanoid!(8)),
            date,
            time: self.time.map(str::to_string),
            title: self.title.to_string(),
            area: self.area,
            location: self.location.map(str::to_string),
            address: self.address.map(str::to_string),
            url: self.url.map(str::to_string),
            notes: self.notes.map(str::to_string),
        })
    }
}

/// Inserts the default itinerary when the schedule table is empty.
/// Returns the number of rows inserted.
pub async fn seed_if_empty(pool: &SqlitePool) -> Result<usize, TripError> {
    if db::count_schedule(pool).await? > 0 {
        return Ok(0);
    }

    tracing::info!("schedule is empty, seeding the default itinerary");
    let mut tx = pool.begin().await?;
    for item in DEFAULT_SCHEDULE {
        let entry = item.to_entry()?;
        db::insert_schedule(&mut *tx, &entry).await?;
    }
    tx.commit().await?;
    Ok(DEFAULT_SCHEDULE.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_is_well_formed() {
        for item in DEFAULT_SCHEDULE {
            let entry = item.to_entry().unwrap();
            assert!(!entry.title.is_empty());
            if let Some(t) = &entry.time {
                crate::timefmt::parse_clock(t).unwrap();
            }
        }
    }
}
