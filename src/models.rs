use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{error::TripError, timefmt};

/// The two legs of the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum Area {
    Barcelona,
    Ibiza,
}

impl Area {
    pub fn as_str(&self) -> &'static str {
        match self {
            Area::Barcelona => "Barcelona",
            Area::Ibiza => "Ibiza",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Area {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            v if v.eq_ignore_ascii_case("barcelona") => Ok(Area::Barcelona),
            v if v.eq_ignore_ascii_case("ibiza") => Ok(Area::Ibiza),
            other => Err(TripError::Validation(format!("unknown area '{other}'"))),
        }
    }
}

/// One persisted itinerary line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScheduleEntry {
    pub id: String,
    pub date: NaiveDate,
    /// `HH:MM`, 24-hour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub title: String,
    pub area: Area,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A schedule entry as submitted by a user, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewScheduleEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<String>,
    pub title: String,
    pub area: Area,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewScheduleEntry {
    /// Trims the text fields, turns blank optionals into `None` and checks
    /// the required ones.
    pub fn validate(self) -> Result<Self, TripError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(TripError::Validation("title is required".to_string()));
        }
        let time = blank_to_none(self.time)
            .map(|t| timefmt::normalize_clock(&t))
            .transpose()?;
        Ok(Self {
            date: self.date,
            time,
            title,
            area: self.area,
            location: blank_to_none(self.location),
            address: blank_to_none(self.address),
            url: blank_to_none(self.url),
            notes: blank_to_none(self.notes),
        })
    }

    pub fn with_id(self, id: String) -> ScheduleEntry {
        ScheduleEntry {
            id,
            date: self.date,
            time: self.time,
            title: self.title,
            area: self.area,
            location: self.location,
            address: self.address,
            url: self.url,
            notes: self.notes,
        }
    }
}

/// One flight leg for one or more travelers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FlightRecord {
    pub id: String,
    /// Free text, e.g. "Anish + Sinha".
    pub traveler: String,
    #[serde(rename = "from")]
    pub origin: String,
    #[serde(rename = "to")]
    pub destination: String,
    /// Flight designator, e.g. "DL 128".
    pub flight: String,
    pub date: NaiveDate,
    #[serde(default, alias = "departTime", skip_serializing_if = "Option::is_none")]
    pub departtime: Option<String>,
    #[serde(default, alias = "arriveTime", skip_serializing_if = "Option::is_none")]
    pub arrivetime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewFlight {
    pub traveler: String,
    #[serde(rename = "from")]
    pub origin: String,
    #[serde(rename = "to")]
    pub destination: String,
    pub flight: String,
    pub date: NaiveDate,
    #[serde(default, alias = "departTime")]
    pub departtime: Option<String>,
    #[serde(default, alias = "arriveTime")]
    pub arrivetime: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewFlight {
    pub fn validate(self) -> Result<Self, TripError> {
        let required = |name: &str, value: String| {
            let value = value.trim().to_string();
            if value.is_empty() {
                Err(TripError::Validation(format!("{name} is required")))
            } else {
                Ok(value)
            }
        };
        let traveler = required("traveler", self.traveler)?;
        let origin = required("from", self.origin)?;
        let destination = required("to", self.destination)?;
        let flight = required("flight", self.flight)?;

        let clock = |t: Option<String>| {
            blank_to_none(t)
                .map(|t| timefmt::normalize_clock(&t))
                .transpose()
        };
        let departtime = clock(self.departtime)?;
        let arrivetime = clock(self.arrivetime)?;

        Ok(Self {
            traveler,
            origin,
            destination,
            flight,
            date: self.date,
            departtime,
            arrivetime,
            notes: blank_to_none(self.notes),
        })
    }

    pub fn with_id(self, id: String) -> FlightRecord {
        FlightRecord {
            id,
            traveler: self.traveler,
            origin: self.origin,
            destination: self.destination,
            flight: self.flight,
            date: self.date,
            departtime: self.departtime,
            arrivetime: self.arrivetime,
            notes: self.notes,
        }
    }
}

/// Booking link and address of a place to stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lodging {
    pub link: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LodgingRecords {
    pub barcelona: Lodging,
    pub ibiza: Lodging,
}

impl Default for LodgingRecords {
    fn default() -> Self {
        Self {
            barcelona: Lodging {
                link: "https://www.airbnb.com/l/ORgNzpnP?s=67&unique_share_id=38225666-7311-4745-ad81-1de9cc3e6db1".to_string(),
                address: "Pg. de Gràcia, 65, L'Eixample, 08008 Barcelona, Spain".to_string(),
            },
            ibiza: Lodging {
                link: "https://www.airbnb.com/l/N23haenG?s=67&unique_share_id=5f28dd9e-96de-41ee-81b2-9295d52dc05e".to_string(),
                address: "Carrer del Pica-Soques, 34, 07817 Sant Josep de sa Talaia, Illes Balears, Spain".to_string(),
            },
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
