//! Merging persisted schedule entries with entries projected from flights,
//! ordering them chronologically and grouping them by day.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::{
    models::{Area, FlightRecord, ScheduleEntry},
    timefmt,
};

/// Id prefix of entries projected from flights.
pub const SYNTHESIZED_PREFIX: &str = "flight-";

const fn trip_date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid trip date"),
    }
}

pub const TRIP_START: NaiveDate = trip_date(2025, 8, 30);
pub const TRIP_END: NaiveDate = trip_date(2025, 9, 7);

/// An airport a flight can be matched against by code or city name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirportAnchor {
    pub code: &'static str,
    pub city: &'static str,
    pub label: &'static str,
    pub address: &'static str,
}

impl AirportAnchor {
    pub fn matches(&self, place: &str) -> bool {
        let place = place.trim();
        place.eq_ignore_ascii_case(self.code) || place.eq_ignore_ascii_case(self.city)
    }
}

/// Dates and airports that decide which flights show up on the schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripAnchors {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub arrival: AirportAnchor,
    pub departure: AirportAnchor,
}

impl Default for TripAnchors {
    fn default() -> Self {
        Self {
            start: TRIP_START,
            end: TRIP_END,
            arrival: AirportAnchor {
                code: "BCN",
                city: "Barcelona",
                label: "Barcelona–El Prat (BCN)",
                address: "Aeropuerto de Barcelona-El Prat, 08820 El Prat de Llobregat, Barcelona, Spain",
            },
            departure: AirportAnchor {
                code: "IBZ",
                city: "Ibiza",
                label: "Ibiza Airport (IBZ)",
                address: "Aeropuerto de Ibiza, 07817 Sant Josep de sa Talaia, Illes Balears, Spain",
            },
        }
    }
}

/// A line on the schedule, either stored or projected from a flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Persisted(ScheduleEntry),
    Synthesized {
        entry: ScheduleEntry,
        source_flight_id: String,
    },
}

impl Entry {
    pub fn entry(&self) -> &ScheduleEntry {
        match self {
            Entry::Persisted(entry) | Entry::Synthesized { entry, .. } => entry,
        }
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, Entry::Persisted(_))
    }

    pub fn sort_key(&self) -> String {
        let entry = self.entry();
        timefmt::sort_key(entry.date, entry.time.as_deref())
    }
}

/// Entries projected from one flight: the arrival into the first leg and
/// the departure from the last leg. Untimed flights produce nothing.
pub fn synthesize(flight: &FlightRecord, anchors: &TripAnchors) -> Vec<Entry> {
    let mut out = Vec::new();

    let arrival_dates = [anchors.start.pred_opt(), Some(anchors.start)];
    if anchors.arrival.matches(&flight.destination) && arrival_dates.contains(&Some(flight.date)) {
        if let Some(time) = &flight.arrivetime {
            out.push(Entry::Synthesized {
                entry: ScheduleEntry {
                    id: format!("{SYNTHESIZED_PREFIX}arrive-{}", flight.id),
                    date: anchors.start,
                    time: Some(time.clone()),
                    title: format!(
                        "{} arrive · {} from {}",
                        flight.traveler, flight.flight, flight.origin
                    ),
                    area: Area::Barcelona,
                    location: Some(anchors.arrival.label.to_string()),
                    address: Some(anchors.arrival.address.to_string()),
                    url: None,
                    notes: flight.notes.clone(),
                },
                source_flight_id: flight.id.clone(),
            });
        }
    }

    if anchors.departure.matches(&flight.origin) && flight.date == anchors.end {
        if let Some(time) = &flight.departtime {
            out.push(Entry::Synthesized {
                entry: ScheduleEntry {
                    id: format!("{SYNTHESIZED_PREFIX}depart-{}", flight.id),
                    date: anchors.end,
                    time: Some(time.clone()),
                    title: format!(
                        "{} depart · {} to {}",
                        flight.traveler, flight.flight, flight.destination
                    ),
                    area: Area::Ibiza,
                    location: Some(anchors.departure.label.to_string()),
                    address: Some(anchors.departure.address.to_string()),
                    url: None,
                    notes: flight.notes.clone(),
                },
                source_flight_id: flight.id.clone(),
            });
        }
    }

    out
}

/// Stored entries plus flight projections, in ascending `(date, time)` order.
/// The sort is stable, so exact ties keep their input order.
pub fn merge_sorted(
    schedule: &[ScheduleEntry],
    flights: &[FlightRecord],
    anchors: &TripAnchors,
) -> Vec<Entry> {
    let mut merged: Vec<Entry> = schedule
        .iter()
        .cloned()
        .map(Entry::Persisted)
        .chain(flights.iter().flat_map(|f| synthesize(f, anchors)))
        .collect();
    merged.sort_by_cached_key(Entry::sort_key);
    merged
}

pub fn filter_area(entries: Vec<Entry>, area: Option<Area>) -> Vec<Entry> {
    match area {
        Some(area) => entries
            .into_iter()
            .filter(|e| e.entry().area == area)
            .collect(),
        None => entries,
    }
}

/// All entries of one calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub entries: Vec<Entry>,
}

/// Partitions entries by date. Days appear in order of first occurrence and
/// entries keep their relative order within a day.
pub fn group_by_date(entries: Vec<Entry>) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();
    for entry in entries {
        let date = entry.entry().date;
        let slot = *index.entry(date).or_insert_with(|| {
            groups.push(DayGroup {
                date,
                entries: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].entries.push(entry);
    }
    groups
}

/// The date-grouped schedule as shown to travelers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripView {
    pub days: Vec<DayGroup>,
}

impl TripView {
    pub fn build(
        schedule: &[ScheduleEntry],
        flights: &[FlightRecord],
        anchors: &TripAnchors,
        area: Option<Area>,
    ) -> Self {
        let merged = merge_sorted(schedule, flights, anchors);
        Self {
            days: group_by_date(filter_area(merged, area)),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.days.iter().flat_map(|d| d.entries.iter())
    }

    pub fn find(&self, id: &str) -> Option<&Entry> {
        self.entries().find(|e| e.entry().id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(id: &str, day: NaiveDate, time: Option<&str>, area: Area) -> ScheduleEntry {
        ScheduleEntry {
            id: id.to_string(),
            date: day,
            time: time.map(str::to_string),
            title: format!("title {id}"),
            area,
            location: None,
            address: None,
            url: None,
            notes: None,
        }
    }

    fn flight(id: &str, from: &str, to: &str, day: NaiveDate) -> FlightRecord {
        FlightRecord {
            id: id.to_string(),
            traveler: "Anish + Sinha".to_string(),
            origin: from.to_string(),
            destination: to.to_string(),
            flight: "DL 128".to_string(),
            date: day,
            departtime: None,
            arrivetime: None,
            notes: None,
        }
    }

    fn ids(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.entry().id.as_str()).collect()
    }

    #[test]
    fn merge_orders_by_date_then_time() {
        let schedule = vec![
            item("c", date(2025, 9, 1), Some("16:00"), Area::Barcelona),
            item("b", date(2025, 8, 31), Some("17:00"), Area::Barcelona),
            item("a", date(2025, 8, 31), Some("15:15"), Area::Barcelona),
            item("z", date(2025, 8, 31), None, Area::Barcelona),
        ];
        let merged = merge_sorted(&schedule, &[], &TripAnchors::default());
        assert_eq!(ids(&merged), ["z", "a", "b", "c"]);
        assert!(merged.windows(2).all(|w| w[0].sort_key() <= w[1].sort_key()));
    }

    #[test]
    fn merge_is_stable_for_exact_ties() {
        let day = date(2025, 9, 5);
        let schedule = vec![
            item("first", day, Some("17:00"), Area::Ibiza),
            item("second", day, Some("17:00"), Area::Ibiza),
            item("u1", day, None, Area::Ibiza),
            item("u2", day, None, Area::Ibiza),
        ];
        let merged = merge_sorted(&schedule, &[], &TripAnchors::default());
        assert_eq!(ids(&merged), ["u1", "u2", "first", "second"]);
    }

    #[test]
    fn arrival_the_day_before_is_pinned_to_trip_start() {
        let anchors = TripAnchors::default();
        let mut f = flight("flt_1", "USA", "BCN", date(2025, 8, 29));
        f.arrivetime = Some("06:00".to_string());

        let entries = synthesize(&f, &anchors);
        assert_eq!(entries.len(), 1);
        let entry = entries[0].entry();
        assert_eq!(entry.date, anchors.start);
        assert_eq!(entry.time.as_deref(), Some("06:00"));
        assert_eq!(entry.area, Area::Barcelona);
        assert_eq!(entry.location.as_deref(), Some(anchors.arrival.label));
        assert!(entry.id.starts_with(SYNTHESIZED_PREFIX));
        assert!(entry.title.contains("DL 128") && entry.title.contains("USA"));
        assert!(matches!(
            &entries[0],
            Entry::Synthesized { source_flight_id, .. } if source_flight_id == "flt_1"
        ));
        assert!(!entries[0].is_editable());
    }

    #[test]
    fn arrival_without_time_synthesizes_nothing() {
        let f = flight("flt_1", "USA", "Barcelona", date(2025, 8, 30));
        assert!(synthesize(&f, &TripAnchors::default()).is_empty());
    }

    #[test]
    fn arrival_outside_anchor_dates_is_ignored() {
        let mut f = flight("flt_1", "USA", "Barcelona", date(2025, 8, 28));
        f.arrivetime = Some("06:00".to_string());
        assert!(synthesize(&f, &TripAnchors::default()).is_empty());
    }

    #[test]
    fn departure_on_trip_end_uses_departure_time() {
        let anchors = TripAnchors::default();
        let mut f = flight("flt_9", "Ibiza", "Home", anchors.end);
        f.departtime = Some("11:45".to_string());
        f.arrivetime = Some("15:00".to_string());

        let entries = synthesize(&f, &anchors);
        assert_eq!(entries.len(), 1);
        let entry = entries[0].entry();
        assert_eq!(entry.id, "flight-depart-flt_9");
        assert_eq!(entry.date, anchors.end);
        assert_eq!(entry.time.as_deref(), Some("11:45"));
        assert_eq!(entry.area, Area::Ibiza);
        assert!(entry.title.contains("Home"));
    }

    #[test]
    fn mid_trip_flight_is_not_projected() {
        let mut f = flight("flt_2", "Barcelona", "Ibiza", date(2025, 9, 3));
        f.departtime = Some("12:30".to_string());
        f.arrivetime = Some("13:40".to_string());
        assert!(synthesize(&f, &TripAnchors::default()).is_empty());
    }

    #[test]
    fn filter_keeps_relative_order() {
        let schedule = vec![
            item("i1", date(2025, 9, 4), None, Area::Ibiza),
            item("b1", date(2025, 8, 31), Some("10:00"), Area::Barcelona),
            item("i2", date(2025, 9, 5), Some("17:00"), Area::Ibiza),
        ];
        let mut dep = flight("flt_9", "IBZ", "Home", date(2025, 9, 7));
        dep.departtime = Some("09:00".to_string());

        let merged = merge_sorted(&schedule, &[dep], &TripAnchors::default());
        let ibiza = filter_area(merged.clone(), Some(Area::Ibiza));
        assert_eq!(ids(&ibiza), ["i1", "i2", "flight-depart-flt_9"]);
        assert!(ibiza.iter().all(|e| e.entry().area == Area::Ibiza));
        assert_eq!(filter_area(merged.clone(), None), merged);
    }

    #[test]
    fn grouping_partitions_sorted_sequence() {
        let schedule = vec![
            item("a", date(2025, 8, 30), None, Area::Barcelona),
            item("b", date(2025, 8, 31), Some("15:15"), Area::Barcelona),
            item("c", date(2025, 8, 31), Some("20:00"), Area::Barcelona),
            item("d", date(2025, 9, 2), Some("13:30"), Area::Barcelona),
        ];
        let merged = merge_sorted(&schedule, &[], &TripAnchors::default());
        let groups = group_by_date(merged.clone());

        assert_eq!(
            groups.iter().map(|g| g.date).collect::<Vec<_>>(),
            [date(2025, 8, 30), date(2025, 8, 31), date(2025, 9, 2)]
        );
        let flattened: Vec<Entry> = groups.into_iter().flat_map(|g| g.entries).collect();
        assert_eq!(flattened, merged);
    }

    #[test]
    fn grouping_unsorted_input_follows_first_occurrence() {
        let d1 = date(2025, 9, 2);
        let d2 = date(2025, 8, 31);
        let entries = vec![
            Entry::Persisted(item("x", d1, None, Area::Barcelona)),
            Entry::Persisted(item("y", d2, None, Area::Barcelona)),
            Entry::Persisted(item("z", d1, None, Area::Barcelona)),
        ];
        let groups = group_by_date(entries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, d1);
        assert_eq!(ids(&groups[0].entries), ["x", "z"]);
        assert_eq!(ids(&groups[1].entries), ["y"]);
    }

    #[test]
    fn view_finds_entries_by_id() {
        let anchors = TripAnchors::default();
        let mut arr = flight("flt_1", "USA", "Barcelona", anchors.start);
        arr.arrivetime = Some("06:00".to_string());
        let schedule = vec![item("sch_1", anchors.start, None, Area::Barcelona)];

        let view = TripView::build(&schedule, &[arr], &anchors, None);
        assert!(view.find("sch_1").is_some_and(Entry::is_editable));
        assert!(view.find("flight-arrive-flt_1").is_some_and(|e| !e.is_editable()));
        assert!(view.find("missing").is_none());
        assert_eq!(view.days.len(), 1);
    }
}
