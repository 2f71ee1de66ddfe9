//! Sort keys and display strings for itinerary dates and times.
//!
//! Dates are naive calendar dates; nothing here converts between time zones.

use chrono::NaiveDate;

use crate::error::TripError;

/// Lexicographically sortable key for an entry.
///
/// An untimed entry keys as `YYYY-MM-DDT`, which orders before every
/// `YYYY-MM-DDTHH:MM` on the same date, including `00:00`.
pub fn sort_key(date: NaiveDate, time: Option<&str>) -> String {
    format!("{}T{}", date.format("%Y-%m-%d"), time.unwrap_or_default())
}

/// Splits an `HH:MM` string into hours and minutes.
pub fn parse_clock(time: &str) -> Result<(u32, u32), TripError> {
    let invalid = || TripError::InvalidFormat(format!("expected HH:MM, got '{time}'"));

    let mut fields = time.trim().split(':');
    let (Some(h), Some(m), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(invalid());
    };
    let numeric = |s: &str| (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit());
    if !numeric(h) || !numeric(m) {
        return Err(invalid());
    }

    let hours: u32 = h.parse().map_err(|_| invalid())?;
    let minutes: u32 = m.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    Ok((hours, minutes))
}

/// Canonical zero-padded `HH:MM`, so stored times compare in clock order.
pub fn normalize_clock(time: &str) -> Result<String, TripError> {
    let (hours, minutes) = parse_clock(time)?;
    Ok(format!("{hours:02}:{minutes:02}"))
}

/// `"13:05"` -> `"1:05 PM"`, `"00:30"` -> `"12:30 AM"`.
pub fn display_12h(time24: &str) -> Result<String, TripError> {
    let (hours, minutes) = parse_clock(time24)?;
    let period = if hours >= 12 { "PM" } else { "AM" };
    let hours12 = match hours % 12 {
        0 => 12,
        h => h,
    };
    Ok(format!("{hours12}:{minutes:02} {period}"))
}

/// Abbreviated weekday, month and day, e.g. `"Sat, Aug 30"`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

/// Display date, followed by the 12-hour time when there is one.
pub fn format_dt(date: NaiveDate, time: Option<&str>) -> Result<String, TripError> {
    let day = display_date(date);
    match time {
        Some(t) => Ok(format!("{day} · {}", display_12h(t)?)),
        None => Ok(day),
    }
}

/// Google Maps search link for a postal address.
pub fn map_link(address: &str) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={}",
        encode_component(address)
    )
}

fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn twelve_hour_conversion() {
        assert_eq!(display_12h("00:00").unwrap(), "12:00 AM");
        assert_eq!(display_12h("09:07").unwrap(), "9:07 AM");
        assert_eq!(display_12h("12:15").unwrap(), "12:15 PM");
        assert_eq!(display_12h("13:05").unwrap(), "1:05 PM");
        assert_eq!(display_12h("23:59").unwrap(), "11:59 PM");
    }

    #[test]
    fn twelve_hour_rejects_malformed_input() {
        for bad in ["", "1305", "13:05:00", "ab:cd", "25:00", "12:60", "-1:30"] {
            assert!(
                matches!(display_12h(bad), Err(TripError::InvalidFormat(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn untimed_sorts_before_midnight() {
        let day = date(2025, 8, 31);
        assert!(sort_key(day, None) < sort_key(day, Some("00:00")));
        assert!(sort_key(day, Some("23:59")) < sort_key(date(2025, 9, 1), None));
    }

    #[test]
    fn short_clock_fields_are_padded() {
        assert_eq!(normalize_clock("9:00").unwrap(), "09:00");
        assert_eq!(normalize_clock(" 7:5 ").unwrap(), "07:05");
        assert_eq!(normalize_clock("21:30").unwrap(), "21:30");
        assert!(normalize_clock("9").is_err());

        let day = date(2025, 9, 1);
        let nine = normalize_clock("9:00").unwrap();
        assert!(sort_key(day, Some(&nine)) < sort_key(day, Some("10:00")));
    }

    #[test]
    fn display_date_is_naive() {
        assert_eq!(display_date(date(2025, 8, 30)), "Sat, Aug 30");
        assert_eq!(
            format_dt(date(2025, 9, 5), Some("17:00")).unwrap(),
            "Fri, Sep 5 · 5:00 PM"
        );
        assert_eq!(format_dt(date(2025, 9, 6), None).unwrap(), "Sat, Sep 6");
    }

    #[test]
    fn map_link_encodes_address() {
        assert_eq!(
            map_link("Carrer d'en Robador, 23"),
            "https://www.google.com/maps/search/?api=1&query=Carrer%20d'en%20Robador%2C%2023"
        );
        assert!(map_link("Pg. de Gràcia").ends_with("Pg.%20de%20Gr%C3%A0cia"));
    }
}
