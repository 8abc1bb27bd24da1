//! Date and coordinate parsing shared by the dataset loaders.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Timestamp layouts seen across the Boston, Denver and NOAA exports.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
];

const MONTHS: &[&str] = &[
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Parses an incident timestamp in any of the supported layouts.
///
/// Date-only values (`2016-08-09`, `08/09/2016`, `09-AUG-16`) resolve to
/// midnight. Boston's newer extracts append a UTC offset
/// (`2020-01-01 00:00:00+00`); the offset is dropped and the wall-clock time
/// kept, matching how the older extracts are written.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%#z") {
        return Some(dt.naive_local());
    }

    parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parses a calendar date, accepting ISO, US and `DD-MON-YY` layouts.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .ok()
        .or_else(|| parse_day_month_abbrev(s))
}

/// Parses the `DD-MON-YY` layout used by the city's assessing exports
/// (`01-JAN-21` → 2021-01-01). Two-digit years are always 20xx.
#[must_use]
pub fn parse_day_month_abbrev(s: &str) -> Option<NaiveDate> {
    let mut parts = s.trim().split('-');
    let day = parts.next()?.parse::<u32>().ok()?;
    let month_name = parts.next()?.to_ascii_uppercase();
    let year_part = parts.next()?;
    if parts.next().is_some() || year_part.len() != 2 {
        return None;
    }
    let year = 2000 + year_part.parse::<i32>().ok()?;
    let month = MONTHS.iter().position(|m| *m == month_name)?;
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()? + 1, day)
}

/// Parses a lat/lng pair. Returns `Ok(None)` when either side is missing or
/// zero (Boston publishes `0`/`-1` placeholders for unlocated incidents) and
/// `Err` with the offending text when a value is not numeric.
///
/// # Errors
///
/// Returns the raw value that failed to parse.
pub fn parse_lat_lng(lat: Option<&str>, lng: Option<&str>) -> Result<Option<(f64, f64)>, String> {
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Ok(None);
    };
    let latitude = lat.parse::<f64>().map_err(|_| lat.to_string())?;
    let longitude = lng.parse::<f64>().map_err(|_| lng.to_string())?;
    let placeholder = |v: f64| v == 0.0 || (v + 1.0).abs() < f64::EPSILON;
    if placeholder(latitude) || placeholder(longitude) {
        return Ok(None);
    }
    Ok(Some((latitude, longitude)))
}

#[cfg(test)]
mod tests {
    use chrono::Timelike as _;

    use super::*;

    #[test]
    fn parses_boston_timestamp() {
        let dt = parse_timestamp("2018-09-02 13:00:00").unwrap();
        assert_eq!(dt.to_string(), "2018-09-02 13:00:00");
    }

    #[test]
    fn parses_boston_timestamp_with_offset() {
        let dt = parse_timestamp("2020-01-01 23:15:00+00").unwrap();
        assert_eq!(dt.hour(), 23);
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    }

    #[test]
    fn parses_denver_timestamp() {
        let dt = parse_timestamp("1/2/2016 3:05:00 PM").unwrap();
        assert_eq!(dt.to_string(), "2016-01-02 15:05:00");
    }

    #[test]
    fn parses_iso_with_fraction() {
        let dt = parse_timestamp("2024-01-15T14:30:00.000").unwrap();
        assert_eq!(dt.to_string(), "2024-01-15 14:30:00");
    }

    #[test]
    fn date_only_is_midnight() {
        let dt = parse_timestamp("2016-08-09").unwrap();
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn parses_day_month_abbrev() {
        assert_eq!(
            parse_day_month_abbrev("01-JAN-21"),
            NaiveDate::from_ymd_opt(2021, 1, 1)
        );
        assert_eq!(
            parse_date("15-dec-19"),
            NaiveDate::from_ymd_opt(2019, 12, 15)
        );
        assert!(parse_day_month_abbrev("01-FOO-21").is_none());
        assert!(parse_day_month_abbrev("31-FEB-21").is_none());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("not-a-date").is_none());
    }

    #[test]
    fn lat_lng_placeholders_are_missing() {
        assert_eq!(parse_lat_lng(Some("0"), Some("-71.05")), Ok(None));
        assert_eq!(parse_lat_lng(Some("-1"), Some("-1")), Ok(None));
        assert_eq!(parse_lat_lng(None, Some("-71.05")), Ok(None));
        assert_eq!(
            parse_lat_lng(Some("42.35"), Some("-71.05")),
            Ok(Some((42.35, -71.05)))
        );
        assert_eq!(parse_lat_lng(Some("north"), Some("-71.05")), Err("north".to_string()));
    }
}
