//! Time axis decoding.
//!
//! Time coordinates in the NWP files follow the CF convention: numeric
//! offsets with a `units` attribute such as `minutes since 2021-07-04 16:00:00`.
//! This module turns them into UTC timestamps and derives the accumulation
//! period between consecutive forecast steps.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::dataset::{AttributeValue, Coordinate};
use crate::error::{ImportError, Result};

/// Calendars that map directly onto the proleptic Gregorian calendar
const SUPPORTED_CALENDARS: [&str; 3] = ["standard", "gregorian", "proleptic_gregorian"];

/// Unit of the offsets stored in a time coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "nanoseconds" | "nanosecond" | "nsec" | "ns" => Some(TimeUnit::Nanoseconds),
            "microseconds" | "microsecond" | "usec" | "us" => Some(TimeUnit::Microseconds),
            "milliseconds" | "millisecond" | "msec" | "ms" => Some(TimeUnit::Milliseconds),
            "seconds" | "second" | "secs" | "sec" | "s" => Some(TimeUnit::Seconds),
            "minutes" | "minute" | "mins" | "min" => Some(TimeUnit::Minutes),
            "hours" | "hour" | "hrs" | "hr" | "h" => Some(TimeUnit::Hours),
            "days" | "day" | "d" => Some(TimeUnit::Days),
            _ => None,
        }
    }

    fn microseconds(self) -> f64 {
        match self {
            TimeUnit::Nanoseconds => 1e-3,
            TimeUnit::Microseconds => 1.0,
            TimeUnit::Milliseconds => 1e3,
            TimeUnit::Seconds => 1e6,
            TimeUnit::Minutes => 60.0 * 1e6,
            TimeUnit::Hours => 3600.0 * 1e6,
            TimeUnit::Days => 86400.0 * 1e6,
        }
    }
}

/// A parsed `<unit> since <reference>` time encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeEncoding {
    pub unit: TimeUnit,
    pub reference: DateTime<Utc>,
}

impl TimeEncoding {
    /// Parse a CF time units string
    pub fn parse(units: &str) -> std::result::Result<Self, String> {
        let (unit, reference) = units
            .split_once(" since ")
            .ok_or_else(|| format!("Time units '{}' are not of the form '<unit> since <date>'", units))?;

        let unit = TimeUnit::parse(unit.trim())
            .ok_or_else(|| format!("Unsupported time unit '{}'", unit.trim()))?;
        let reference = parse_reference(reference.trim())
            .ok_or_else(|| format!("Cannot parse reference date '{}'", reference.trim()))?;

        Ok(Self { unit, reference })
    }

    /// Convert a stored offset into a timestamp
    pub fn decode(&self, value: f64) -> Option<DateTime<Utc>> {
        if !value.is_finite() {
            return None;
        }
        let micros = (value * self.unit.microseconds()).round();
        if micros.abs() >= i64::MAX as f64 {
            return None;
        }
        self.reference
            .checked_add_signed(Duration::microseconds(micros as i64))
    }
}

/// Parse the reference date of a CF time encoding.
///
/// Accepts ISO-like dates with optional time of day, fractional seconds and
/// a trailing UTC designator or numeric offset.
fn parse_reference(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let naive = s
        .trim_end_matches(" UTC")
        .trim_end_matches(" GMT")
        .trim_end_matches('Z')
        .trim();

    for format in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Decode a time coordinate into UTC timestamps
pub fn decode_time_axis(coordinate: &Coordinate, source: &str) -> Result<Vec<DateTime<Utc>>> {
    let units = coordinate.units().ok_or_else(|| {
        ImportError::dataset(
            source,
            format!("Time coordinate '{}' has no 'units' attribute", coordinate.name),
        )
    })?;

    if let Some(AttributeValue::Text(calendar)) = coordinate.attributes.get("calendar") {
        if !SUPPORTED_CALENDARS.contains(&calendar.to_lowercase().as_str()) {
            return Err(ImportError::dataset(
                source,
                format!("Unsupported calendar '{}' on '{}'", calendar, coordinate.name),
            ));
        }
    }

    let encoding = TimeEncoding::parse(units).map_err(|message| ImportError::dataset(source, message))?;

    coordinate
        .values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            encoding.decode(value).ok_or_else(|| {
                ImportError::dataset(
                    source,
                    format!("Invalid time value {} at index {} of '{}'", value, i, coordinate.name),
                )
            })
        })
        .collect()
}

/// Interval in whole minutes between forecast steps.
///
/// Consecutive differences are taken along the axis; the first difference has
/// no predecessor, so the second element of the difference sequence
/// (`t[1] - t[0]`) stands for every step. Irregular axes are not detected
/// here, see [`is_regular`]. Returns None with fewer than two timestamps.
pub fn accumulation_minutes(time_stamps: &[DateTime<Utc>]) -> Option<f64> {
    if time_stamps.len() < 2 {
        return None;
    }
    Some((time_stamps[1] - time_stamps[0]).num_minutes() as f64)
}

/// Check that all consecutive steps share the same interval
pub fn is_regular(time_stamps: &[DateTime<Utc>]) -> bool {
    let mut steps = time_stamps.windows(2).map(|pair| pair[1] - pair[0]);
    match steps.next() {
        Some(first) => steps.all(|step| step == first),
        None => true,
    }
}
