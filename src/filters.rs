//! Filter sets shared by the page loaders and the export coordinator.
//!
//! Each dashboard variant submits the same filter snapshot to its data-load
//! and export endpoints, so the wire field names here must match the backend
//! exactly (a mix of snake_case and camelCase, inherited from the server).

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Wire format for filter timestamps.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Input formats accepted on the command line.
const INPUT_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid date/time '{0}', expected e.g. 2026-08-27 06:00:00")]
    InvalidDate(String),

    #[error("End of date range precedes its start")]
    EmptyRange,

    #[error("A station name is required for this dashboard")]
    MissingStation,
}

/// An inclusive date-time range. Every dashboard requires one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, FilterError> {
        if end < start {
            return Err(FilterError::EmptyRange);
        }
        Ok(DateRange { start, end })
    }

    /// The default range used by every dashboard: today, midnight to 23:59:59.
    pub fn today() -> Self {
        let date = Local::now().date_naive();
        Self::whole_day(date)
    }

    pub fn whole_day(date: NaiveDate) -> Self {
        DateRange {
            start: date.and_hms_opt(0, 0, 0).unwrap_or_default(),
            end: date.and_hms_opt(23, 59, 59).unwrap_or_default(),
        }
    }

    /// Parses an optional start/end pair, filling in today's range for
    /// whichever bound is missing.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, FilterError> {
        let today = Self::today();
        let start = match start {
            Some(s) => parse_date_time(s)?,
            None => today.start,
        };
        let end = match end {
            Some(s) => parse_date_time(s)?,
            None => today.end,
        };
        Self::new(start, end)
    }

    pub fn start_str(&self) -> String {
        self.start.format(DATE_TIME_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format(DATE_TIME_FORMAT).to_string()
    }
}

fn parse_date_time(s: &str) -> Result<NaiveDateTime, FilterError> {
    let s = s.trim();
    for fmt in INPUT_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    // A bare date means the whole day's start
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(FilterError::InvalidDate(s.to_string()))
}

// Serializes as the two wire fields so parent structs can #[serde(flatten)].
impl Serialize for DateRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("start_date", &self.start_str())?;
        map.serialize_entry("end_date", &self.end_str())?;
        map.end()
    }
}

/// Production zone identifiers used by the combined statistics page.
#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum, strum::Display, Serialize)]
pub enum Zone {
    #[strum(serialize = "zone1")]
    #[serde(rename = "zone1")]
    #[value(name = "zone1")]
    Zone1,
    #[strum(serialize = "zone2")]
    #[serde(rename = "zone2")]
    #[value(name = "zone2")]
    Zone2,
    #[strum(serialize = "zone3")]
    #[serde(rename = "zone3")]
    #[value(name = "zone3")]
    Zone3,
}

/// Cell dashboard filters (zone 1 cell reports).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CellFilters {
    #[serde(flatten)]
    pub range: DateRange,
    pub barcode: String,
    #[serde(rename = "barleyStatus")]
    pub barley_status: String,
    #[serde(rename = "capacityStatus")]
    pub capacity_status: String,
    #[serde(rename = "measurementStatus")]
    pub measurement_status: String,
    #[serde(rename = "finalStatus")]
    pub final_status: String,
    pub grade: String,
}

impl CellFilters {
    /// Query pairs for the GET data-load endpoint. Empty values are sent as
    /// empty strings, matching what the dashboards submit.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start_date", self.range.start_str()),
            ("end_date", self.range.end_str()),
            ("barcode", self.barcode.clone()),
            ("barleyStatus", self.barley_status.clone()),
            ("capacityStatus", self.capacity_status.clone()),
            ("measurementStatus", self.measurement_status.clone()),
            ("finalStatus", self.final_status.clone()),
            ("grade", self.grade.clone()),
        ]
    }
}

/// Module dashboard filters (zone 1 module formation reports).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleFilters {
    #[serde(flatten)]
    pub range: DateRange,
    #[serde(rename = "moduleid")]
    pub module_id: String,
    pub grade: String,
}

impl ModuleFilters {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start_date", self.range.start_str()),
            ("end_date", self.range.end_str()),
            ("moduleid", self.module_id.clone()),
            ("grade", self.grade.clone()),
        ]
    }
}

/// Zone02/zone03 station data filters. The station name selects the source
/// table server-side and must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StationFilters {
    #[serde(flatten)]
    pub range: DateRange,
    pub barcode: String,
    pub station_name: String,
    pub shift: String,
}

impl StationFilters {
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.station_name.trim().is_empty() {
            return Err(FilterError::MissingStation);
        }
        Ok(())
    }
}

/// Combined statistics request: one zone over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticsQuery {
    pub zone: Zone,
    #[serde(flatten)]
    pub range: DateRange,
}

impl Default for DateRange {
    fn default() -> Self {
        DateRange::today()
    }
}
