//! Row types of the star schema.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};

/// Text form of `start_time` in the `time` and `songplays` tables.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Clone, Debug, PartialEq)]
pub struct Artist {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Song {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: u32,
    /// Seconds.
    pub duration: f64,
}

/// Calendar breakdown of a single play timestamp (UTC).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeRow {
    pub start_time: NaiveDateTime,
    pub hour: u32,
    pub day: u32,
    /// ISO 8601 week number.
    pub week: u32,
    pub month: u32,
    pub year: i32,
    /// Monday = 0 through Sunday = 6.
    pub weekday: u32,
}

impl TimeRow {
    /// Returns `None` when `millis` falls outside chrono's representable range.
    pub fn from_epoch_millis(millis: i64) -> Option<Self> {
        let start_time = DateTime::from_timestamp_millis(millis)?.naive_utc();
        Some(TimeRow {
            start_time,
            hour: start_time.hour(),
            day: start_time.day(),
            week: start_time.iso_week().week(),
            month: start_time.month(),
            year: start_time.year(),
            weekday: start_time.weekday().num_days_from_monday(),
        })
    }

    pub fn start_time_text(&self) -> String {
        format_start_time(&self.start_time)
    }
}

pub fn format_start_time(start_time: &NaiveDateTime) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Songplay {
    pub start_time: NaiveDateTime,
    pub user_id: String,
    pub level: String,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

/// Dimension keys returned by a song/artist lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongArtistKeys {
    pub song_id: String,
    pub artist_id: String,
}

/// Row counts of every warehouse table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WarehouseCounts {
    pub artists: usize,
    pub songs: usize,
    pub time: usize,
    pub users: usize,
    pub songplays: usize,
}
