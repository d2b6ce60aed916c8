//! Data trees and databases for end-to-end tests

#![allow(dead_code)]

use super::constants::*;
use rusqlite::Connection;
use serde_json::{json, Value};
use sparkify_etl::extract::FileLocator;
use sparkify_etl::{EtlError, LoadCoordinator, RunReport, SqliteWarehouse};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary `song_data` / `log_data` layout plus a warehouse database path.
pub struct DataTree {
    _dir: TempDir,
    pub song_root: PathBuf,
    pub log_root: PathBuf,
    pub db_path: PathBuf,
}

impl DataTree {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let song_root = dir.path().join("song_data");
        let log_root = dir.path().join("log_data");
        fs::create_dir_all(&song_root).unwrap();
        fs::create_dir_all(&log_root).unwrap();
        let db_path = dir.path().join("sparkify.db");
        Self {
            _dir: dir,
            song_root,
            log_root,
            db_path,
        }
    }

    pub fn write_song(&self, relative: &str, record: &Value) -> PathBuf {
        write_file(&self.song_root.join(relative), &record.to_string())
    }

    pub fn write_song_raw(&self, relative: &str, content: &str) -> PathBuf {
        write_file(&self.song_root.join(relative), content)
    }

    pub fn write_log(&self, relative: &str, events: &[Value]) -> PathBuf {
        let lines: Vec<String> = events.iter().map(Value::to_string).collect();
        write_file(&self.log_root.join(relative), &(lines.join("\n") + "\n"))
    }

    pub fn write_log_raw(&self, relative: &str, content: &str) -> PathBuf {
        write_file(&self.log_root.join(relative), content)
    }

    pub fn try_run(&self) -> Result<RunReport, EtlError> {
        let mut warehouse = SqliteWarehouse::open(&self.db_path).unwrap();
        let mut coordinator = LoadCoordinator::new(&mut warehouse, FileLocator::default());
        coordinator.run(&self.song_root, &self.log_root)
    }

    pub fn run(&self) -> RunReport {
        self.try_run().unwrap()
    }

    pub fn connection(&self) -> Connection {
        Connection::open(&self.db_path).unwrap()
    }

    pub fn count(&self, table: &str) -> i64 {
        self.connection()
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
            .unwrap()
    }

    /// (user_id, song_id, artist_id) of every songplay, in insertion order.
    pub fn songplay_keys(&self) -> Vec<(String, Option<String>, Option<String>)> {
        let conn = self.connection();
        let mut stmt = conn
            .prepare("SELECT user_id, song_id, artist_id FROM songplays ORDER BY songplay_id")
            .unwrap();
        let rows = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        rows
    }

    /// Writes the two-song catalog used by most tests.
    pub fn write_default_catalog(&self) {
        self.write_song("A/A/A/TRAAAAW128F429D538.json", &song_record_1());
        self.write_song("A/A/B/TRAABJL12903CDCF1A.json", &song_record_2());
    }
}

fn write_file(path: &Path, content: &str) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

pub fn song_record_1() -> Value {
    json!({
        "artist_id": ARTIST_1_ID,
        "artist_name": ARTIST_1_NAME,
        "artist_location": "",
        "artist_latitude": null,
        "artist_longitude": null,
        "song_id": SONG_1_ID,
        "title": SONG_1_TITLE,
        "year": 2000,
        "duration": SONG_1_DURATION
    })
}

pub fn song_record_2() -> Value {
    json!({
        "num_songs": 1,
        "artist_id": ARTIST_2_ID,
        "artist_latitude": 35.14968,
        "artist_longitude": -90.04892,
        "artist_location": "Memphis, TN",
        "artist_name": ARTIST_2_NAME,
        "song_id": SONG_2_ID,
        "title": SONG_2_TITLE,
        "duration": SONG_2_DURATION,
        "year": 0
    })
}

/// A `NextSong` event for song 1 by user 1.
pub fn next_song_event() -> Value {
    json!({
        "page": "NextSong",
        "ts": PLAY_1_TS,
        "userId": USER_1_ID,
        "firstName": "A",
        "lastName": "B",
        "gender": "F",
        "level": "free",
        "song": SONG_1_TITLE,
        "artist": ARTIST_1_NAME,
        "length": SONG_1_DURATION,
        "sessionId": 1,
        "location": "L",
        "userAgent": "UA"
    })
}

pub fn with_field(mut event: Value, key: &str, value: Value) -> Value {
    event[key] = value;
    event
}

pub fn home_page_event() -> Value {
    json!({
        "artist": null,
        "auth": "Logged In",
        "firstName": "Kaylee",
        "gender": "F",
        "itemInSession": 0,
        "lastName": "Summers",
        "length": null,
        "level": "free",
        "location": "Phoenix-Mesa-Scottsdale, AZ",
        "method": "GET",
        "page": "Home",
        "registration": 1540344794796.0,
        "sessionId": 139,
        "song": null,
        "status": 200,
        "ts": 1541106106796i64,
        "userAgent": "Mozilla/5.0",
        "userId": "8"
    })
}
