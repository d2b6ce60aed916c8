//! SQLite-backed warehouse.
//!
//! A single read-write connection serves the whole run. Each unit of work
//! runs in its own transaction on that connection, so rows committed by the
//! catalog pass are visible to lookups in the event pass.

use super::models::*;
use super::schema::WAREHOUSE_SCHEMA;
use super::trait_def::{SongLookup, StarSchemaWriter, Warehouse};
use crate::error::{EtlError, StoreError};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use tracing::{info, warn};

pub struct SqliteWarehouse {
    conn: Connection,
}

fn prepare_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.pragma_update(None, "foreign_keys", "ON")?;

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating warehouse schema");
        WAREHOUSE_SCHEMA.create(conn)?;
    } else {
        WAREHOUSE_SCHEMA.validate(conn)?;
    }
    Ok(())
}

impl SqliteWarehouse {
    /// Open (or create) the warehouse database at `db_path`.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        prepare_schema(&conn)?;

        let counts = Self::count_rows(&conn)?;
        info!(
            "Opened warehouse: {} artists, {} songs, {} users, {} songplays",
            counts.artists, counts.songs, counts.users, counts.songplays
        );
        Ok(SqliteWarehouse { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        prepare_schema(&conn)?;
        Ok(SqliteWarehouse { conn })
    }

    pub fn get_counts(&self) -> Result<WarehouseCounts, StoreError> {
        Self::count_rows(&self.conn)
    }

    fn count_rows(conn: &Connection) -> Result<WarehouseCounts, StoreError> {
        let count = |table: &str| -> Result<usize, StoreError> {
            let n: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
            Ok(n as usize)
        };
        Ok(WarehouseCounts {
            artists: count("artists")?,
            songs: count("songs")?,
            time: count("time")?,
            users: count("users")?,
            songplays: count("songplays")?,
        })
    }
}

impl Warehouse for SqliteWarehouse {
    fn in_transaction<T, F>(&mut self, work: F) -> Result<T, EtlError>
    where
        F: FnOnce(&dyn StarSchemaWriter) -> Result<T, EtlError>,
    {
        let tx = self.conn.transaction()?;
        let outcome = work(&SqliteWriter { conn: &tx });
        match outcome {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!("Rollback failed: {}", rollback_err);
                }
                Err(err)
            }
        }
    }
}

/// Statement executor bound to an open transaction.
struct SqliteWriter<'c> {
    conn: &'c Connection,
}

impl SongLookup for SqliteWriter<'_> {
    fn lookup_song_and_artist(
        &self,
        song_title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<SongArtistKeys>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT s.song_id, s.artist_id FROM songs s
             JOIN artists a ON a.artist_id = s.artist_id
             WHERE s.title = ?1 AND a.name = ?2 AND s.duration = ?3
             LIMIT 2",
        )?;
        let mut matches = stmt
            .query_map(params![song_title, artist_name, duration], |r| {
                Ok(SongArtistKeys {
                    song_id: r.get(0)?,
                    artist_id: r.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if matches.len() == 1 {
            Ok(matches.pop())
        } else {
            Ok(None)
        }
    }
}

impl StarSchemaWriter for SqliteWriter<'_> {
    fn insert_artist(&self, artist: &Artist) -> Result<(), StoreError> {
        self.conn
            .prepare_cached(
                "INSERT INTO artists (artist_id, name, location, latitude, longitude)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(artist_id) DO NOTHING",
            )?
            .execute(params![
                artist.artist_id,
                artist.name,
                artist.location,
                artist.latitude,
                artist.longitude
            ])?;
        Ok(())
    }

    fn insert_song(&self, song: &Song) -> Result<(), StoreError> {
        self.conn
            .prepare_cached(
                "INSERT INTO songs (song_id, title, artist_id, year, duration)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(song_id) DO NOTHING",
            )?
            .execute(params![
                song.song_id,
                song.title,
                song.artist_id,
                song.year,
                song.duration
            ])?;
        Ok(())
    }

    fn insert_time(&self, time: &TimeRow) -> Result<(), StoreError> {
        self.conn
            .prepare_cached(
                "INSERT INTO time (start_time, hour, day, week, month, year, weekday)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(start_time) DO NOTHING",
            )?
            .execute(params![
                time.start_time_text(),
                time.hour,
                time.day,
                time.week,
                time.month,
                time.year,
                time.weekday
            ])?;
        Ok(())
    }

    fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.conn
            .prepare_cached(
                "INSERT INTO users (user_id, first_name, last_name, gender, level)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id) DO UPDATE SET
                    first_name = excluded.first_name,
                    last_name = excluded.last_name,
                    gender = excluded.gender,
                    level = excluded.level",
            )?
            .execute(params![
                user.user_id,
                user.first_name,
                user.last_name,
                user.gender,
                user.level
            ])?;
        Ok(())
    }

    fn insert_songplay(&self, songplay: &Songplay) -> Result<(), StoreError> {
        self.conn
            .prepare_cached(
                "INSERT INTO songplays
                    (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?
            .execute(params![
                format_start_time(&songplay.start_time),
                songplay.user_id,
                songplay.level,
                songplay.song_id,
                songplay.artist_id,
                songplay.session_id,
                songplay.location,
                songplay.user_agent
            ])?;
        Ok(())
    }
}
