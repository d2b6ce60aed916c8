//! Storage seam between the pipeline and the relational backend.

use super::models::{Artist, Song, SongArtistKeys, Songplay, TimeRow, User};
use crate::error::{EtlError, StoreError};

/// Resolves a play event to its dimension keys.
pub trait SongLookup {
    /// Exact match on song title, artist name and duration.
    ///
    /// Returns `None` unless exactly one song matches.
    fn lookup_song_and_artist(
        &self,
        song_title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<SongArtistKeys>, StoreError>;
}

/// Load operations available inside a transaction.
pub trait StarSchemaWriter: SongLookup {
    /// No-op if the artist is already present.
    fn insert_artist(&self, artist: &Artist) -> Result<(), StoreError>;

    /// No-op if the song is already present. The artist must exist.
    fn insert_song(&self, song: &Song) -> Result<(), StoreError>;

    /// Upsert keyed on `start_time`.
    fn insert_time(&self, time: &TimeRow) -> Result<(), StoreError>;

    /// Upsert keyed on `user_id`; the latest level wins.
    fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    /// Append-only.
    fn insert_songplay(&self, songplay: &Songplay) -> Result<(), StoreError>;
}

pub trait Warehouse {
    /// Runs `work` in a single transaction.
    ///
    /// The transaction commits if `work` returns `Ok` and rolls back on any
    /// error, so nothing `work` wrote survives a failure.
    fn in_transaction<T, F>(&mut self, work: F) -> Result<T, EtlError>
    where
        F: FnOnce(&dyn StarSchemaWriter) -> Result<T, EtlError>;
}
