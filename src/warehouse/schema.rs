//! Star schema definition: one fact table (`songplays`) and four dimensions.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, ForeignKey, ForeignKeyOnChange, Schema, SqlType, Table};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("artist_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("latitude", &SqlType::Real),
        sqlite_column!("longitude", &SqlType::Real),
    ],
    indices: &[("idx_artists_name", "name")],
    unique_constraints: &[],
};

const ARTIST_FK: ForeignKey = ForeignKey {
    foreign_table: "artists",
    foreign_column: "artist_id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("song_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!(
            "artist_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&ARTIST_FK)
        ),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
        sqlite_column!("duration", &SqlType::Real, non_null = true), // seconds
    ],
    indices: &[("idx_songs_title", "title")],
    unique_constraints: &[],
};

const TIME_TABLE: Table = Table {
    name: "time",
    columns: &[
        sqlite_column!("start_time", &SqlType::Text, is_primary_key = true), // 'YYYY-MM-DD HH:MM:SS.mmm'
        sqlite_column!("hour", &SqlType::Integer, non_null = true),
        sqlite_column!("day", &SqlType::Integer, non_null = true),
        sqlite_column!("week", &SqlType::Integer, non_null = true),
        sqlite_column!("month", &SqlType::Integer, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
        sqlite_column!("weekday", &SqlType::Integer, non_null = true), // 0=Monday
    ],
    indices: &[],
    unique_constraints: &[],
};

const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("user_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("first_name", &SqlType::Text),
        sqlite_column!("last_name", &SqlType::Text),
        sqlite_column!("gender", &SqlType::Text),
        sqlite_column!("level", &SqlType::Text, non_null = true), // 'free', 'paid'
    ],
    indices: &[],
    unique_constraints: &[],
};

const TIME_FK: ForeignKey = ForeignKey {
    foreign_table: "time",
    foreign_column: "start_time",
    on_delete: ForeignKeyOnChange::Restrict,
};

const USER_FK: ForeignKey = ForeignKey {
    foreign_table: "users",
    foreign_column: "user_id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const SONG_FK: ForeignKey = ForeignKey {
    foreign_table: "songs",
    foreign_column: "song_id",
    on_delete: ForeignKeyOnChange::SetNull,
};

const SONGPLAY_ARTIST_FK: ForeignKey = ForeignKey {
    foreign_table: "artists",
    foreign_column: "artist_id",
    on_delete: ForeignKeyOnChange::SetNull,
};

const SONGPLAYS_TABLE: Table = Table {
    name: "songplays",
    columns: &[
        sqlite_column!("songplay_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "start_time",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&TIME_FK)
        ),
        sqlite_column!(
            "user_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!("level", &SqlType::Text, non_null = true),
        sqlite_column!("song_id", &SqlType::Text, foreign_key = Some(&SONG_FK)), // NULL when unmatched
        sqlite_column!(
            "artist_id",
            &SqlType::Text,
            foreign_key = Some(&SONGPLAY_ARTIST_FK)
        ), // NULL when unmatched
        sqlite_column!("session_id", &SqlType::Integer, non_null = true),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("user_agent", &SqlType::Text),
    ],
    indices: &[
        ("idx_songplays_start_time", "start_time"),
        ("idx_songplays_user", "user_id"),
    ],
    unique_constraints: &[],
};

/// Referenced tables come first so creation order satisfies the foreign keys.
pub const WAREHOUSE_SCHEMA: Schema = Schema {
    tables: &[
        ARTISTS_TABLE,
        SONGS_TABLE,
        TIME_TABLE,
        USERS_TABLE,
        SONGPLAYS_TABLE,
    ],
};
