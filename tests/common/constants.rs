//! Shared constants for end-to-end tests

#![allow(dead_code)]

// ============================================================================
// Song Catalog
// ============================================================================

pub const ARTIST_1_ID: &str = "AR1";
pub const ARTIST_1_NAME: &str = "X";

pub const ARTIST_2_ID: &str = "ARD7TVE1187B99BFB1";
pub const ARTIST_2_NAME: &str = "Casual";

pub const SONG_1_ID: &str = "S1";
pub const SONG_1_TITLE: &str = "T";
pub const SONG_1_DURATION: f64 = 180.5;

pub const SONG_2_ID: &str = "SOMZWCG12A8C13C480";
pub const SONG_2_TITLE: &str = "I Didn't Mean To";
pub const SONG_2_DURATION: f64 = 218.93179;

// ============================================================================
// Activity Log
// ============================================================================

pub const USER_1_ID: &str = "10";
pub const USER_2_ID: &str = "26";

/// 2018-11-02 01:25:34.796 UTC
pub const PLAY_1_TS: i64 = 1541121934796;
pub const PLAY_1_START_TIME: &str = "2018-11-02 01:25:34.796";

/// 2018-11-02 01:30:00.000 UTC
pub const PLAY_2_TS: i64 = 1541122200000;

pub const UNKNOWN_SONG_TITLE: &str = "Unknown";
