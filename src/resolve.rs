//! Turns raw activity events into time, user and songplay rows.

use crate::error::EtlError;
use crate::extract::RawEvent;
use crate::warehouse::{SongArtistKeys, SongLookup, Songplay, TimeRow, User};
use std::path::Path;
use tracing::debug;

/// Page value of events that represent a song being played.
pub const NEXT_SONG_PAGE: &str = "NextSong";

/// Rows derived from one event file, each vector in event order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedEvents {
    pub times: Vec<TimeRow>,
    pub users: Vec<User>,
    pub songplays: Vec<Songplay>,
}

impl ResolvedEvents {
    pub fn unmatched_count(&self) -> usize {
        self.songplays.iter().filter(|s| s.song_id.is_none()).count()
    }
}

#[derive(Clone, Debug, Default)]
pub struct SongPlayResolver;

impl SongPlayResolver {
    /// Derives rows for every `NextSong` event of `events`, which came from `source`.
    ///
    /// Events whose song cannot be resolved still produce a songplay, with
    /// null song and artist keys.
    pub fn resolve<L>(
        &self,
        source: &Path,
        events: &[RawEvent],
        lookup: &L,
    ) -> Result<ResolvedEvents, EtlError>
    where
        L: SongLookup + ?Sized,
    {
        let mut resolved = ResolvedEvents::default();

        for event in events.iter().filter(|e| e.page == NEXT_SONG_PAGE) {
            let time = TimeRow::from_epoch_millis(event.ts).ok_or_else(|| {
                EtlError::malformed(source, format!("timestamp {} is out of range", event.ts))
            })?;
            let user = user_of(source, event)?;
            let session_id = event.session_id.ok_or_else(|| {
                EtlError::malformed(source, format!("event at ts {} has no sessionId", event.ts))
            })?;

            let keys = match (&event.song, &event.artist, event.length) {
                (Some(title), Some(artist), Some(length)) => {
                    lookup.lookup_song_and_artist(title, artist, length)?
                }
                _ => None,
            };
            if keys.is_none() {
                debug!(
                    "No song match for {:?} by {:?} ({:?}s)",
                    event.song, event.artist, event.length
                );
            }

            resolved.songplays.push(songplay_of(&time, &user, session_id, event, keys));
            resolved.times.push(time);
            resolved.users.push(user);
        }

        Ok(resolved)
    }
}

fn user_of(source: &Path, event: &RawEvent) -> Result<User, EtlError> {
    let user_id = event.user_id.clone().ok_or_else(|| {
        EtlError::malformed(source, format!("event at ts {} has no userId", event.ts))
    })?;
    let level = event.level.clone().ok_or_else(|| {
        EtlError::malformed(source, format!("event at ts {} has no level", event.ts))
    })?;
    Ok(User {
        user_id,
        first_name: event.first_name.clone(),
        last_name: event.last_name.clone(),
        gender: event.gender.clone(),
        level,
    })
}

fn songplay_of(
    time: &TimeRow,
    user: &User,
    session_id: i64,
    event: &RawEvent,
    keys: Option<SongArtistKeys>,
) -> Songplay {
    let (song_id, artist_id) = match keys {
        Some(keys) => (Some(keys.song_id), Some(keys.artist_id)),
        None => (None, None),
    };
    Songplay {
        start_time: time.start_time,
        user_id: user.user_id.clone(),
        level: user.level.clone(),
        song_id,
        artist_id,
        session_id,
        location: event.location.clone(),
        user_agent: event.user_agent.clone(),
    }
}
