use crate::error::EtlError;
use crate::warehouse::{Artist, Song};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Layout of a catalog record on disk.
#[derive(Debug, Deserialize)]
struct SongRecord {
    artist_id: String,
    artist_name: String,
    #[serde(default)]
    artist_location: Option<String>,
    #[serde(default)]
    artist_latitude: Option<f64>,
    #[serde(default)]
    artist_longitude: Option<f64>,
    song_id: String,
    title: String,
    year: i64,
    duration: f64,
}

/// Reads single-record catalog files into their artist and song rows.
#[derive(Clone, Debug, Default)]
pub struct SongCatalogExtractor;

impl SongCatalogExtractor {
    pub fn extract(&self, path: &Path) -> Result<(Artist, Song), EtlError> {
        let text = std::fs::read_to_string(path).map_err(|err| EtlError::io(path, err))?;
        self.parse(path, &text)
    }

    fn parse(&self, path: &Path, text: &str) -> Result<(Artist, Song), EtlError> {
        let mut values = serde_json::Deserializer::from_str(text).into_iter::<Value>();
        let value = match values.next() {
            None => return Err(EtlError::malformed(path, "file contains no record")),
            Some(Err(err)) => return Err(EtlError::malformed(path, err.to_string())),
            Some(Ok(value)) => value,
        };
        if values.next().is_some() {
            return Err(EtlError::malformed(
                path,
                "catalog file must contain exactly one record",
            ));
        }
        if !value.is_object() {
            return Err(EtlError::malformed(path, "record is not a JSON object"));
        }

        let record: SongRecord =
            serde_json::from_value(value).map_err(|err| EtlError::malformed(path, err.to_string()))?;
        record.into_rows(path)
    }
}

impl SongRecord {
    fn into_rows(self, path: &Path) -> Result<(Artist, Song), EtlError> {
        if self.artist_id.is_empty() {
            return Err(EtlError::malformed(path, "artist_id is empty"));
        }
        if self.song_id.is_empty() {
            return Err(EtlError::malformed(path, "song_id is empty"));
        }
        let year = u32::try_from(self.year)
            .map_err(|_| EtlError::malformed(path, format!("invalid year {}", self.year)))?;
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(EtlError::malformed(
                path,
                format!("invalid duration {}", self.duration),
            ));
        }

        let artist = Artist {
            artist_id: self.artist_id.clone(),
            name: self.artist_name,
            location: self.artist_location,
            latitude: self.artist_latitude,
            longitude: self.artist_longitude,
        };
        let song = Song {
            song_id: self.song_id,
            title: self.title,
            artist_id: self.artist_id,
            year,
            duration: self.duration,
        };
        Ok((artist, song))
    }
}
