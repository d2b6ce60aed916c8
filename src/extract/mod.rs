//! Extraction side of the pipeline: locating data files and parsing them.

mod event_log;
mod locator;
mod song_catalog;

pub use event_log::{EventExtractor, RawEvent};
pub use locator::{FileLocator, Located, DEFAULT_DATA_EXTENSION};
pub use song_catalog::SongCatalogExtractor;
