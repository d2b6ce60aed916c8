//! Two-pass load of the warehouse.
//!
//! Pass 1 loads the song catalog (artists, songs). Pass 2 loads the activity
//! logs (time, users, songplays) and resolves each play against the catalog
//! committed by pass 1. Every file is one transaction: it either lands whole
//! or not at all, and a failing file never stops the rest of its pass.
//! Directory entries that cannot be read are reported the same way.

use super::report::{FileFailure, PassReport, RunReport};
use crate::config::AppConfig;
use crate::error::EtlError;
use crate::extract::{EventExtractor, FileLocator, SongCatalogExtractor};
use crate::resolve::SongPlayResolver;
use crate::warehouse::Warehouse;
use std::path::Path;
use tracing::{debug, error, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pass {
    Catalog,
    Events,
}

/// Proof that the catalog pass has finished.
///
/// Only [`LoadCoordinator::load_catalog`] can produce one, and
/// [`LoadCoordinator::load_events`] consumes it, so events can never be
/// resolved against a catalog that has not been loaded yet.
#[derive(Debug)]
pub struct CatalogLoaded {
    report: PassReport,
}

impl CatalogLoaded {
    pub fn report(&self) -> &PassReport {
        &self.report
    }
}

pub struct LoadCoordinator<'w, W: Warehouse> {
    warehouse: &'w mut W,
    locator: FileLocator,
    catalog_extractor: SongCatalogExtractor,
    event_extractor: EventExtractor,
    resolver: SongPlayResolver,
}

impl<'w, W: Warehouse> LoadCoordinator<'w, W> {
    pub fn new(warehouse: &'w mut W, locator: FileLocator) -> Self {
        Self {
            warehouse,
            locator,
            catalog_extractor: SongCatalogExtractor,
            event_extractor: EventExtractor,
            resolver: SongPlayResolver,
        }
    }

    pub fn from_config(warehouse: &'w mut W, config: &AppConfig) -> Self {
        Self::new(warehouse, FileLocator::new(config.data_extension.clone()))
    }

    /// Runs both passes in order.
    pub fn run(&mut self, song_root: &Path, log_root: &Path) -> Result<RunReport, EtlError> {
        let catalog = self.load_catalog(song_root)?;
        self.load_events(catalog, log_root)
    }

    pub fn load_catalog(&mut self, song_root: &Path) -> Result<CatalogLoaded, EtlError> {
        let report = self.run_pass(Pass::Catalog, song_root)?;
        Ok(CatalogLoaded { report })
    }

    pub fn load_events(
        &mut self,
        catalog: CatalogLoaded,
        log_root: &Path,
    ) -> Result<RunReport, EtlError> {
        let events = self.run_pass(Pass::Events, log_root)?;
        Ok(RunReport {
            catalog: catalog.report,
            events,
        })
    }

    fn run_pass(&mut self, pass: Pass, root: &Path) -> Result<PassReport, EtlError> {
        let located = self.locator.locate(root)?;
        let total = located.files.len();
        info!("{} files found in {}", total, root.display());

        let mut report = PassReport::new(root, total);
        report.unreadable = located
            .unreadable
            .into_iter()
            .map(|(path, error)| FileFailure { path, error })
            .collect();
        for (index, path) in located.files.iter().enumerate() {
            match self.load_file(pass, path) {
                Ok(()) => report.files_loaded += 1,
                Err(err) if err.is_fatal() => {
                    error!("Aborting run at {}: {}", path.display(), err);
                    return Err(err);
                }
                Err(err) => {
                    warn!("Skipping {}: {}", path.display(), err);
                    report.failures.push(FileFailure {
                        path: path.clone(),
                        error: err,
                    });
                }
            }
            info!("{}/{} files processed.", index + 1, total);
        }
        Ok(report)
    }

    fn load_file(&mut self, pass: Pass, path: &Path) -> Result<(), EtlError> {
        let Self {
            warehouse,
            catalog_extractor,
            event_extractor,
            resolver,
            ..
        } = self;

        match pass {
            Pass::Catalog => warehouse.in_transaction(|writer| {
                let (artist, song) = catalog_extractor.extract(path)?;
                writer.insert_artist(&artist)?;
                writer.insert_song(&song)?;
                Ok(())
            }),
            Pass::Events => warehouse.in_transaction(|writer| {
                let events = event_extractor.extract(path)?;
                let resolved = resolver.resolve(path, &events, writer)?;

                for time in &resolved.times {
                    writer.insert_time(time)?;
                }
                for user in &resolved.users {
                    writer.insert_user(user)?;
                }
                for songplay in &resolved.songplays {
                    writer.insert_songplay(songplay)?;
                }

                debug!(
                    "{}: {} events, {} songplays ({} unmatched)",
                    path.display(),
                    events.len(),
                    resolved.songplays.len(),
                    resolved.unmatched_count()
                );
                Ok(())
            }),
        }
    }
}
