use crate::error::EtlError;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: EtlError,
}

/// Outcome of one pass over a data root.
#[derive(Debug)]
pub struct PassReport {
    pub root: PathBuf,
    pub files_found: usize,
    pub files_loaded: usize,
    pub failures: Vec<FileFailure>,
    /// Entries below the root that could not be walked.
    pub unreadable: Vec<FileFailure>,
}

impl PassReport {
    pub fn new(root: &Path, files_found: usize) -> Self {
        Self {
            root: root.to_path_buf(),
            files_found,
            files_loaded: 0,
            failures: Vec::new(),
            unreadable: Vec::new(),
        }
    }

    pub fn files_attempted(&self) -> usize {
        self.files_loaded + self.failures.len()
    }

    pub fn files_failed(&self) -> usize {
        self.failures.len()
    }

    pub fn log_summary(&self, label: &str) {
        info!(
            "{}: {} files attempted, {} loaded, {} failed ({})",
            label,
            self.files_attempted(),
            self.files_loaded,
            self.files_failed(),
            self.root.display()
        );
        for failure in &self.failures {
            warn!("  {}: {}", failure.path.display(), failure.error);
        }
        if !self.unreadable.is_empty() {
            warn!("{}: {} entries could not be read", label, self.unreadable.len());
            for entry in &self.unreadable {
                warn!("  {}: {}", entry.path.display(), entry.error);
            }
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub catalog: PassReport,
    pub events: PassReport,
}

impl RunReport {
    pub fn files_failed(&self) -> usize {
        self.catalog.files_failed() + self.events.files_failed()
    }

    pub fn entries_unreadable(&self) -> usize {
        self.catalog.unreadable.len() + self.events.unreadable.len()
    }

    pub fn log_summary(&self) {
        self.catalog.log_summary("Song catalog");
        self.events.log_summary("Activity logs");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_attempts_and_failures() {
        let mut report = PassReport::new(Path::new("/data/log_data"), 3);
        report.files_loaded = 2;
        report.failures.push(FileFailure {
            path: PathBuf::from("/data/log_data/bad.json"),
            error: EtlError::malformed(Path::new("/data/log_data/bad.json"), "line 1: eof"),
        });

        assert_eq!(report.files_attempted(), 3);
        assert_eq!(report.files_failed(), 1);

        let run = RunReport {
            catalog: PassReport::new(Path::new("/data/song_data"), 0),
            events: report,
        };
        assert_eq!(run.files_failed(), 1);
        assert_eq!(run.entries_unreadable(), 0);
    }
}
