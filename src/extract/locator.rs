use crate::error::EtlError;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

pub const DEFAULT_DATA_EXTENSION: &str = "json";

/// Result of walking one data root.
#[derive(Debug, Default)]
pub struct Located {
    pub files: Vec<PathBuf>,
    pub unreadable: Vec<(PathBuf, EtlError)>,
}

/// Finds data files anywhere below a root directory.
#[derive(Clone, Debug)]
pub struct FileLocator {
    extension: String,
}

impl Default for FileLocator {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_EXTENSION)
    }
}

impl FileLocator {
    /// `extension` is matched exactly against the final extension, without the dot.
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Absolute paths of every matching file under `root`, sorted.
    ///
    /// Symbolic links are followed. Entries that cannot be read are collected
    /// in [`Located::unreadable`] and the walk carries on; only a missing root
    /// is an error.
    pub fn locate(&self, root: &Path) -> Result<Located, EtlError> {
        if !root.exists() {
            return Err(EtlError::NotFound(root.to_path_buf()));
        }
        let root = root
            .canonicalize()
            .map_err(|err| EtlError::io(root, err))?;

        let mut located = Located::default();
        for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.matches(entry.path()) {
                        located.files.push(entry.into_path());
                    }
                }
                Err(err) => {
                    let path = err.path().unwrap_or(&root).to_path_buf();
                    warn!("Cannot read {}: {}", path.display(), err);
                    let error = EtlError::io(&path, err.into());
                    located.unreadable.push((path, error));
                }
            }
        }
        located.files.sort();
        Ok(located)
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e == self.extension)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    #[test]
    fn finds_nested_files_sorted() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "B/b/TRB.json");
        touch(dir.path(), "A/A/A/TRA1.json");
        touch(dir.path(), "A/B/TRA2.json");
        touch(dir.path(), "top.json");
        touch(dir.path(), "A/notes.txt");
        touch(dir.path(), "A/archive.json.bak");

        let files = FileLocator::default().locate(dir.path()).unwrap().files;
        let root = dir.path().canonicalize().unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(&root).unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(
            relative,
            vec!["A/A/A/TRA1.json", "A/B/TRA2.json", "B/b/TRB.json", "top.json"]
        );
        assert!(files.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn empty_root_yields_no_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("empty/nested")).unwrap();
        let located = FileLocator::default().locate(dir.path()).unwrap();
        assert!(located.files.is_empty());
        assert!(located.unreadable.is_empty());
    }

    #[test]
    fn missing_root_is_not_found() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        match FileLocator::default().locate(&missing) {
            Err(EtlError::NotFound(path)) => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn custom_extension() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.json");
        touch(dir.path(), "b.jsonl");

        let files = FileLocator::new("jsonl").locate(dir.path()).unwrap().files;
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("b.jsonl"));
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinked_files() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        touch(outside.path(), "TRREAL.json");
        fs::create_dir_all(dir.path().join("A")).unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("TRREAL.json"),
            dir.path().join("A/TRLINK.json"),
        )
        .unwrap();

        let located = FileLocator::default().locate(dir.path()).unwrap();
        assert_eq!(located.files.len(), 1);
        assert!(located.files[0].ends_with("A/TRLINK.json"));
        assert!(located.unreadable.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_entries_do_not_stop_the_walk() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "A/TRA.json");
        touch(dir.path(), "C/TRC.json");
        // directory link back to the root, and a link to nothing
        std::os::unix::fs::symlink(dir.path(), dir.path().join("B")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.json"), dir.path().join("D.json"))
            .unwrap();

        let located = FileLocator::default().locate(dir.path()).unwrap();
        let root = dir.path().canonicalize().unwrap();
        let relative: Vec<_> = located
            .files
            .iter()
            .map(|p| p.strip_prefix(&root).unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(relative, vec!["A/TRA.json", "C/TRC.json"]);
        assert_eq!(located.unreadable.len(), 2);
        for (path, err) in &located.unreadable {
            assert!(matches!(err, EtlError::Io { .. }), "{}: {:?}", path.display(), err);
            assert!(!err.is_fatal());
        }
    }
}
