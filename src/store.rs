//! Training example storage.
//!
//! Examples live in `<app>/domains/<domain>/<intent>/<file>.txt`, one
//! marked-up query per line. The domain and intent of an example come from
//! its file's two parent directories.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use regex::Regex;
use tempfile::NamedTempFile;

use crate::{Error, Result};

/// Seam to wherever training examples are stored.
pub trait ExampleStore {
    /// Every example file, in a stable order.
    fn all_file_paths(&self) -> Result<Vec<PathBuf>>;

    /// Lines of one file, without line terminators.
    fn read_lines(&self, path: &Path) -> Result<Vec<String>>;

    /// Replace the contents of one file.
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

/// Paths among `paths` that `pattern` matches.
#[must_use]
pub fn filter_file_paths(pattern: &Regex, paths: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|p| pattern.is_match(&p.to_string_lossy()))
        .cloned()
        .collect()
}

/// `(domain, intent)` for an example file.
#[must_use]
pub fn domain_intent(path: &Path) -> Option<(String, String)> {
    let intent_dir = path.parent()?;
    let domain_dir = intent_dir.parent()?;
    let intent = intent_dir.file_name()?.to_string_lossy().into_owned();
    let domain = domain_dir.file_name()?.to_string_lossy().into_owned();
    Some((domain, intent))
}

/// Example store over an application directory on disk.
#[derive(Debug, Clone)]
pub struct FsExampleStore {
    root: PathBuf,
}

impl FsExampleStore {
    /// Store rooted at the application directory `app`.
    #[must_use]
    pub fn new(app: impl AsRef<Path>) -> Self {
        Self {
            root: app.as_ref().to_path_buf(),
        }
    }

    /// The application directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ExampleStore for FsExampleStore {
    fn all_file_paths(&self) -> Result<Vec<PathBuf>> {
        let pattern = self.root.join("domains").join("*").join("*").join("*.txt");
        let pattern = pattern.to_string_lossy();
        let entries = glob::glob(&pattern)
            .map_err(|e| Error::config(format!("bad application path {pattern:?}: {e}")))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(glob::GlobError::into_error)?;
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        debug!("[store] found {} example files under {}", paths.len(), self.root.display());
        Ok(paths)
    }

    fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        let text = fs::read_to_string(path)?;
        Ok(text.lines().map(str::to_string).collect())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let intent = dir.path().join("domains/times/set_alarm");
        fs::create_dir_all(&intent).unwrap();
        fs::write(intent.join("train.txt"), "wake me at {7 am|sys_time}\nhello\r\n").unwrap();
        fs::write(intent.join("notes.md"), "ignored").unwrap();
        fs::create_dir_all(dir.path().join("domains/weather/check")).unwrap();
        fs::write(dir.path().join("domains/weather/check/test.txt"), "").unwrap();
        dir
    }

    #[test]
    fn test_discovers_txt_files_only() {
        let dir = app();
        let store = FsExampleStore::new(dir.path());
        let paths = store.all_file_paths().unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("domains/times/set_alarm/train.txt"));
        assert!(paths[1].ends_with("domains/weather/check/test.txt"));
    }

    #[test]
    fn test_read_strips_terminators() {
        let dir = app();
        let store = FsExampleStore::new(dir.path());
        let lines = store
            .read_lines(&dir.path().join("domains/times/set_alarm/train.txt"))
            .unwrap();
        assert_eq!(lines, vec!["wake me at {7 am|sys_time}", "hello"]);
    }

    #[test]
    fn test_write_replaces_contents() {
        let dir = app();
        let store = FsExampleStore::new(dir.path());
        let path = dir.path().join("domains/weather/check/test.txt");
        store.write(&path, "is it {raining|weather}\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "is it {raining|weather}\n");
    }

    #[test]
    fn test_domain_intent_and_filter() {
        let path = PathBuf::from("app/domains/times/set_alarm/train.txt");
        assert_eq!(
            domain_intent(&path),
            Some(("times".to_string(), "set_alarm".to_string()))
        );

        let re = Regex::new("^(?:.*/times/.*/train.txt)$").unwrap();
        let paths = vec![path.clone(), PathBuf::from("app/domains/times/set_alarm/test.txt")];
        assert_eq!(filter_file_paths(&re, &paths), vec![path]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let store = FsExampleStore::new("nowhere");
        assert!(matches!(store.read_lines(Path::new("nowhere/x.txt")), Err(Error::Io(_))));
    }
}
