//! Config sources
//!
//! A [`FileSource`] resolves a logical file name (as written in the server
//! configuration) to the file's text.

use crate::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Resolves logical file names to text content
pub trait FileSource: Send + Sync {
    /// Read the named file.
    ///
    /// Fails with [`Error::FileNotFound`] when the file cannot be located,
    /// [`Error::Parse`] when it is not UTF-8 text and [`Error::Read`] for any other
    /// read failure.
    fn read_text(&self, name: &str) -> Result<String>;
}

/// Files under a single root directory
#[derive(Debug, Clone)]
pub struct DirectoryFileSource {
    root: PathBuf,
}

impl DirectoryFileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute names are used as-is, relative names are joined to the root.
    pub fn resolve(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl FileSource for DirectoryFileSource {
    fn read_text(&self, name: &str) -> Result<String> {
        let path = self.resolve(name);
        fs::read_to_string(&path).map_err(|source| read_error(&path, source))
    }
}

fn read_error(path: &Path, source: io::Error) -> Error {
    let name = path.display().to_string();
    match source.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound { name, source },
        io::ErrorKind::InvalidData => Error::Parse {
            name,
            reason: format!("file is not valid UTF-8 text: {}", source),
        },
        _ => Error::Read { name, source },
    }
}

/// In-memory files keyed by name
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileSource {
    files: HashMap<String, String>,
}

impl InMemoryFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(name, contents);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(name.into(), contents.into());
    }
}

impl FileSource for InMemoryFileSource {
    fn read_text(&self, name: &str) -> Result<String> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| Error::FileNotFound {
                name: name.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such in-memory file"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_source_reads_relative_name() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("__files")).unwrap();
        fs::write(dir.path().join("__files/d.json"), "{}").unwrap();

        let source = DirectoryFileSource::new(dir.path());
        assert_eq!(source.read_text("__files/d.json").unwrap(), "{}");
    }

    #[test]
    fn test_directory_source_reads_absolute_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("abs.json");
        fs::write(&path, "{\"a\": 1}").unwrap();

        let source = DirectoryFileSource::new("/nonexistent-root");
        assert_eq!(source.read_text(path.to_str().unwrap()).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_directory_source_missing_file() {
        let dir = TempDir::new().unwrap();
        let source = DirectoryFileSource::new(dir.path());

        let err = source.read_text("__files/non_existent_file.json").unwrap_err();
        match err {
            Error::FileNotFound { name, source } => {
                assert!(name.ends_with("non_existent_file.json"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_source_non_utf8_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.json"), [0xff, 0xfe, b'{', b'}']).unwrap();

        let source = DirectoryFileSource::new(dir.path());
        match source.read_text("bad.json").unwrap_err() {
            Error::Parse { name, reason } => {
                assert!(name.ends_with("bad.json"));
                assert!(reason.contains("UTF-8"), "unexpected reason: {}", reason);
            }
            other => panic!("expected Parse, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_source_unreadable_path_is_not_file_not_found() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("dists.json")).unwrap();

        let source = DirectoryFileSource::new(dir.path());
        let err = source.read_text("dists.json").unwrap_err();
        assert!(matches!(err, Error::Read { .. }), "expected Read, got {:?}", err);
    }

    #[test]
    fn test_in_memory_source() {
        let mut source = InMemoryFileSource::new().with_file("a.json", "{}");
        source.insert("b.json", "[]");

        assert_eq!(source.read_text("a.json").unwrap(), "{}");
        assert_eq!(source.read_text("b.json").unwrap(), "[]");
        assert!(matches!(source.read_text("c.json"), Err(Error::FileNotFound { .. })));
    }
}
