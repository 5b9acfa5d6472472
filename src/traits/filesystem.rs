use anyhow::{Context, Result, anyhow};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Trait for filesystem operations to enable testing with mocks
pub trait FileSystem: Send + Sync {
    /// Open a file for buffered, line-oriented reading
    ///
    /// The file is released when the returned reader is dropped.
    fn open(&self, path: &Path) -> Result<Box<dyn BufRead + Send>>;
}

/// Real filesystem implementation using std::fs
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn open(&self, path: &Path) -> Result<Box<dyn BufRead + Send>> {
        let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Mock filesystem implementation for testing (in-memory)
pub struct MockFileSystem {
    files: Arc<RwLock<HashMap<PathBuf, Vec<u8>>>>,
}

impl MockFileSystem {
    /// Create new empty mock filesystem
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Add a file with the given contents
    pub fn add_file(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        if let Ok(mut files) = self.files.write() {
            files.insert(path.into(), contents.into());
        }
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn open(&self, path: &Path) -> Result<Box<dyn BufRead + Send>> {
        let files = self
            .files
            .read()
            .map_err(|_| anyhow!("Mock filesystem lock poisoned"))?;
        let contents = files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("File not found: {:?}", path))?;

        Ok(Box::new(Cursor::new(contents)))
    }
}
