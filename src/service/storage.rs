//! Where the record file lives.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Minimal file primitives the service needs: existence, whole-file read and
/// whole-file replace.
pub trait RecordStorage: Send + Sync {
    /// Human-readable location, used in log lines.
    fn location(&self) -> String;

    fn exists(&self) -> bool;

    fn read(&self) -> io::Result<Vec<u8>>;

    /// Replace the stored contents with `bytes`.
    fn write(&self, bytes: &[u8]) -> io::Result<()>;
}

/// Record file on the local file system.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStorage for FileStorage {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn read(&self) -> io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }

    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, bytes)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    contents: Option<Vec<u8>>,
    writes: usize,
}

/// In-memory record file. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStorage {
    /// Storage with no record file yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<Vec<u8>>) -> Self {
        let storage = Self::new();
        storage.state.lock().expect("storage lock poisoned").contents = Some(contents.into());
        storage
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        self.state.lock().expect("storage lock poisoned").contents.clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.state.lock().expect("storage lock poisoned").writes
    }
}

impl RecordStorage for MemoryStorage {
    fn location(&self) -> String {
        "<memory>".to_string()
    }

    fn exists(&self) -> bool {
        self.state.lock().expect("storage lock poisoned").contents.is_some()
    }

    fn read(&self) -> io::Result<Vec<u8>> {
        self.contents()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "record file does not exist"))
    }

    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        let mut state = self.state.lock().expect("storage lock poisoned");
        state.contents = Some(bytes.to_vec());
        state.writes += 1;
        Ok(())
    }
}
