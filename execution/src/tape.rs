//! Backing blobs for the win ledger.
//!
//! A [Tape] holds one complete serialized ledger. Writers never append: every
//! [Tape::replace] swaps the whole content for a fresh snapshot.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Cursor, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

/// A single record blob that can be read in full and overwritten in full.
pub trait Tape: Send + 'static {
    /// Read the entire content from the start.
    fn load(&mut self) -> io::Result<Vec<u8>>;

    /// Replace the entire content with `bytes`.
    fn replace(&mut self, bytes: &[u8]) -> io::Result<()>;
}

/// Ledger stored in a file on disk.
///
/// Replacement goes through a sibling `.tmp` file that is synced and renamed
/// over the target, so the file always holds either the previous or the new
/// snapshot.
#[derive(Debug)]
pub struct FileTape {
    path: PathBuf,
}

impl FileTape {
    /// Open `path`, creating an empty file if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Tape for FileTape {
    fn load(&mut self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }

    fn replace(&mut self, bytes: &[u8]) -> io::Result<()> {
        let tmp_path = self.tmp_path();
        let result = (|| {
            let mut file = File::create(&tmp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        })();
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }
}

/// Ledger kept in memory, rewound and truncated on every replacement.
#[derive(Debug, Default)]
pub struct MemoryTape {
    inner: Cursor<Vec<u8>>,
}

impl MemoryTape {
    pub fn new(initial: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: Cursor::new(initial.into()),
        }
    }

    pub fn contents(&self) -> &[u8] {
        self.inner.get_ref()
    }
}

impl Tape for MemoryTape {
    fn load(&mut self) -> io::Result<Vec<u8>> {
        self.inner.seek(SeekFrom::Start(0))?;
        let mut bytes = Vec::new();
        self.inner.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn replace(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.inner.get_mut().truncate(0);
        self.inner.write_all(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_tape_replaces_whole_content() {
        let mut tape = MemoryTape::new(b"a much longer initial content".to_vec());
        tape.replace(b"short").unwrap();
        assert_eq!(tape.load().unwrap(), b"short");
        assert_eq!(tape.contents(), b"short");
    }

    #[test]
    fn file_tape_creates_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("game.db.json");
        let mut tape = FileTape::open(&path).unwrap();
        assert!(path.exists());
        assert!(tape.load().unwrap().is_empty());
    }

    #[test]
    fn file_tape_replace_leaves_no_tmp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("game.db.json");
        fs::write(&path, b"[{\"Name\":\"Cleo\",\"Wins\":10}]").unwrap();

        let mut tape = FileTape::open(&path).unwrap();
        tape.replace(b"[]").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"[]");
        assert!(!dir.path().join("game.db.json.tmp").exists());
    }
}
