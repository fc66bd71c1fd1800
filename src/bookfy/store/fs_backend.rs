use super::backend::StorageBackend;
use crate::error::{BookfyError, Result};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// File-per-collection backend: key `@bookfy_books` lives in
/// `<root>/bookfy_books.json`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn collection_filename(key: &str) -> String {
        format!("{}.json", file_stem(key))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(BookfyError::Io)?;
        }
        Ok(())
    }
}

/// Keys are storage-style names; strip the leading `@` and anything that
/// would not survive as a file name.
fn file_stem(key: &str) -> String {
    key.trim_start_matches('@')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl StorageBackend for FsBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.location(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(BookfyError::Io)?;
        Ok(Some(content))
    }

    fn write(&self, key: &str, data: &str) -> Result<()> {
        self.ensure_dir()?;
        let target = self.location(key);

        // Atomic write
        let tmp = self
            .root
            .join(format!(".{}-{}.tmp", file_stem(key), Uuid::new_v4()));
        fs::write(&tmp, data).map_err(BookfyError::Io)?;
        fs::rename(&tmp, target).map_err(BookfyError::Io)?;

        Ok(())
    }

    fn location(&self, key: &str) -> PathBuf {
        self.root.join(Self::collection_filename(key))
    }
}
