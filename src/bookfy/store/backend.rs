use crate::error::Result;
use std::path::PathBuf;

/// Abstract interface for raw collection I/O.
///
/// A backend maps a collection key (e.g. `@bookfy_books`) to one serialized
/// string. It knows nothing about entities: the repository handles decoding,
/// id assignment and the read-modify-write cycle.
///
/// Methods take `&self`; backends that keep state use interior mutability.
pub trait StorageBackend {
    /// Raw serialized collection, or `Ok(None)` if it was never written.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the whole collection.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write(&self, key: &str, data: &str) -> Result<()>;

    /// Where the collection lives. For FsBackend this is the real path,
    /// for MemBackend a virtual one.
    fn location(&self, key: &str) -> PathBuf;
}
