use super::backend::StorageBackend;
use crate::error::{BookfyError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since bookfy is single-threaded.
#[derive(Default)]
pub struct MemBackend {
    collections: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
    simulate_write_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Store raw text under a key, bypassing the repository. Lets tests
    /// plant legacy or damaged collections.
    pub fn put_raw(&self, key: &str, data: &str) {
        self.collections
            .borrow_mut()
            .insert(key.to_string(), data.to_string());
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl StorageBackend for MemBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.collections.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, data: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(BookfyError::Store("Simulated write error".to_string()));
        }
        self.collections
            .borrow_mut()
            .insert(key.to_string(), data.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn location(&self, key: &str) -> PathBuf {
        PathBuf::from(format!("memory://{}", key))
    }
}
