//! Durable storage for the last order snapshot.
//!
//! One slot, last write wins, no versioning.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::debug;

use super::OrderSnapshot;

/// Errors from reading or writing the snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Stored data exists but is not a valid snapshot.
    #[error("corrupt order snapshot at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot could not be encoded.
    #[error("failed to serialize order snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persistence for the order snapshot.
pub trait OrderStore: Send + Sync {
    /// Store `snapshot`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be encoded or stored.
    fn write(&self, snapshot: &OrderSnapshot) -> Result<(), StorageError>;

    /// The stored snapshot, or `None` if nothing was ever written.
    ///
    /// # Errors
    ///
    /// Returns an error if stored data cannot be read or decoded.
    fn read(&self) -> Result<Option<OrderSnapshot>, StorageError>;

    /// Forget the stored snapshot. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if stored data exists but cannot be removed.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Snapshot kept as a JSON file.
#[derive(Debug, Clone)]
pub struct FileOrderStore {
    path: PathBuf,
}

impl FileOrderStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl OrderStore for FileOrderStore {
    fn write(&self, snapshot: &OrderSnapshot) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        // Readers never observe a half-written file.
        let temp = self.temp_path();
        std::fs::write(&temp, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&temp, &self.path).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), order_id = %snapshot.id, "Wrote order snapshot");
        Ok(())
    }

    fn read(&self) -> Result<Option<OrderSnapshot>, StorageError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Snapshot kept in memory. Used by tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    slot: Mutex<Option<OrderSnapshot>>,
}

impl MemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for MemoryOrderStore {
    fn write(&self, snapshot: &OrderSnapshot) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        Ok(())
    }

    fn read(&self) -> Result<Option<OrderSnapshot>, StorageError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use quickshop_core::{Email, Phone, Price, Product, ProductId};

    use super::*;
    use crate::cart::CartLineItem;
    use crate::checkout::ContactInfo;
    use crate::config::TotalsPolicy;
    use crate::order::OrderTotals;

    fn snapshot(name: &str) -> OrderSnapshot {
        let items = vec![CartLineItem {
            product: Product {
                id: ProductId::Numeric(7),
                title: "Backpack".to_string(),
                price: Price::from_cents(10995),
                image: "https://img.test/7.jpg".to_string(),
                description: "Fits 15 inch laptops".to_string(),
                category: "men's clothing".to_string(),
            },
            quantity: 2,
        }];
        let totals = OrderTotals::compute(&items, TotalsPolicy::default());
        OrderSnapshot::capture(
            ContactInfo {
                name: name.to_string(),
                email: Email::parse("jane@example.com").unwrap(),
                phone: Phone::parse("01012345678").unwrap(),
                address: "1 Main St".to_string(),
            },
            items,
            totals,
        )
    }

    #[test]
    fn test_file_store_roundtrip_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileOrderStore::new(dir.path().join("nested/state/orderSummary.json"));

        assert!(store.read().unwrap().is_none());

        let written = snapshot("Jane Doe");
        store.write(&written).unwrap();
        assert_eq!(store.read().unwrap(), Some(written));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_file_store_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileOrderStore::new(dir.path().join("orderSummary.json"));

        store.write(&snapshot("First")).unwrap();
        let second = snapshot("Second");
        store.write(&second).unwrap();

        let read = store.read().unwrap().unwrap();
        assert_eq!(read.contact.name, "Second");
        assert_eq!(read.id, second.id);
    }

    #[test]
    fn test_file_store_corrupt_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orderSummary.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileOrderStore::new(&path).read().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn test_file_store_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileOrderStore::new(dir.path().join("orderSummary.json"));

        store.clear().unwrap();
        store.write(&snapshot("Jane Doe")).unwrap();
        store.clear().unwrap();
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryOrderStore::new();
        assert!(store.read().unwrap().is_none());

        let written = snapshot("Jane Doe");
        store.write(&written).unwrap();
        assert_eq!(store.read().unwrap(), Some(written.clone()));
        // Reads do not consume the snapshot
        assert_eq!(store.read().unwrap(), Some(written));

        store.clear().unwrap();
        assert!(store.read().unwrap().is_none());
    }
}
