use crate::{
    provider::{LoadOptions, ProviderError, StorageProvider},
    store::RecordStore,
};
use std::{
    cell::RefCell,
    collections::BTreeMap,
    path::{Path, PathBuf},
};

///
/// MemoryStorageProvider
///
/// Provider backed by an in-process map of path -> store.
/// Saves land back in the same map, and every load and save is recorded so
/// callers can see exactly which files a run touched.
///

#[derive(Debug, Default)]
pub struct MemoryStorageProvider {
    files: RefCell<BTreeMap<PathBuf, RecordStore>>,
    loads: RefCell<Vec<PathBuf>>,
    saves: RefCell<Vec<PathBuf>>,
}

impl MemoryStorageProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_store(self, path: impl Into<PathBuf>, store: RecordStore) -> Self {
        self.insert(path, store);
        self
    }

    pub fn insert(&self, path: impl Into<PathBuf>, store: RecordStore) {
        self.files.borrow_mut().insert(path.into(), store);
    }

    /// Snapshot of the store currently held at `path`.
    #[must_use]
    pub fn store(&self, path: impl AsRef<Path>) -> Option<RecordStore> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    /// Paths loaded so far, in load order.
    #[must_use]
    pub fn loaded_paths(&self) -> Vec<PathBuf> {
        self.loads.borrow().clone()
    }

    /// Paths saved so far, in save order.
    #[must_use]
    pub fn saved_paths(&self) -> Vec<PathBuf> {
        self.saves.borrow().clone()
    }
}

impl StorageProvider for MemoryStorageProvider {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn load(&self, path: &Path, _options: &LoadOptions<'_>) -> Result<RecordStore, ProviderError> {
        let store = self
            .files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound {
                path: path.to_path_buf(),
            })?;
        self.loads.borrow_mut().push(path.to_path_buf());

        Ok(store)
    }

    fn save(&self, store: &RecordStore, path: &Path) -> Result<(), ProviderError> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), store.clone());
        self.saves.borrow_mut().push(path.to_path_buf());

        Ok(())
    }
}
