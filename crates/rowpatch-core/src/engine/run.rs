use crate::{
    provider::{ProviderError, StorageProvider},
    reference::ReferenceTable,
    store::StoreManager,
};
use std::path::{Path, PathBuf};

///
/// PatchRun
///
/// State of one `apply_patch` call: the opened stores and the reference
/// table. Dropped once the call returns, so nothing leaks into later runs.
///

pub(super) struct PatchRun<'a, P: StorageProvider> {
    pub(super) stores: StoreManager<'a, P>,
    pub(super) references: ReferenceTable,
    debug: bool,
}

impl<'a, P: StorageProvider> PatchRun<'a, P> {
    pub(super) fn new(stores: StoreManager<'a, P>, debug: bool) -> Self {
        Self {
            stores,
            references: ReferenceTable::new(),
            debug,
        }
    }

    pub(super) fn debug_log(&self, s: impl Into<String>) {
        if self.debug {
            println!("[debug] {}", s.into());
        }
    }

    pub(super) fn commit(&self, output_dir: &Path) -> Result<Vec<PathBuf>, ProviderError> {
        self.stores.commit_all(output_dir)
    }

    pub(super) fn into_references(self) -> ReferenceTable {
        self.references
    }
}
