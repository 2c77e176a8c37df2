use crate::{
    provider::{LoadOptions, ProviderError, StorageProvider},
    store::RecordStore,
};
use std::{
    collections::{BTreeMap, btree_map::Entry},
    path::{Path, PathBuf},
};

///
/// StoreManager
///
/// Run-scoped cache of opened record stores.
/// Files are keyed by base file name and opened at most once per run;
/// the modified set keeps first-mutation order so commits are deterministic.
///

pub struct StoreManager<'a, P: StorageProvider> {
    provider: &'a P,
    input_dir: &'a Path,
    options: LoadOptions<'a>,
    opened: BTreeMap<String, RecordStore>,
    modified: Vec<String>,
}

impl<'a, P: StorageProvider> StoreManager<'a, P> {
    #[must_use]
    pub const fn new(provider: &'a P, input_dir: &'a Path, options: LoadOptions<'a>) -> Self {
        Self {
            provider,
            input_dir,
            options,
            opened: BTreeMap::new(),
            modified: Vec::new(),
        }
    }

    /// Open `file`, loading it from the input directory on first use.
    pub fn open(&mut self, file: &str) -> Result<&mut RecordStore, ProviderError> {
        let Some(name) = base_name(file) else {
            return Err(ProviderError::NotFound {
                path: self.input_dir.join(file),
            });
        };

        match self.opened.entry(name) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = self.input_dir.join(entry.key());
                if !self.provider.exists(&path) {
                    return Err(ProviderError::NotFound { path });
                }
                let store = self.provider.load(&path, &self.options)?;

                Ok(entry.insert(store))
            }
        }
    }

    /// Already-opened store for `file`, if any.
    #[must_use]
    pub fn get(&self, file: &str) -> Option<&RecordStore> {
        base_name(file).and_then(|name| self.opened.get(&name))
    }

    pub fn mark_modified(&mut self, file: &str) {
        if let Some(name) = base_name(file)
            && !self.modified.contains(&name)
        {
            self.modified.push(name);
        }
    }

    #[must_use]
    pub fn is_modified(&self, file: &str) -> bool {
        base_name(file).is_some_and(|name| self.modified.contains(&name))
    }

    /// Base names of modified files, in first-mutation order.
    #[must_use]
    pub fn modified(&self) -> &[String] {
        &self.modified
    }

    #[must_use]
    pub fn opened_count(&self) -> usize {
        self.opened.len()
    }

    /// Save every modified store into `output_dir` under its base name.
    ///
    /// Stores are saved one at a time in first-mutation order and the first
    /// failing save stops the commit. Files saved before that failure stay
    /// written; nothing is rolled back.
    pub fn commit_all(&self, output_dir: &Path) -> Result<Vec<PathBuf>, ProviderError> {
        let mut written = Vec::with_capacity(self.modified.len());

        for name in &self.modified {
            // only opened stores are ever marked
            let Some(store) = self.opened.get(name) else {
                continue;
            };
            let path = output_dir.join(name);
            self.provider.save(store, &path)?;
            written.push(path);
        }

        Ok(written)
    }
}

/// Normalize a patch file reference to its base file name.
#[must_use]
pub fn base_name(file: &str) -> Option<String> {
    Path::new(file)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

///
/// TESTS
///
