//! Storage provider boundary.
//!
//! The engine never touches record file bytes itself. A provider resolves a
//! path into a `RecordStore` (deriving the row layout from whatever schema
//! source it knows for that file) and writes a store back out.

mod json;
mod memory;

pub use json::JsonStorageProvider;
pub use memory::MemoryStorageProvider;

use crate::store::RecordStore;
use rowpatch_config::Locale;
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;

///
/// ProviderError
///

#[derive(Debug, ThisError)]
pub enum ProviderError {
    #[error("File '{}' does not exist.", path.display())]
    NotFound { path: PathBuf },

    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record file '{}': {message}", path.display())]
    Malformed { path: PathBuf, message: String },
}

impl ProviderError {
    pub(crate) fn malformed(path: &Path, message: impl ToString) -> Self {
        Self::Malformed {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

///
/// LoadOptions
/// Schema build and locale a record file is interpreted with.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LoadOptions<'a> {
    pub build: &'a str,
    pub locale: Locale,
}

///
/// StorageProvider
///

pub trait StorageProvider {
    /// Whether a backing file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Load the record file at `path`.
    fn load(&self, path: &Path, options: &LoadOptions<'_>) -> Result<RecordStore, ProviderError>;

    /// Persist `store` to `path` in the provider's native encoding.
    fn save(&self, store: &RecordStore, path: &Path) -> Result<(), ProviderError>;
}

impl<P: StorageProvider + ?Sized> StorageProvider for &P {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn load(&self, path: &Path, options: &LoadOptions<'_>) -> Result<RecordStore, ProviderError> {
        (**self).load(path, options)
    }

    fn save(&self, store: &RecordStore, path: &Path) -> Result<(), ProviderError> {
        (**self).save(store, path)
    }
}
