//! In-memory record stores.
//!
//! A `RecordStore` is one opened record file: its model and its rows keyed
//! by primary id. The `StoreManager` owns every store opened during one
//! patch run and tracks which of them have been mutated.

mod manager;
mod record_store;
mod row;

pub use manager::StoreManager;
pub use record_store::RecordStore;
pub use row::Row;

use crate::{model::FieldKind, value::ScalarType};
use thiserror::Error as ThisError;

///
/// StoreError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("record '{record}' expects {expected} slots, found {actual}")]
    SlotCount {
        record: String,
        expected: usize,
        actual: usize,
    },

    #[error("field '{field}' expects {expected}, found '{found}'")]
    SlotShape {
        field: String,
        expected: FieldKind,
        found: String,
    },

    #[error("scalar field '{field}' has no value")]
    MissingScalar { field: String },

    #[error("record '{record}' has an invalid primary id '{value}'")]
    InvalidId { record: String, value: String },

    #[error("id {id} does not fit primary key type {ty}")]
    IdOutOfRange { id: i64, ty: ScalarType },

    #[error("record '{record}' already contains id {id}")]
    DuplicateId { record: String, id: i64 },

    #[error("row for record '{row}' cannot be stored in '{record}'")]
    ModelMismatch { record: String, row: String },
}
