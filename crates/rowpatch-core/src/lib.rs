//! Core runtime for rowpatch: record models, value coercion, field
//! addressing, store management, and the all-or-nothing patch executor.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod address;
pub mod engine;
pub mod error;
pub mod model;
pub mod obs;
pub mod patch;
pub mod provider;
pub mod reference;
pub mod store;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

pub use engine::{PatchReport, Patcher};
pub use error::{PatchError, PatchResultCode};
pub use rowpatch_config::{Locale, PatcherConfig};

///
/// Prelude
///
/// Prelude contains the patch document vocabulary and the executor entry
/// point. Stores, providers and coercion helpers stay in their modules.
///

pub mod prelude {
    pub use crate::{
        engine::{PatchReport, Patcher},
        error::{PatchError, PatchResultCode},
        patch::{
            AddRecordInstruction, ColumnData, GenerateIdInstruction, LookupRecordInstruction,
            Patch, PatchValue, ReferenceColumnData, UpdateRecordInstruction,
        },
        value::Value,
    };
}
