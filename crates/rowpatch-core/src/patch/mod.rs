//! Patch document model.
//!
//! A patch is three ordered instruction lists. The engine always runs them
//! as Lookup, then Add, then Update, whatever order they appear in the
//! document. Textual decoding is a thin serde layer over these types.

mod value;

pub use value::PatchValue;

use serde::{Deserialize, Serialize};

///
/// Patch
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Patch {
    pub lookup: Vec<LookupRecordInstruction>,
    pub add: Vec<AddRecordInstruction>,
    pub update: Vec<UpdateRecordInstruction>,
}

impl Patch {
    /// Decode a patch from its JSON document form.
    pub fn from_json_str(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Total instruction count across all phases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lookup.len() + self.add.len() + self.update.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

///
/// TargetsFile
/// Capability shared by every instruction: it operates on one record file.
///

pub trait TargetsFile {
    fn file_name(&self) -> &str;
}

///
/// LookupRecordInstruction
///
/// Finds the first row whose `field` equals `search_value` and binds
/// references from it.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LookupRecordInstruction {
    pub filename: String,
    pub field: String,
    pub search_value: Option<PatchValue>,
    pub ignore_failure: bool,
    pub save_references: Vec<ReferenceColumnData>,
}

impl LookupRecordInstruction {
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        field: impl Into<String>,
        search_value: impl Into<PatchValue>,
    ) -> Self {
        Self {
            filename: filename.into(),
            field: field.into(),
            search_value: Some(search_value.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn ignore_failure(mut self) -> Self {
        self.ignore_failure = true;
        self
    }

    #[must_use]
    pub fn save(mut self, reference: ReferenceColumnData) -> Self {
        self.save_references.push(reference);
        self
    }
}

impl TargetsFile for LookupRecordInstruction {
    fn file_name(&self) -> &str {
        &self.filename
    }
}

///
/// AddRecordInstruction
///
/// Inserts a row (or reuses the row with `record_id` when it exists) and
/// applies column values to it.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddRecordInstruction {
    pub filename: String,
    pub record_id: Option<i64>,
    /// Reference whose value becomes the row's final id.
    pub record_id_reference: Option<String>,
    pub generate_ids: Vec<GenerateIdInstruction>,
    pub record: Vec<ColumnData>,
    pub save_references: Vec<ReferenceColumnData>,
}

impl AddRecordInstruction {
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_id(mut self, id: i64) -> Self {
        self.record_id = Some(id);
        self
    }

    #[must_use]
    pub fn with_id_reference(mut self, name: impl Into<String>) -> Self {
        self.record_id_reference = Some(name.into());
        self
    }

    #[must_use]
    pub fn generate(mut self, generate: GenerateIdInstruction) -> Self {
        self.generate_ids.push(generate);
        self
    }

    #[must_use]
    pub fn column(mut self, column: ColumnData) -> Self {
        self.record.push(column);
        self
    }

    #[must_use]
    pub fn save(mut self, reference: ReferenceColumnData) -> Self {
        self.save_references.push(reference);
        self
    }
}

impl TargetsFile for AddRecordInstruction {
    fn file_name(&self) -> &str {
        &self.filename
    }
}

///
/// UpdateRecordInstruction
///
/// Locates one row, by primary id or by `field` when given, and applies
/// column values to it.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateRecordInstruction {
    pub filename: String,
    pub record_id: i64,
    pub field: Option<String>,
    pub record: Vec<ColumnData>,
}

impl UpdateRecordInstruction {
    #[must_use]
    pub fn new(filename: impl Into<String>, record_id: i64) -> Self {
        Self {
            filename: filename.into(),
            record_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn by_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    #[must_use]
    pub fn column(mut self, column: ColumnData) -> Self {
        self.record.push(column);
        self
    }
}

impl TargetsFile for UpdateRecordInstruction {
    fn file_name(&self) -> &str {
        &self.filename
    }
}

///
/// GenerateIdInstruction
///
/// Binds `name` to one past the highest `field` value found in a store
/// (the instruction's own file unless `file_name` is given), never lower
/// than `start_from`.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateIdInstruction {
    pub name: String,
    pub file_name: Option<String>,
    pub field: String,
    pub start_from: Option<i64>,
    pub override_existing: bool,
}

impl GenerateIdInstruction {
    #[must_use]
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn in_file(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    #[must_use]
    pub const fn start_from(mut self, start: i64) -> Self {
        self.start_from = Some(start);
        self
    }

    #[must_use]
    pub const fn override_existing(mut self) -> Self {
        self.override_existing = true;
        self
    }
}

///
/// ColumnData
///
/// One column assignment: a literal value, or a reference with an optional
/// literal fallback for when the reference is unbound.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnData {
    #[serde(alias = "columnName")]
    pub column: String,
    pub value: Option<PatchValue>,
    pub reference_id: Option<String>,
    pub fallback_value: Option<PatchValue>,
}

impl ColumnData {
    #[must_use]
    pub fn value(column: impl Into<String>, value: impl Into<PatchValue>) -> Self {
        Self {
            column: column.into(),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn reference(column: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            reference_id: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, value: impl Into<PatchValue>) -> Self {
        self.fallback_value = Some(value.into());
        self
    }
}

///
/// ReferenceColumnData
///
/// Binds `name` to the current row's id, or to the integer value of
/// `field` when one is given.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReferenceColumnData {
    pub name: String,
    pub field: Option<String>,
}

impl ReferenceColumnData {
    #[must_use]
    pub fn id(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: None,
        }
    }

    #[must_use]
    pub fn field(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: Some(field.into()),
        }
    }
}

/// Treat empty optional names the same as absent ones.
pub(crate) fn non_empty(name: Option<&String>) -> Option<&str> {
    name.map(String::as_str).filter(|s| !s.is_empty())
}

///
/// TESTS
///
