use crate::{
    address::FieldAddress,
    error::{PatchError, PatchResultCode},
    patch::{ColumnData, PatchValue, non_empty},
    reference::{ReferenceError, ReferenceTable},
    store::Row,
};
use serde_json::Value as JsonValue;

///
/// ColumnSource
/// Where one column assignment takes its value from.
///

enum ColumnSource<'c> {
    Reference(i64),
    Literal(&'c PatchValue),
}

impl ColumnSource<'_> {
    fn to_patch_value(&self) -> PatchValue {
        match self {
            Self::Reference(value) => PatchValue::Loose(JsonValue::from(*value)),
            Self::Literal(value) => (*value).clone(),
        }
    }
}

/// Apply column assignments to `row` in order.
///
/// A bound reference wins over everything else; an unbound one falls back
/// to the literal fallback value, and fails the run without one. A column
/// with neither a value nor a reference is skipped.
pub(super) fn apply_columns(
    references: &ReferenceTable,
    row: &mut Row,
    file: &str,
    columns: &[ColumnData],
) -> Result<(), PatchError> {
    for column in columns {
        apply_column(references, row, file, column)?;
    }

    Ok(())
}

fn apply_column(
    references: &ReferenceTable,
    row: &mut Row,
    file: &str,
    column: &ColumnData,
) -> Result<(), PatchError> {
    let Some(source) = column_source(references, file, column)? else {
        return Ok(());
    };
    let value = source.to_patch_value();

    let set_failed = |detail: String| {
        PatchError::value(
            PatchResultCode::SetValueFailed,
            format!("Unable to set field '{}' to '{value}'", column.column),
        )
        .with_message(detail)
    };

    let addr = FieldAddress::resolve(row.model(), &column.column)
        .map_err(|err| set_failed(err.to_string()))?;
    let native = value
        .coerce(addr.target_kind())
        .map_err(|err| set_failed(err.to_string()))?;

    row.set(&addr, native)
        .map_err(|err| set_failed(err.to_string()))
}

fn column_source<'c>(
    references: &ReferenceTable,
    file: &str,
    column: &'c ColumnData,
) -> Result<Option<ColumnSource<'c>>, PatchError> {
    if column.column.is_empty() {
        return Err(PatchError::engine(
            PatchResultCode::SetValueFailed,
            format!("Found column assignment without a column name for file '{file}'."),
        ));
    }

    if let Some(name) = non_empty(column.reference_id.as_ref()) {
        if let Some(value) = references.try_get(name) {
            return Ok(Some(ColumnSource::Reference(value)));
        }

        return match &column.fallback_value {
            Some(fallback) => Ok(Some(ColumnSource::Literal(fallback))),
            None => Err(ReferenceError::NotFound {
                name: name.to_string(),
            }
            .into()),
        };
    }

    Ok(column.value.as_ref().map(ColumnSource::Literal))
}
