use super::run::PatchRun;
use crate::{
    address::FieldAddress,
    error::{PatchError, PatchResultCode},
    patch::{GenerateIdInstruction, ReferenceColumnData, non_empty},
    provider::StorageProvider,
    reference::ReferenceTable,
    store::{RecordStore, Row},
    value::Value,
};

impl<P: StorageProvider> PatchRun<'_, P> {
    /// Bind a generated id for an add instruction targeting `current_file`.
    pub(super) fn generate_id(
        &mut self,
        current_file: &str,
        generate: &GenerateIdInstruction,
    ) -> Result<(), PatchError> {
        if generate.name.is_empty() {
            return Err(PatchError::reference(
                PatchResultCode::InvalidReferenceName,
                format!("Found generate id instruction without reference name for file '{current_file}'."),
            ));
        }
        if generate.field.is_empty() {
            return Err(PatchError::reference(
                PatchResultCode::InvalidReferenceField,
                format!("Found generate id instruction without reference field for file '{current_file}'."),
            ));
        }

        if !generate.override_existing && self.references.contains(&generate.name) {
            self.debug_log(format!(
                "generate id: '{}' already bound, keeping it",
                generate.name
            ));
            return Ok(());
        }

        let scan_file = non_empty(generate.file_name.as_ref()).unwrap_or(current_file);
        let store = self.stores.open(scan_file)?;
        let next = next_generated_id(store, &generate.field, generate.start_from)?;

        self.references
            .set(&generate.name, next, generate.override_existing);
        self.debug_log(format!(
            "generate id: '{}' = {next} from {scan_file}.{}",
            generate.name, generate.field
        ));

        Ok(())
    }
}

/// Next free value of `field` in `store`: one past the highest value present,
/// never lower than `start_from` (default 1).
pub fn next_generated_id(
    store: &RecordStore,
    field: &str,
    start_from: Option<i64>,
) -> Result<i64, PatchError> {
    let invalid_field = |detail: String| {
        PatchError::reference(
            PatchResultCode::InvalidReferenceField,
            format!(
                "Found generate id instruction with invalid field '{field}' for file '{}'.",
                store.model().name()
            ),
        )
        .with_message(detail)
    };

    let addr =
        FieldAddress::resolve(store.model(), field).map_err(|err| invalid_field(err.to_string()))?;
    let mut next = start_from.unwrap_or(1);

    for row in store.rows() {
        let value = row.get(&addr).map_err(|err| invalid_field(err.to_string()))?;
        let Some(value) = value.to_reference_int() else {
            return Err(invalid_field(format!(
                "value '{value}' in record {} is not an integer",
                row.id()
            )));
        };

        if value >= next {
            next = value.saturating_add(1);
        }
    }

    Ok(next)
}

/// Bind every directive in `directives` from `row`, replacing existing
/// bindings.
pub(super) fn save_references(
    references: &mut ReferenceTable,
    row: &Row,
    file: &str,
    directives: &[ReferenceColumnData],
) -> Result<(), PatchError> {
    for directive in directives {
        // unnamed directives bind nothing
        if directive.name.is_empty() {
            continue;
        }

        let value = match non_empty(directive.field.as_ref()) {
            None => row.id(),
            Some(field) => reference_value(row, field).ok_or_else(|| {
                PatchError::reference(
                    PatchResultCode::InvalidReferenceField,
                    format!(
                        "Unable to save reference '{}' from field '{field}' of record {} in file '{file}'.",
                        directive.name,
                        row.id()
                    ),
                )
            })?,
        };

        references.set(&directive.name, value, true);
    }

    Ok(())
}

fn reference_value(row: &Row, field: &str) -> Option<i64> {
    row.get_column(field).ok().and_then(Value::to_reference_int)
}
