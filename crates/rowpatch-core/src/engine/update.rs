use super::{columns::apply_columns, run::PatchRun};
use crate::{
    address::FieldAddress,
    error::{PatchError, PatchResultCode},
    patch::{UpdateRecordInstruction, non_empty},
    provider::StorageProvider,
    store::Row,
    value::Value,
};

impl<P: StorageProvider> PatchRun<'_, P> {
    pub(super) fn update(&mut self, ins: &UpdateRecordInstruction) -> Result<(), PatchError> {
        let file = ins.filename.as_str();
        let field = non_empty(ins.field.as_ref());
        let store = self.stores.open(file)?;

        let found = match field {
            None => store.contains(ins.record_id).then_some(ins.record_id),
            Some(field) => {
                let addr = FieldAddress::resolve(store.model(), field).map_err(|err| {
                    PatchError::address(
                        PatchResultCode::InvalidFieldReference,
                        format!("Found update instruction with invalid field '{field}' for file '{file}'."),
                    )
                    .with_message(err.to_string())
                })?;

                store
                    .rows()
                    .find(|row| {
                        row.get(&addr).ok().and_then(Value::to_reference_int) == Some(ins.record_id)
                    })
                    .map(Row::id)
            }
        };

        let row = match found {
            Some(id) => store.get_mut(id),
            None => None,
        };
        let Some(row) = row else {
            let column = field.map_or_else(String::new, |field| format!(" for column: {field}"));

            return Err(PatchError::engine(
                PatchResultCode::UpdateRecordNotFound,
                format!(
                    "Unable to find record with id: '{}{column}' in file: '{file}'.",
                    ins.record_id
                ),
            ));
        };
        let id = row.id();
        apply_columns(&self.references, row, file, &ins.record)?;

        self.stores.mark_modified(file);
        self.debug_log(format!("update: record {id} in {file}"));

        Ok(())
    }
}
