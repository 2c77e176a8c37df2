use super::{columns::apply_columns, references::save_references, run::PatchRun};
use crate::{
    error::{PatchError, PatchResultCode},
    patch::{AddRecordInstruction, non_empty},
    provider::StorageProvider,
};

impl<P: StorageProvider> PatchRun<'_, P> {
    pub(super) fn add(&mut self, ins: &AddRecordInstruction) -> Result<(), PatchError> {
        let file = ins.filename.as_str();
        let insert_failed = |detail: String| {
            PatchError::store(
                PatchResultCode::InsertingRecordFailed,
                format!("Unable to add a record to file '{file}'"),
            )
            .with_message(detail)
        };

        // place the row
        let mut id = {
            let store = self.stores.open(file)?;
            match ins.record_id {
                Some(id) if store.contains(id) => {
                    self.debug_log(format!("add: reusing record {id} in {file}"));
                    id
                }
                requested => {
                    let id = requested.unwrap_or_else(|| store.next_id());
                    let row = store
                        .construct_row(id)
                        .map_err(|err| insert_failed(err.to_string()))?;
                    store.insert(row).map_err(|err| insert_failed(err.to_string()))?;
                    self.debug_log(format!("add: inserted record {id} into {file}"));
                    id
                }
            }
        };

        for generate in &ins.generate_ids {
            self.generate_id(file, generate)?;
        }

        // rekey onto a referenced id
        if let Some(name) = non_empty(ins.record_id_reference.as_ref()) {
            let target = self.references.get(name)?;
            if target != id {
                self.rekey(file, id, target).map_err(insert_failed)?;
                self.debug_log(format!("add: moved record {id} to {target} in {file}"));
                id = target;
            }
        }

        let store = self.stores.open(file)?;
        let Some(row) = store.get_mut(id) else {
            return Err(insert_failed(format!("record {id} vanished")));
        };
        apply_columns(&self.references, row, file, &ins.record)?;
        save_references(&mut self.references, row, file, &ins.save_references)?;

        self.stores.mark_modified(file);

        Ok(())
    }

    fn rekey(&mut self, file: &str, from: i64, to: i64) -> Result<(), String> {
        let store = self.stores.open(file).map_err(|err| err.to_string())?;
        if store.contains(to) {
            return Err(format!("id {to} is already in use"));
        }

        let Some(mut row) = store.get(from).cloned() else {
            return Err(format!("record {from} not found"));
        };
        row.set_id(to).map_err(|err| err.to_string())?;

        store.remove(from);
        store.insert(row).map_err(|err| err.to_string())
    }
}
