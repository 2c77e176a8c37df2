use super::{references::save_references, run::PatchRun};
use crate::{
    address::FieldAddress,
    error::{PatchError, PatchResultCode},
    patch::LookupRecordInstruction,
    provider::StorageProvider,
};

impl<P: StorageProvider> PatchRun<'_, P> {
    pub(super) fn lookup(&mut self, ins: &LookupRecordInstruction) -> Result<(), PatchError> {
        let file = ins.filename.as_str();
        let store = self.stores.open(file)?;

        let Some(search) = ins.search_value.as_ref().filter(|_| !ins.field.is_empty()) else {
            return Err(PatchError::engine(
                PatchResultCode::InvalidLookupInstruction,
                format!("Found lookup instruction with invalid field or search value for file '{file}'."),
            ));
        };

        let addr = FieldAddress::resolve(store.model(), &ins.field).map_err(|err| {
            PatchError::address(
                PatchResultCode::InvalidFieldReference,
                format!("Found lookup instruction with invalid field '{}' for file '{file}'.", ins.field),
            )
            .with_message(err.to_string())
        })?;
        let value = search.coerce(addr.target_kind()).map_err(|err| {
            PatchError::value(
                PatchResultCode::InvalidFieldValue,
                format!(
                    "Found lookup instruction with invalid value '{search}' for field '{}' in file '{file}'.",
                    ins.field
                ),
            )
            .with_message(err.to_string())
        })?;

        match store.find_by(&addr, &value) {
            Some(row) => {
                let id = row.id();
                save_references(&mut self.references, row, file, &ins.save_references)?;
                self.debug_log(format!("lookup: {file}.{} = {value} -> record {id}", ins.field));

                Ok(())
            }
            None if ins.ignore_failure => {
                self.debug_log(format!(
                    "lookup: {file}.{} = {value} not found, ignored",
                    ins.field
                ));

                Ok(())
            }
            None => Err(PatchError::engine(
                PatchResultCode::LookupFailed,
                format!(
                    "Unable to find record with {} '{value}' in file '{file}'.",
                    ins.field
                ),
            )),
        }
    }
}
