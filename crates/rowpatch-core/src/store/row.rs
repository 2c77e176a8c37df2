use crate::{
    address::{AddressError, FieldAddress},
    model::{FieldKind, RecordModel},
    store::StoreError,
    value::{Value, coerce_integer},
};
use std::sync::Arc;

///
/// Row
///
/// One record, addressable by field name. Holds one slot per declared field
/// in model order; array slots may be unset when the backing file did not
/// initialize them.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    model: Arc<RecordModel>,
    slots: Vec<Option<Value>>,
    id: i64,
}

impl Row {
    /// Build a row of default values with its primary key set to `id`.
    pub fn with_id(model: Arc<RecordModel>, id: i64) -> Result<Self, StoreError> {
        let slots = model
            .fields()
            .iter()
            .map(|field| Some(default_for(field.kind)))
            .collect();

        let mut row = Self {
            model,
            slots,
            id: 0,
        };
        row.set_id(id)?;

        Ok(row)
    }

    /// Build a row from decoded slots, checking every slot against the model.
    pub fn from_slots(model: Arc<RecordModel>, slots: Vec<Option<Value>>) -> Result<Self, StoreError> {
        if slots.len() != model.fields().len() {
            return Err(StoreError::SlotCount {
                record: model.name().to_string(),
                expected: model.fields().len(),
                actual: slots.len(),
            });
        }

        for (field, slot) in model.fields().iter().zip(&slots) {
            match slot {
                Some(value) if !fits(field.kind, value) => {
                    return Err(StoreError::SlotShape {
                        field: field.name.clone(),
                        expected: field.kind,
                        found: value.to_string(),
                    });
                }
                None if !field.kind.is_array() => {
                    return Err(StoreError::MissingScalar {
                        field: field.name.clone(),
                    });
                }
                _ => {}
            }
        }

        let pk = model.primary_key_position();
        let id = slots[pk]
            .as_ref()
            .and_then(Value::to_reference_int)
            .ok_or_else(|| StoreError::InvalidId {
                record: model.name().to_string(),
                value: slots[pk]
                    .as_ref()
                    .map_or_else(String::new, ToString::to_string),
            })?;

        Ok(Self { model, slots, id })
    }

    #[must_use]
    pub fn model(&self) -> &RecordModel {
        &self.model
    }

    #[must_use]
    pub(crate) fn shared_model(&self) -> &Arc<RecordModel> {
        &self.model
    }

    /// Primary identifier of this row.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Rewrite the primary key field; fails when `id` does not fit its type.
    pub fn set_id(&mut self, id: i64) -> Result<(), StoreError> {
        let ty = self.model.primary_key_type();
        let value = coerce_integer(ty, id).map_err(|_| StoreError::IdOutOfRange { id, ty })?;

        self.slots[self.model.primary_key_position()] = Some(value);
        self.id = id;

        Ok(())
    }

    /// Raw slot access in model order.
    #[must_use]
    pub fn slots(&self) -> &[Option<Value>] {
        &self.slots
    }

    // ----------------------------------------------------------------------
    // Addressed access
    // ----------------------------------------------------------------------

    /// Read the value stored at `addr`.
    pub fn get(&self, addr: &FieldAddress) -> Result<&Value, AddressError> {
        let slot = self.slots[addr.position()].as_ref();

        match (addr.index(), slot) {
            (None, Some(value)) => Ok(value),
            (Some(index), Some(Value::Array(items))) => Ok(&items[index]),
            _ => Err(AddressError::UninitializedArray {
                column: self.column_label(addr),
            }),
        }
    }

    /// Write `value` at `addr`; the value must already have the target shape.
    ///
    /// Writing one element of an unset array materializes a default-filled
    /// array first.
    pub fn set(&mut self, addr: &FieldAddress, value: Value) -> Result<(), AddressError> {
        let field = &self.model.fields()[addr.position()];
        if addr.position() == self.model.primary_key_position() {
            return Err(AddressError::PrimaryKey {
                field: field.name.clone(),
            });
        }

        let target = addr.target_kind();
        if !fits(target, &value) {
            return Err(AddressError::TypeMismatch {
                field: self.column_label(addr),
                expected: target,
                found: value.to_string(),
            });
        }

        let slot = &mut self.slots[addr.position()];
        match addr.index() {
            None => *slot = Some(value),
            Some(index) => {
                let array = slot.get_or_insert_with(|| default_for(addr.field_kind()));
                if let Value::Array(items) = array {
                    items[index] = value;
                }
            }
        }

        Ok(())
    }

    /// Resolve `column` and read the value stored there.
    pub fn get_column(&self, column: &str) -> Result<&Value, AddressError> {
        let addr = FieldAddress::resolve(&self.model, column)?;

        self.get(&addr)
    }

    /// Resolve `column` and write `value` there.
    pub fn set_column(&mut self, column: &str, value: Value) -> Result<(), AddressError> {
        let addr = FieldAddress::resolve(&self.model, column)?;

        self.set(&addr, value)
    }

    fn column_label(&self, addr: &FieldAddress) -> String {
        let name = addr.field_name(&self.model);

        match addr.index() {
            Some(index) => format!("{name}{index}"),
            None => name.to_string(),
        }
    }
}

/// Default value for a whole field.
pub(crate) fn default_for(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Scalar(ty) => ty.default_value(),
        FieldKind::Array { element, len } => Value::Array(vec![element.default_value(); len]),
    }
}

/// Whether `value` has exactly the shape `kind` stores.
pub(crate) fn fits(kind: FieldKind, value: &Value) -> bool {
    match (kind, value) {
        (FieldKind::Array { element, len }, Value::Array(items)) => {
            items.len() == len && items.iter().all(|v| v.scalar_type() == Some(element))
        }
        (FieldKind::Scalar(ty), value) => value.scalar_type() == Some(ty),
        (FieldKind::Array { .. }, _) => false,
    }
}

///
/// TESTS
///
