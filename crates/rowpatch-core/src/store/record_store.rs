use crate::{
    address::FieldAddress,
    model::RecordModel,
    store::{Row, StoreError},
    value::Value,
};
use std::{collections::BTreeMap, sync::Arc};

///
/// RecordStore
///
/// Rows of one record file keyed by primary id.
/// Invariant: every row's id equals its key.
///

#[derive(Clone, Debug, PartialEq)]
pub struct RecordStore {
    model: Arc<RecordModel>,
    rows: BTreeMap<i64, Row>,
}

impl RecordStore {
    #[must_use]
    pub fn new(model: RecordModel) -> Self {
        Self {
            model: Arc::new(model),
            rows: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &RecordModel {
        &self.model
    }

    /// New default row for this store's schema, not yet inserted.
    pub fn construct_row(&self, id: i64) -> Result<Row, StoreError> {
        Row::with_id(Arc::clone(&self.model), id)
    }

    /// Build a row from decoded slots for this store's schema.
    pub fn decode_row(&self, slots: Vec<Option<Value>>) -> Result<Row, StoreError> {
        Row::from_slots(Arc::clone(&self.model), slots)
    }

    /// Insert a row under its own id; fails if the id is taken.
    pub fn insert(&mut self, row: Row) -> Result<(), StoreError> {
        if !Arc::ptr_eq(row.shared_model(), &self.model) && row.model() != self.model() {
            return Err(StoreError::ModelMismatch {
                record: self.model.name().to_string(),
                row: row.model().name().to_string(),
            });
        }

        let id = row.id();
        if self.rows.contains_key(&id) {
            return Err(StoreError::DuplicateId {
                record: self.model.name().to_string(),
                id,
            });
        }
        self.rows.insert(id, row);

        Ok(())
    }

    pub fn remove(&mut self, id: i64) -> Option<Row> {
        self.rows.remove(&id)
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&Row> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut Row> {
        self.rows.get_mut(&id)
    }

    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    /// Rows in ascending id order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    #[must_use]
    pub fn max_id(&self) -> Option<i64> {
        self.rows.keys().next_back().copied()
    }

    /// Id a new row gets when none is given: one past the highest, or 1.
    #[must_use]
    pub fn next_id(&self) -> i64 {
        self.max_id().map_or(1, |max| max.saturating_add(1))
    }

    /// First row (in id order) whose value at `addr` equals `value`.
    ///
    /// Rows whose addressed array is unset never match.
    #[must_use]
    pub fn find_by(&self, addr: &FieldAddress, value: &Value) -> Option<&Row> {
        self.rows
            .values()
            .find(|row| row.get(addr).is_ok_and(|v| v == value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::FieldModel, value::ScalarType};

    fn store() -> RecordStore {
        RecordStore::new(
            RecordModel::new(
                "Item",
                vec![
                    FieldModel::scalar("ID", ScalarType::Int32),
                    FieldModel::scalar("ExternalKey", ScalarType::Int32),
                ],
            )
            .unwrap(),
        )
    }

    fn insert(store: &mut RecordStore, id: i64, key: i32) {
        let mut row = store.construct_row(id).unwrap();
        row.set_column("ExternalKey", Value::Int32(key)).unwrap();
        store.insert(row).unwrap();
    }

    #[test]
    fn next_id_starts_at_one() {
        assert_eq!(store().next_id(), 1);
    }

    #[test]
    fn next_id_is_one_past_max() {
        let mut store = store();
        insert(&mut store, 3, 0);
        insert(&mut store, 41, 0);

        assert_eq!(store.max_id(), Some(41));
        assert_eq!(store.next_id(), 42);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut store = store();
        insert(&mut store, 5, 0);
        let row = store.construct_row(5).unwrap();

        assert!(matches!(
            store.insert(row),
            Err(StoreError::DuplicateId { id: 5, .. })
        ));
    }

    #[test]
    fn rows_from_another_model_are_rejected() {
        let mut store = store();
        let other = RecordStore::new(
            RecordModel::new("Other", vec![FieldModel::scalar("ID", ScalarType::Int32)]).unwrap(),
        );
        let row = other.construct_row(1).unwrap();

        assert!(matches!(
            store.insert(row),
            Err(StoreError::ModelMismatch { .. })
        ));
    }

    #[test]
    fn find_by_matches_field_not_key() {
        let mut store = store();
        insert(&mut store, 99, 1);
        insert(&mut store, 2, 99);

        let addr = FieldAddress::resolve(store.model(), "ExternalKey").unwrap();
        let row = store.find_by(&addr, &Value::Int32(99)).unwrap();

        assert_eq!(row.id(), 2);
    }
}
