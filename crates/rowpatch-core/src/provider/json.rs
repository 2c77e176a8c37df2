use crate::{
    model::RecordModel,
    provider::{LoadOptions, ProviderError, StorageProvider},
    store::{RecordStore, Row},
    value::coerce_json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::{fs, path::Path};

///
/// JsonStorageProvider
///
/// Reference on-disk provider. Each record file is one JSON document that
/// carries its own schema next to its rows:
///
/// ```json
/// { "schema": { "name": "Item", "fields": [{ "name": "ID", "type": "int32" }] },
///   "rows": [{ "ID": 1 }] }
/// ```
///
/// Missing scalar fields load as their default; missing array fields load
/// unset. Unknown row keys are rejected.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonStorageProvider {
    pretty: bool,
}

impl JsonStorageProvider {
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn decode(path: &Path, document: StoreDocument) -> Result<RecordStore, ProviderError> {
        let mut store = RecordStore::new(document.schema);

        for (index, mut object) in document.rows.into_iter().enumerate() {
            let mut slots = Vec::with_capacity(store.model().fields().len());

            for field in store.model().fields() {
                let slot = match object.remove(&field.name) {
                    Some(raw) => Some(coerce_json(field.kind, &raw).map_err(|err| {
                        ProviderError::malformed(path, format!("row {index}, field '{}': {err}", field.name))
                    })?),
                    None if field.kind.is_array() => None,
                    None => Some(field.kind.element_type().default_value()),
                };
                slots.push(slot);
            }

            if let Some(unknown) = object.keys().next() {
                return Err(ProviderError::malformed(
                    path,
                    format!("row {index} has unknown field '{unknown}'"),
                ));
            }

            let row = store
                .decode_row(slots)
                .map_err(|err| ProviderError::malformed(path, format!("row {index}: {err}")))?;
            store
                .insert(row)
                .map_err(|err| ProviderError::malformed(path, err))?;
        }

        Ok(store)
    }

    fn encode(store: &RecordStore) -> StoreDocument {
        let rows = store
            .rows()
            .map(|row| encode_row(store.model(), row))
            .collect();

        StoreDocument {
            schema: store.model().clone(),
            rows,
        }
    }
}

fn encode_row(model: &RecordModel, row: &Row) -> Map<String, JsonValue> {
    model
        .fields()
        .iter()
        .zip(row.slots())
        .filter_map(|(field, slot)| {
            slot.as_ref()
                .map(|value| (field.name.clone(), value.to_json()))
        })
        .collect()
}

impl StorageProvider for JsonStorageProvider {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn load(&self, path: &Path, _options: &LoadOptions<'_>) -> Result<RecordStore, ProviderError> {
        let bytes = fs::read(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ProviderError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ProviderError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let document: StoreDocument =
            serde_json::from_slice(&bytes).map_err(|err| ProviderError::malformed(path, err))?;

        Self::decode(path, document)
    }

    fn save(&self, store: &RecordStore, path: &Path) -> Result<(), ProviderError> {
        let io = |source: std::io::Error| ProviderError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io)?;
        }

        let document = Self::encode(store);
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&document)
        } else {
            serde_json::to_vec(&document)
        }
        .map_err(|err| ProviderError::malformed(path, err))?;

        fs::write(path, bytes).map_err(io)
    }
}

///
/// StoreDocument
///

#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct StoreDocument {
    schema: RecordModel,
    #[serde(default)]
    rows: Vec<Map<String, JsonValue>>,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use rowpatch_config::Locale;
    use std::path::PathBuf;

    const OPTIONS: LoadOptions<'static> = LoadOptions {
        build: "9.2.7.45745",
        locale: Locale::EnUs,
    };

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rowpatch-json-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        dir
    }

    fn write(path: &Path, json: &JsonValue) {
        fs::write(path, serde_json::to_vec(json).unwrap()).unwrap();
    }

    #[test]
    fn load_decodes_rows_through_schema() {
        let dir = scratch_dir("load");
        let path = dir.join("Item.json");
        write(
            &path,
            &serde_json::json!({
                "schema": {
                    "name": "Item",
                    "fields": [
                        { "name": "ID", "type": "uint32" },
                        { "name": "Name", "type": "text" },
                        { "name": "Flags", "type": "int16", "len": 2 }
                    ]
                },
                "rows": [
                    { "ID": 4, "Name": "Sword", "Flags": ["1", -2] },
                    { "ID": 9 }
                ]
            }),
        );

        let store = JsonStorageProvider::new().load(&path, &OPTIONS).unwrap();
        assert_eq!(store.len(), 2);

        let sword = store.get(4).unwrap();
        assert_eq!(sword.get_column("Name").unwrap(), &Value::from("Sword"));
        assert_eq!(sword.get_column("Flags1").unwrap(), &Value::Int16(-2));

        let bare = store.get(9).unwrap();
        assert_eq!(bare.get_column("Name").unwrap(), &Value::from(""));
        assert!(bare.get_column("Flags0").is_err());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_file_is_not_found() {
        let path = scratch_dir("missing").join("Nope.json");

        assert!(!JsonStorageProvider::new().exists(&path));
        assert!(matches!(
            JsonStorageProvider::new().load(&path, &OPTIONS),
            Err(ProviderError::NotFound { .. })
        ));
    }

    #[test]
    fn unknown_row_keys_are_malformed() {
        let dir = scratch_dir("unknown");
        let path = dir.join("Item.json");
        write(
            &path,
            &serde_json::json!({
                "schema": { "name": "Item", "fields": [{ "name": "ID", "type": "int32" }] },
                "rows": [{ "ID": 1, "Typo": 2 }]
            }),
        );

        let err = JsonStorageProvider::new().load(&path, &OPTIONS).unwrap_err();
        assert!(err.to_string().contains("unknown field 'Typo'"));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn save_then_load_preserves_store() {
        let dir = scratch_dir("save");
        let path = dir.join("nested").join("Item.json");

        let mut store = RecordStore::new(
            RecordModel::new(
                "Item",
                vec![
                    crate::model::FieldModel::scalar("ID", crate::value::ScalarType::Int32),
                    crate::model::FieldModel::scalar("Cost", crate::value::ScalarType::Float32),
                ],
            )
            .unwrap(),
        );
        let mut row = store.construct_row(3).unwrap();
        row.set_column("Cost", Value::Float32(1.5)).unwrap();
        store.insert(row).unwrap();

        let provider = JsonStorageProvider::new().pretty(true);
        provider.save(&store, &path).unwrap();

        assert_eq!(provider.load(&path, &OPTIONS).unwrap(), store);

        fs::remove_dir_all(dir).unwrap();
    }
}
