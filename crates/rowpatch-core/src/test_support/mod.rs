use crate::{
    engine::Patcher,
    model::{FieldModel, RecordModel},
    provider::{LoadOptions, MemoryStorageProvider},
    store::RecordStore,
    value::{ScalarType, Value},
};
use rowpatch_config::{DEFAULT_BUILD, Locale, PatcherConfig};

/// Load options every fixture store is read with.
pub const OPTIONS: LoadOptions<'static> = LoadOptions {
    build: DEFAULT_BUILD,
    locale: Locale::EnUs,
};

pub const INPUT_DIR: &str = "in";
pub const OUTPUT_DIR: &str = "out";

/// `Item`: ID, Name, Quality, ExternalKey, Flags[4], Cost2, Effects[2].
///
/// `Cost2` is a scalar whose name ends in a digit; `Effects` is only
/// initialized on record 1.
#[must_use]
pub fn item_model() -> RecordModel {
    RecordModel::new(
        "Item",
        vec![
            FieldModel::scalar("ID", ScalarType::Int32),
            FieldModel::scalar("Name", ScalarType::Text),
            FieldModel::scalar("Quality", ScalarType::Uint8),
            FieldModel::scalar("ExternalKey", ScalarType::Int32),
            FieldModel::array("Flags", ScalarType::Int32, 4),
            FieldModel::scalar("Cost2", ScalarType::Uint16),
            FieldModel::array("Effects", ScalarType::Int32, 2),
        ],
    )
    .expect("item model")
}

#[must_use]
pub fn item_store() -> RecordStore {
    let mut store = RecordStore::new(item_model());

    for (id, name, key, effects) in [
        (1, "Sword", 99, Some([1, 2])),
        (41, "Shield", 7, None),
        (99, "Helm", 1, None),
    ] {
        let slots = vec![
            Some(Value::Int32(id)),
            Some(Value::from(name)),
            Some(Value::Uint8(2)),
            Some(Value::Int32(key)),
            Some(Value::from(vec![0_i32; 4])),
            Some(Value::Uint16(10)),
            effects.map(|e| Value::from(e.to_vec())),
        ];
        let row = store.decode_row(slots).expect("item row");
        store.insert(row).expect("insert item");
    }

    store
}

/// `Spell`: ID (uint32), Name, IconId; records 2, 5 and 7.
#[must_use]
pub fn spell_store() -> RecordStore {
    let model = RecordModel::new(
        "Spell",
        vec![
            FieldModel::scalar("ID", ScalarType::Uint32),
            FieldModel::scalar("Name", ScalarType::Text),
            FieldModel::scalar("IconId", ScalarType::Int32),
        ],
    )
    .expect("spell model");
    let mut store = RecordStore::new(model);

    for (id, name) in [(2, "Fireball"), (5, "Frostbolt"), (7, "Blink")] {
        let mut row = store.construct_row(id).expect("spell row");
        row.set_column("Name", Value::from(name)).expect("spell name");
        store.insert(row).expect("insert spell");
    }

    store
}

/// `ItemEffect`: ID, ItemID, Amount (float32), Slots[2]; no records.
#[must_use]
pub fn item_effect_store() -> RecordStore {
    RecordStore::new(
        RecordModel::new(
            "ItemEffect",
            vec![
                FieldModel::scalar("ID", ScalarType::Int32),
                FieldModel::scalar("ItemID", ScalarType::Int32),
                FieldModel::scalar("Amount", ScalarType::Float32),
                FieldModel::array("Slots", ScalarType::Int16, 2),
            ],
        )
        .expect("item effect model"),
    )
}

/// Provider holding every fixture store under `in/`.
#[must_use]
pub fn fixture_provider() -> MemoryStorageProvider {
    MemoryStorageProvider::new()
        .with_store("in/Item.db2", item_store())
        .with_store("in/Spell.db2", spell_store())
        .with_store("in/ItemEffect.db2", item_effect_store())
}

#[must_use]
pub fn patcher(provider: MemoryStorageProvider) -> Patcher<MemoryStorageProvider> {
    Patcher::new(PatcherConfig::new(INPUT_DIR, OUTPUT_DIR), provider)
}
