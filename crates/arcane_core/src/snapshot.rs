//! Exported game-state documents and the per-character key lookup.
//!
//! A snapshot is one JSON object. Each character's data lives under two
//! keys built from its 0-based index: `InventoryOrder_<n>` holds the slot
//! order as an array of item ids, and `IMm_<n>` holds a JSON *string* that
//! decodes to a map from slot number to that slot's stat record. Some exports
//! encode the records as an array instead, indexed by slot.

use std::error::Error;
use std::fmt;

use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::debug;

use crate::stats::{StatRecord, is_truthy};

pub const INVENTORY_KEY_PREFIX: &str = "InventoryOrder_";
pub const STATS_KEY_PREFIX: &str = "IMm_";

pub type StatsMap = JsonMap<String, JsonValue>;

#[derive(Debug)]
pub enum SnapshotError {
    Empty,
    Parse(serde_json::Error),
    NotAnObject,
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("snapshot text is empty"),
            Self::Parse(e) => write!(f, "snapshot is not valid JSON: {e}"),
            Self::NotAnObject => f.write_str("snapshot JSON must be an object"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

/// Raised when a slot lookup is attempted against stats that decoded to a
/// bare scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsShapeError {
    pub stats_key: String,
    pub found: &'static str,
}

impl fmt::Display for StatsShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} decoded to a {}, cannot look up slot records in it",
            self.stats_key, self.found
        )
    }
}

impl Error for StatsShapeError {}

/// Decoded `IMm_<n>` contents.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotStats {
    /// Records keyed by decimal slot number.
    Records(StatsMap),
    Scalar { stats_key: String, value: JsonValue },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    root: JsonMap<String, JsonValue>,
}

/// Raw structures for one character, as found in the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterData<'a> {
    pub inventory: &'a [JsonValue],
    pub stats: SlotStats,
}

impl CharacterData<'_> {
    /// Stat record for `slot`. Fails only when the stats decoded to a scalar.
    pub fn slot_stats(&self, slot: usize) -> Result<Option<&StatRecord>, StatsShapeError> {
        match &self.stats {
            SlotStats::Records(map) => {
                Ok(map.get(&slot.to_string()).and_then(JsonValue::as_object))
            }
            SlotStats::Scalar { stats_key, value } => Err(StatsShapeError {
                stats_key: stats_key.clone(),
                found: json_kind(value),
            }),
        }
    }
}

impl Snapshot {
    pub fn parse(text: &str) -> Result<Self, SnapshotError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SnapshotError::Empty);
        }
        let value: JsonValue = serde_json::from_str(text).map_err(SnapshotError::Parse)?;
        Self::from_value(value)
    }

    pub fn from_value(value: JsonValue) -> Result<Self, SnapshotError> {
        match value {
            JsonValue::Object(root) => Ok(Self { root }),
            _ => Err(SnapshotError::NotAnObject),
        }
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.root.get(key)
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Sorted names of every top-level key starting with `prefix`.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .root
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Looks up both per-character keys. `None` means the character slot is
    /// unused or its stats could not be decoded. Stats decoding to `null` also
    /// count as no data.
    pub fn character_data(&self, character_index: usize) -> Option<CharacterData<'_>> {
        let inventory_key = inventory_key(character_index);
        let stats_key = stats_key(character_index);

        let inventory = self.get(&inventory_key).filter(|v| is_truthy(v));
        let stats = self.get(&stats_key).filter(|v| is_truthy(v));
        debug!(
            inventory_key = %inventory_key,
            stats_key = %stats_key,
            has_inventory = inventory.is_some(),
            has_stats = stats.is_some(),
            "looking up character data"
        );
        let (Some(inventory), Some(stats)) = (inventory, stats) else {
            return None;
        };

        let Some(inventory) = inventory.as_array() else {
            debug!(key = %inventory_key, "inventory value is not an array");
            return None;
        };
        let Some(encoded) = stats.as_str() else {
            debug!(key = %stats_key, "stats value is not a JSON string");
            return None;
        };

        let stats = match serde_json::from_str::<JsonValue>(encoded) {
            Ok(JsonValue::Object(map)) => SlotStats::Records(map),
            Ok(JsonValue::Array(records)) => SlotStats::Records(
                records
                    .into_iter()
                    .enumerate()
                    .map(|(slot, record)| (slot.to_string(), record))
                    .collect(),
            ),
            Ok(JsonValue::Null) => {
                debug!(key = %stats_key, "decoded stats are null");
                return None;
            }
            Ok(value) => {
                debug!(key = %stats_key, kind = json_kind(&value), "decoded stats are a scalar");
                SlotStats::Scalar { stats_key, value }
            }
            Err(e) => {
                debug!(key = %stats_key, error = %e, "failed to decode nested stats");
                return None;
            }
        };
        debug!(slots = inventory.len(), "character data decoded");

        Some(CharacterData {
            inventory: inventory.as_slice(),
            stats,
        })
    }
}

pub fn inventory_key(character_index: usize) -> String {
    format!("{INVENTORY_KEY_PREFIX}{character_index}")
}

pub fn stats_key(character_index: usize) -> String {
    format!("{STATS_KEY_PREFIX}{character_index}")
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn snapshot(value: JsonValue) -> Snapshot {
        Snapshot::from_value(value).expect("fixture should be an object")
    }

    #[test]
    fn parse_rejects_blank_and_non_object_text() {
        assert!(matches!(Snapshot::parse("   "), Err(SnapshotError::Empty)));
        assert!(matches!(Snapshot::parse("{"), Err(SnapshotError::Parse(_))));
        assert!(matches!(
            Snapshot::parse("[1, 2]"),
            Err(SnapshotError::NotAnObject)
        ));
    }

    #[test]
    fn character_data_decodes_nested_stats() {
        let snap = snapshot(json!({
            "InventoryOrder_0": ["Foo", "EquipmentWandsArc0"],
            "IMm_0": "{\"1\":{\"Weapon_Power\":42}}",
        }));
        let data = snap.character_data(0).expect("character 0 should resolve");
        assert_eq!(data.inventory.len(), 2);
        let record = data.slot_stats(1).expect("records decoded");
        assert_eq!(record.and_then(|s| s.get("Weapon_Power")), Some(&json!(42)));
        assert_eq!(data.slot_stats(0), Ok(None));
    }

    #[test]
    fn array_stats_are_indexed_by_slot() {
        let snap = snapshot(json!({
            "InventoryOrder_0": ["EquipmentWandsArc0", "Foo"],
            "IMm_0": "[{\"Weapon_Power\":5}, 3]",
        }));
        let data = snap.character_data(0).expect("character 0 should resolve");
        let record = data.slot_stats(0).expect("records decoded");
        assert_eq!(record.and_then(|s| s.get("Weapon_Power")), Some(&json!(5)));
        assert_eq!(data.slot_stats(1), Ok(None));
        assert_eq!(data.slot_stats(2), Ok(None));
    }

    #[test]
    fn scalar_stats_fail_slot_lookups() {
        let snap = snapshot(json!({
            "InventoryOrder_0": ["EquipmentWandsArc0"],
            "IMm_0": "42",
        }));
        let data = snap.character_data(0).expect("scalar stats still resolve");
        let err = data.slot_stats(0).expect_err("scalar has no slots");
        assert_eq!(err.stats_key, "IMm_0");
        assert_eq!(err.found, "number");
        assert_eq!(
            err.to_string(),
            "IMm_0 decoded to a number, cannot look up slot records in it"
        );
    }

    #[test]
    fn missing_or_falsy_keys_yield_no_data() {
        let snap = snapshot(json!({
            "InventoryOrder_0": ["EquipmentWandsArc0"],
            "InventoryOrder_1": ["EquipmentWandsArc0"],
            "IMm_1": "",
        }));
        assert!(snap.character_data(0).is_none());
        assert!(snap.character_data(1).is_none());
        assert!(snap.character_data(2).is_none());
    }

    #[test]
    fn undecodable_stats_yield_no_data() {
        let snap = snapshot(json!({
            "InventoryOrder_0": ["EquipmentWandsArc0"],
            "IMm_0": "{not json",
            "InventoryOrder_1": ["EquipmentWandsArc0"],
            "IMm_1": "null",
            "InventoryOrder_2": "EquipmentWandsArc0",
            "IMm_2": "{}",
        }));
        assert!(snap.character_data(0).is_none());
        assert!(snap.character_data(1).is_none());
        assert!(snap.character_data(2).is_none());
    }

    #[test]
    fn keys_with_prefix_are_sorted() {
        let snap = snapshot(json!({
            "IMm_3": "{}",
            "InventoryOrder_1": [],
            "IMm_0": "{}",
            "OptLacc": [],
        }));
        assert_eq!(snap.keys_with_prefix(STATS_KEY_PREFIX), vec!["IMm_0", "IMm_3"]);
        assert_eq!(
            snap.keys_with_prefix(INVENTORY_KEY_PREFIX),
            vec!["InventoryOrder_1"]
        );
    }
}
