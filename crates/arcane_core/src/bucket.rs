use serde::{Deserialize, Serialize};

/// Inventory pages hold this many slots each.
pub const SLOTS_PER_BUCKET: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BucketPosition {
    pub bucket: usize,
    pub position: usize,
}

impl BucketPosition {
    pub fn from_slot(slot: usize) -> Self {
        Self {
            bucket: bucket(slot),
            position: position(slot),
        }
    }
}

/// 1-based inventory page containing `slot`.
pub fn bucket(slot: usize) -> usize {
    slot / SLOTS_PER_BUCKET + 1
}

/// 1-based offset of `slot` within its page.
pub fn position(slot: usize) -> usize {
    slot % SLOTS_PER_BUCKET + 1
}
