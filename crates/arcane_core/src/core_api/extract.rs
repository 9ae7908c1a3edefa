use tracing::debug;

use crate::snapshot::{CharacterData, StatsShapeError};

use super::types::{ArcaneCategory, ExtractionSummary, ItemRecord};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub items: Vec<ItemRecord>,
    pub summary: ExtractionSummary,
}

/// Scans the inventory in slot order for `category`'s item id and pairs each
/// hit with its stat record. Hits without a qualifying record are counted
/// but not returned. A hit against stats that decoded to a scalar is an error.
pub fn extract_items(
    character_index: usize,
    data: &CharacterData<'_>,
    category: ArcaneCategory,
) -> Result<Extraction, StatsShapeError> {
    let target = category.item_id();
    let mut out = Extraction::default();

    for (slot, item) in data.inventory.iter().enumerate() {
        if item.as_str() != Some(target) {
            continue;
        }
        out.summary.literal_matches += 1;

        let Some(record) = data.slot_stats(slot)? else {
            debug!(slot, item_id = target, "matching slot has no stat record");
            continue;
        };
        if !category.qualifies(record) {
            debug!(slot, item_id = target, "matching slot lacks category stats");
            continue;
        }

        out.items.push(ItemRecord {
            character_index,
            slot,
            item_id: target.to_string(),
            stats: record.clone(),
        });
    }
    out.summary.with_valid_stats = out.items.len();

    debug!(
        category = category.plural(),
        literal_matches = out.summary.literal_matches,
        with_valid_stats = out.summary.with_valid_stats,
        "inventory scan finished"
    );
    Ok(out)
}
