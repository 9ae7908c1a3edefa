use std::cmp::Ordering;

use crate::bucket::BucketPosition;
use crate::stats::{self, StatRecord};

use super::types::{ItemRecord, RingRow, RingStat, WandRow};

pub fn project_wand(item: &ItemRecord) -> WandRow {
    let place = BucketPosition::from_slot(item.slot);
    let s = &item.stats;
    WandRow {
        character: character_label(item.character_index),
        bucket: place.bucket,
        position: place.position,
        slot: item.slot,
        item_type: item.item_id.clone(),
        weapon_power: stats::number_or_zero(s, stats::WEAPON_POWER),
        uq1_val: stats::number_or_zero(s, stats::UQ1_VAL),
        uq2_val: stats::number_or_zero(s, stats::UQ2_VAL),
        uq1_txt: stats::text_or_unknown(s, stats::UQ1_TXT),
        uq2_txt: stats::text_or_unknown(s, stats::UQ2_TXT),
        wis: stats::number_or_zero(s, stats::WIS),
        upgrades: upgrades(s),
    }
}

pub fn project_ring(item: &ItemRecord) -> RingRow {
    let place = BucketPosition::from_slot(item.slot);
    let s = &item.stats;
    RingRow {
        character: character_label(item.character_index),
        bucket: place.bucket,
        position: place.position,
        slot: item.slot,
        item_type: item.item_id.clone(),
        uq1_val: stats::number_or_zero(s, stats::UQ1_VAL),
        uq2_val: stats::number_or_zero(s, stats::UQ2_VAL),
        uq1_txt: stats::text_or_unknown(s, stats::UQ1_TXT),
        uq2_txt: stats::text_or_unknown(s, stats::UQ2_TXT),
        wis: stats::number_or_zero(s, stats::WIS),
        defence: stats::number_or_zero(s, stats::DEFENCE),
        upgrades: upgrades(s),
    }
}

/// Best `top_n` wands by weapon power. Equal powers keep slot order.
pub fn top_wands(items: &[ItemRecord], top_n: usize) -> Vec<WandRow> {
    let rows: Vec<WandRow> = items.iter().map(project_wand).collect();
    rank_descending(rows, top_n, |row| row.weapon_power)
}

/// Best `top_n` rings by the chosen unique stat. Equal values keep slot order.
pub fn top_rings(items: &[ItemRecord], stat: RingStat, top_n: usize) -> Vec<RingRow> {
    let rows: Vec<RingRow> = items.iter().map(project_ring).collect();
    rank_descending(rows, top_n, |row| row.stat_value(stat))
}

fn rank_descending<T>(mut rows: Vec<T>, top_n: usize, key: impl Fn(&T) -> f64) -> Vec<T> {
    // sort_by is stable
    rows.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
    rows.truncate(top_n);
    rows
}

fn character_label(character_index: usize) -> String {
    format!("Character_{character_index}")
}

fn upgrades(s: &StatRecord) -> f64 {
    stats::number_or_zero(s, stats::UPGRADE_SLOTS_LEFT).abs()
}

#[cfg(test)]
mod tests {
    use serde_json::{Value as JsonValue, json};

    use super::*;

    fn item(slot: usize, stats: JsonValue) -> ItemRecord {
        let JsonValue::Object(stats) = stats else {
            panic!("stats fixture must be an object");
        };
        ItemRecord {
            character_index: 2,
            slot,
            item_id: "EquipmentRingsArc0".to_string(),
            stats,
        }
    }

    #[test]
    fn wand_projection_applies_defaults() {
        let row = project_wand(&item(
            33,
            json!({ "Weapon_Power": 17, "UQ1txt": "% DMG", "Upgrade_Slots_Left": -3 }),
        ));
        assert_eq!(row.character, "Character_2");
        assert_eq!((row.bucket, row.position), (3, 2));
        assert_eq!(row.weapon_power, 17.0);
        assert_eq!(row.uq1_txt, "% DMG");
        assert_eq!(row.uq2_txt, "Unknown");
        assert_eq!(row.uq1_val, 0.0);
        assert_eq!(row.wis, 0.0);
        assert_eq!(row.upgrades, 3.0);
    }

    #[test]
    fn ring_projection_carries_defence() {
        let row = project_ring(&item(0, json!({ "UQ1val": 4, "Defence": 12 })));
        assert_eq!(row.defence, 12.0);
        assert_eq!(row.uq2_val, 0.0);
        assert_eq!(row.upgrades, 0.0);
    }

    #[test]
    fn ranking_is_stable_and_truncated() {
        let items = vec![
            item(0, json!({ "UQ1val": 5, "UQ2val": 1 })),
            item(1, json!({ "UQ1val": 9, "UQ2val": 1 })),
            item(2, json!({ "UQ1val": 5, "UQ2val": 8 })),
            item(3, json!({ "UQ1val": 1 })),
        ];

        let by_uq1: Vec<usize> = top_rings(&items, RingStat::Uq1, 3)
            .iter()
            .map(|r| r.slot)
            .collect();
        assert_eq!(by_uq1, vec![1, 0, 2]);

        let by_uq2: Vec<usize> = top_rings(&items, RingStat::Uq2, 10)
            .iter()
            .map(|r| r.slot)
            .collect();
        assert_eq!(by_uq2, vec![2, 0, 1, 3]);
    }

    #[test]
    fn empty_input_ranks_to_empty_list() {
        assert!(top_wands(&[], 5).is_empty());
        assert!(top_rings(&[], RingStat::Uq2, 5).is_empty());
    }
}
