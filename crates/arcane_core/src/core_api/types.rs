use serde::{Deserialize, Serialize};

use crate::stats::{self, StatRecord};

use super::error::{CoreError, CoreErrorCode};

pub const DEFAULT_TOP_N: usize = 5;

/// 1-based character number as shown in game, 1 through 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct PlayerNumber(u8);

impl PlayerNumber {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: i64) -> Result<Self, CoreError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(invalid_player_number(&value.to_string()))
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let value = trimmed
            .parse::<i64>()
            .map_err(|_| invalid_player_number(trimmed))?;
        Self::new(value)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn character_index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<i64> for PlayerNumber {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlayerNumber> for u8 {
    fn from(value: PlayerNumber) -> Self {
        value.0
    }
}

fn invalid_player_number(raw: &str) -> CoreError {
    let shown = if raw.is_empty() { "<empty>" } else { raw };
    CoreError::new(
        CoreErrorCode::InvalidPlayerNumber,
        format!(
            "invalid character number '{shown}', expected a whole number between {} and {}",
            PlayerNumber::MIN,
            PlayerNumber::MAX
        ),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisOptions {
    pub top_n: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArcaneCategory {
    Wand,
    Ring,
}

impl ArcaneCategory {
    pub const WAND_ITEM_ID: &'static str = "EquipmentWandsArc0";
    pub const RING_ITEM_ID: &'static str = "EquipmentRingsArc0";

    pub fn item_id(&self) -> &'static str {
        match *self {
            Self::Wand => Self::WAND_ITEM_ID,
            Self::Ring => Self::RING_ITEM_ID,
        }
    }

    pub fn plural(&self) -> &'static str {
        match *self {
            Self::Wand => "wands",
            Self::Ring => "rings",
        }
    }

    /// Whether a slot's stat record carries the fields that define this
    /// category.
    pub fn qualifies(&self, record: &StatRecord) -> bool {
        match *self {
            Self::Wand => stats::has_field(record, stats::WEAPON_POWER),
            Self::Ring => {
                stats::has_field(record, stats::UQ1_VAL) || stats::has_field(record, stats::UQ2_VAL)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RingStat {
    Uq1,
    Uq2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRecord {
    pub character_index: usize,
    pub slot: usize,
    pub item_id: String,
    pub stats: StatRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WandRow {
    pub character: String,
    pub bucket: usize,
    pub position: usize,
    pub slot: usize,
    pub item_type: String,
    pub weapon_power: f64,
    pub uq1_val: f64,
    pub uq2_val: f64,
    pub uq1_txt: String,
    pub uq2_txt: String,
    pub wis: f64,
    pub upgrades: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingRow {
    pub character: String,
    pub bucket: usize,
    pub position: usize,
    pub slot: usize,
    pub item_type: String,
    pub uq1_val: f64,
    pub uq2_val: f64,
    pub uq1_txt: String,
    pub uq2_txt: String,
    pub wis: f64,
    pub defence: f64,
    pub upgrades: f64,
}

impl RingRow {
    pub fn stat_value(&self, stat: RingStat) -> f64 {
        match stat {
            RingStat::Uq1 => self.uq1_val,
            RingStat::Uq2 => self.uq2_val,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionSummary {
    /// Slots whose item id matched the category literal.
    pub literal_matches: usize,
    /// Of those, slots with a qualifying stat record.
    pub with_valid_stats: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookupDiagnostics {
    pub character_index: usize,
    pub inventory_key: String,
    pub stats_key: String,
    pub available_inventory_keys: Vec<String>,
    pub available_stats_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub player_number: PlayerNumber,
    pub character_index: usize,
    pub wand_summary: ExtractionSummary,
    pub ring_summary: ExtractionSummary,
    pub top_wands: Vec<WandRow>,
    pub top_rings_by_uq1: Vec<RingRow>,
    pub top_rings_by_uq2: Vec<RingRow>,
}

impl AnalysisReport {
    pub fn total_wands(&self) -> usize {
        self.wand_summary.with_valid_stats
    }

    pub fn total_rings(&self) -> usize {
        self.ring_summary.with_valid_stats
    }

    pub fn top_rings(&self, stat: RingStat) -> &[RingRow] {
        match stat {
            RingStat::Uq1 => &self.top_rings_by_uq1,
            RingStat::Uq2 => &self.top_rings_by_uq2,
        }
    }

    pub fn summary_message(&self) -> String {
        format!(
            "Found {} Arcane wands and {} Arcane rings for Character {}!",
            self.total_wands(),
            self.total_rings(),
            self.player_number.get()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_number_accepts_range_bounds() {
        assert_eq!(PlayerNumber::parse("1").expect("1 is valid").character_index(), 0);
        assert_eq!(PlayerNumber::parse(" 10 ").expect("10 is valid").character_index(), 9);
    }

    #[test]
    fn player_number_rejects_out_of_range_and_non_numeric() {
        for raw in ["0", "11", "-3", "", "two", "2.5", "3abc"] {
            let err = PlayerNumber::parse(raw).expect_err("value should be rejected");
            assert_eq!(err.code, CoreErrorCode::InvalidPlayerNumber, "input {raw:?}");
        }
    }

    #[test]
    fn player_number_serde_validates() {
        let parsed: PlayerNumber = serde_json::from_str("4").expect("4 should deserialize");
        assert_eq!(parsed.get(), 4);
        assert!(serde_json::from_str::<PlayerNumber>("12").is_err());
        assert_eq!(serde_json::to_string(&parsed).expect("serialize"), "4");
    }
}
