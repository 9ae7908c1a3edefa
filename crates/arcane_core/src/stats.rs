//! Field access for per-slot stat records.
//!
//! Exported records mix numbers and strings. Both accessors treat any falsy
//! value as missing, so a stat of `0` and an absent stat read the same.

use serde_json::{Map as JsonMap, Value as JsonValue};

pub type StatRecord = JsonMap<String, JsonValue>;

pub const WEAPON_POWER: &str = "Weapon_Power";
pub const UQ1_VAL: &str = "UQ1val";
pub const UQ2_VAL: &str = "UQ2val";
pub const UQ1_TXT: &str = "UQ1txt";
pub const UQ2_TXT: &str = "UQ2txt";
pub const WIS: &str = "WIS";
pub const DEFENCE: &str = "Defence";
pub const UPGRADE_SLOTS_LEFT: &str = "Upgrade_Slots_Left";

pub const UNKNOWN_TEXT: &str = "Unknown";

/// Presence check only; a key holding `null` still counts.
pub fn has_field(stats: &StatRecord, name: &str) -> bool {
    stats.contains_key(name)
}

pub fn number_or_zero(stats: &StatRecord, name: &str) -> f64 {
    let value = match stats.get(name) {
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(JsonValue::String(s)) => coerce_numeric_text(s),
        Some(JsonValue::Bool(true)) => 1.0,
        _ => 0.0,
    };
    // folds -0.0 into 0.0
    if value == 0.0 { 0.0 } else { value }
}

pub fn text_or_unknown(stats: &StatRecord, name: &str) -> String {
    match stats.get(name) {
        Some(value) if is_truthy(value) => match value {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        },
        _ => UNKNOWN_TEXT.to_string(),
    }
}

pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

fn coerce_numeric_text(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: JsonValue) -> StatRecord {
        match value {
            JsonValue::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn numbers_default_to_zero_when_missing_or_falsy() {
        let stats = record(json!({
            "Weapon_Power": 42,
            "WIS": null,
            "Defence": "",
            "UQ1val": false,
            "UQ2val": -0.0,
        }));
        assert_eq!(number_or_zero(&stats, WEAPON_POWER), 42.0);
        assert_eq!(number_or_zero(&stats, WIS), 0.0);
        assert_eq!(number_or_zero(&stats, DEFENCE), 0.0);
        assert_eq!(number_or_zero(&stats, UQ1_VAL), 0.0);
        assert!(number_or_zero(&stats, UQ2_VAL).is_sign_positive());
        assert_eq!(number_or_zero(&stats, UPGRADE_SLOTS_LEFT), 0.0);
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let stats = record(json!({ "UQ1val": " 12.5 ", "UQ2val": "lots", "WIS": "NaN" }));
        assert_eq!(number_or_zero(&stats, UQ1_VAL), 12.5);
        assert_eq!(number_or_zero(&stats, UQ2_VAL), 0.0);
        assert_eq!(number_or_zero(&stats, WIS), 0.0);
    }

    #[test]
    fn text_defaults_to_unknown_when_missing_or_falsy() {
        let stats = record(json!({ "UQ1txt": "% ALL STATS", "UQ2txt": "", "WIS": 0 }));
        assert_eq!(text_or_unknown(&stats, UQ1_TXT), "% ALL STATS");
        assert_eq!(text_or_unknown(&stats, UQ2_TXT), UNKNOWN_TEXT);
        assert_eq!(text_or_unknown(&stats, WIS), UNKNOWN_TEXT);
        assert_eq!(text_or_unknown(&stats, DEFENCE), UNKNOWN_TEXT);
    }

    #[test]
    fn null_counts_as_present() {
        let stats = record(json!({ "Weapon_Power": null }));
        assert!(has_field(&stats, WEAPON_POWER));
        assert!(!has_field(&stats, UQ1_VAL));
    }
}
