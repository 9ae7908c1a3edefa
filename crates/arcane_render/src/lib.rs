use std::fmt::Write as _;

use arcane_core::core_api::{AnalysisReport, CoreError, LookupDiagnostics, RingRow, WandRow};
use serde_json::{Map as JsonMap, Value as JsonValue};

const RANK_WIDTH: usize = 4;
const CHARACTER_WIDTH: usize = 13;
const BUCKET_WIDTH: usize = 6;
const POSITION_WIDTH: usize = 8;
const NUMBER_WIDTH: usize = 8;
const UNIQUE_STAT_WIDTH: usize = 24;

pub const NO_WANDS_MESSAGE: &str = "No Arcane wands found.";
pub const NO_RINGS_MESSAGE: &str = "No Arcane rings found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// Adds the per-category scan counts below the tables.
    pub verbose: bool,
}

pub fn render_json(report: &AnalysisReport, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(canonical_json(report)),
    }
}

pub fn render_error_json(err: &CoreError) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert(
        "code".to_string(),
        JsonValue::String(err.code.as_str().to_string()),
    );
    out.insert("message".to_string(), JsonValue::String(err.message.clone()));
    if let Some(diagnostics) = &err.diagnostics {
        out.insert("diagnostics".to_string(), diagnostics_to_json(diagnostics));
    }
    JsonValue::Object(out)
}

pub fn render_text(report: &AnalysisReport) -> String {
    render_text_with_options(report, TextRenderOptions::default())
}

pub fn render_text_with_options(report: &AnalysisReport, options: TextRenderOptions) -> String {
    let mut out = String::new();

    writeln!(&mut out, "{}", report.summary_message()).expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    writeln!(&mut out, " ::: Top Arcane Wands by Weapon Power :::")
        .expect("writing to String cannot fail");
    write_wands_text(&mut out, &report.top_wands);
    writeln!(&mut out).expect("writing to String cannot fail");

    writeln!(&mut out, " ::: Top Arcane Rings by Unique Stat 1 :::")
        .expect("writing to String cannot fail");
    write_rings_text(&mut out, &report.top_rings_by_uq1);
    writeln!(&mut out).expect("writing to String cannot fail");

    writeln!(&mut out, " ::: Top Arcane Rings by Unique Stat 2 :::")
        .expect("writing to String cannot fail");
    write_rings_text(&mut out, &report.top_rings_by_uq2);

    if options.verbose {
        writeln!(&mut out).expect("writing to String cannot fail");
        writeln!(
            &mut out,
            "Scanned wands: {} matching slots, {} with stats",
            report.wand_summary.literal_matches, report.wand_summary.with_valid_stats
        )
        .expect("writing to String cannot fail");
        writeln!(
            &mut out,
            "Scanned rings: {} matching slots, {} with stats",
            report.ring_summary.literal_matches, report.ring_summary.with_valid_stats
        )
        .expect("writing to String cannot fail");
    }

    out
}

/// Plain text for a failed run, including the key listing when the run
/// found nothing.
pub fn render_error_text(err: &CoreError) -> String {
    let mut out = String::new();
    writeln!(&mut out, "Error: {}", err.message).expect("writing to String cannot fail");
    if let Some(d) = &err.diagnostics {
        writeln!(&mut out).expect("writing to String cannot fail");
        writeln!(&mut out, "Debug Information:").expect("writing to String cannot fail");
        writeln!(
            &mut out,
            "  Character ID: {} (from player {})",
            d.character_index,
            d.character_index + 1
        )
        .expect("writing to String cannot fail");
        writeln!(
            &mut out,
            "  Looking for: {} and {}",
            d.inventory_key, d.stats_key
        )
        .expect("writing to String cannot fail");
        writeln!(
            &mut out,
            "  Available inventory keys: {}",
            join_or_none(&d.available_inventory_keys)
        )
        .expect("writing to String cannot fail");
        writeln!(
            &mut out,
            "  Available stats keys: {}",
            join_or_none(&d.available_stats_keys)
        )
        .expect("writing to String cannot fail");
    }
    out
}

/// HTML fragment with the three result tables, for the browser page.
pub fn render_html(report: &AnalysisReport) -> String {
    let mut html = String::new();
    html.push_str("<h2>Top Arcane Wands by Weapon Power</h2>");
    html.push_str("<div id=\"wandsTable\">");
    html.push_str(&render_wands_html(&report.top_wands));
    html.push_str("</div>");
    html.push_str("<h2>Top Arcane Rings by Unique Stat 1</h2>");
    html.push_str("<div id=\"ringsStat1Table\">");
    html.push_str(&render_rings_html(&report.top_rings_by_uq1));
    html.push_str("</div>");
    html.push_str("<h2>Top Arcane Rings by Unique Stat 2</h2>");
    html.push_str("<div id=\"ringsStat2Table\">");
    html.push_str(&render_rings_html(&report.top_rings_by_uq2));
    html.push_str("</div>");
    html
}

pub fn render_wands_html(wands: &[WandRow]) -> String {
    if wands.is_empty() {
        return empty_table_html(NO_WANDS_MESSAGE);
    }

    let mut html = table_head_html(&[
        "Rank",
        "Character",
        "Bucket<br>(Page)",
        "Position<br>(1-16)",
        "Weapon<br>Power",
        "Unique Stat 1",
        "Unique Stat 2",
        "WIS",
        "Upgrades",
    ]);
    for (index, wand) in wands.iter().enumerate() {
        push_row_html(
            &mut html,
            index,
            &[
                escape_html(&wand.character),
                wand.bucket.to_string(),
                wand.position.to_string(),
                format!("<strong>{}</strong>", format_stat(wand.weapon_power)),
                unique_stat_html(wand.uq1_val, &wand.uq1_txt),
                unique_stat_html(wand.uq2_val, &wand.uq2_txt),
                format_stat(wand.wis),
                format_stat(wand.upgrades),
            ],
        );
    }
    html.push_str("</tbody></table>");
    html
}

pub fn render_rings_html(rings: &[RingRow]) -> String {
    if rings.is_empty() {
        return empty_table_html(NO_RINGS_MESSAGE);
    }

    let mut html = table_head_html(&[
        "Rank",
        "Character",
        "Bucket<br>(Page)",
        "Position<br>(1-16)",
        "Unique Stat 1",
        "Unique Stat 2",
        "WIS",
        "Defence",
        "Upgrades",
    ]);
    for (index, ring) in rings.iter().enumerate() {
        push_row_html(
            &mut html,
            index,
            &[
                escape_html(&ring.character),
                ring.bucket.to_string(),
                ring.position.to_string(),
                unique_stat_html(ring.uq1_val, &ring.uq1_txt),
                unique_stat_html(ring.uq2_val, &ring.uq2_txt),
                format_stat(ring.wis),
                format_stat(ring.defence),
                format_stat(ring.upgrades),
            ],
        );
    }
    html.push_str("</tbody></table>");
    html
}

/// Integral values print without a fractional part.
pub fn format_stat(value: f64) -> String {
    format!("{value}")
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn canonical_json(report: &AnalysisReport) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    out.insert(
        "player_number".to_string(),
        JsonValue::from(report.player_number.get()),
    );
    out.insert(
        "character_index".to_string(),
        JsonValue::from(report.character_index),
    );
    out.insert("total_wands".to_string(), JsonValue::from(report.total_wands()));
    out.insert("total_rings".to_string(), JsonValue::from(report.total_rings()));
    out.insert(
        "message".to_string(),
        JsonValue::String(report.summary_message()),
    );
    out.insert(
        "top_wands".to_string(),
        JsonValue::Array(report.top_wands.iter().map(wand_to_json).collect()),
    );
    out.insert(
        "top_rings_by_uq1".to_string(),
        JsonValue::Array(report.top_rings_by_uq1.iter().map(ring_to_json).collect()),
    );
    out.insert(
        "top_rings_by_uq2".to_string(),
        JsonValue::Array(report.top_rings_by_uq2.iter().map(ring_to_json).collect()),
    );
    out
}

fn wand_to_json(w: &WandRow) -> JsonValue {
    let mut out = placement_json(&w.character, w.bucket, w.position, w.slot, &w.item_type);
    out.insert("weapon_power".to_string(), stat_json(w.weapon_power));
    insert_unique_stats(&mut out, w.uq1_val, &w.uq1_txt, w.uq2_val, &w.uq2_txt);
    out.insert("wis".to_string(), stat_json(w.wis));
    out.insert("upgrades".to_string(), stat_json(w.upgrades));
    JsonValue::Object(out)
}

fn ring_to_json(r: &RingRow) -> JsonValue {
    let mut out = placement_json(&r.character, r.bucket, r.position, r.slot, &r.item_type);
    insert_unique_stats(&mut out, r.uq1_val, &r.uq1_txt, r.uq2_val, &r.uq2_txt);
    out.insert("wis".to_string(), stat_json(r.wis));
    out.insert("defence".to_string(), stat_json(r.defence));
    out.insert("upgrades".to_string(), stat_json(r.upgrades));
    JsonValue::Object(out)
}

fn placement_json(
    character: &str,
    bucket: usize,
    position: usize,
    slot: usize,
    item_type: &str,
) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    out.insert(
        "character".to_string(),
        JsonValue::String(character.to_string()),
    );
    out.insert("bucket".to_string(), JsonValue::from(bucket));
    out.insert("position".to_string(), JsonValue::from(position));
    out.insert("slot".to_string(), JsonValue::from(slot));
    out.insert(
        "item_type".to_string(),
        JsonValue::String(item_type.to_string()),
    );
    out
}

fn insert_unique_stats(
    out: &mut JsonMap<String, JsonValue>,
    uq1_val: f64,
    uq1_txt: &str,
    uq2_val: f64,
    uq2_txt: &str,
) {
    out.insert("uq1_val".to_string(), stat_json(uq1_val));
    out.insert("uq1_txt".to_string(), JsonValue::String(uq1_txt.to_string()));
    out.insert("uq2_val".to_string(), stat_json(uq2_val));
    out.insert("uq2_txt".to_string(), JsonValue::String(uq2_txt.to_string()));
}

/// Whole numbers serialize as JSON integers.
fn stat_json(value: f64) -> JsonValue {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        JsonValue::from(value as i64)
    } else {
        JsonValue::from(value)
    }
}

fn diagnostics_to_json(d: &LookupDiagnostics) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert(
        "character_index".to_string(),
        JsonValue::from(d.character_index),
    );
    out.insert(
        "inventory_key".to_string(),
        JsonValue::String(d.inventory_key.clone()),
    );
    out.insert("stats_key".to_string(), JsonValue::String(d.stats_key.clone()));
    out.insert(
        "available_inventory_keys".to_string(),
        JsonValue::from(d.available_inventory_keys.clone()),
    );
    out.insert(
        "available_stats_keys".to_string(),
        JsonValue::from(d.available_stats_keys.clone()),
    );
    JsonValue::Object(out)
}

fn write_wands_text(out: &mut String, wands: &[WandRow]) {
    if wands.is_empty() {
        writeln!(out, "   {NO_WANDS_MESSAGE}").expect("writing to String cannot fail");
        return;
    }

    writeln!(
        out,
        "{}{}{}{}{}{}{}{}{}",
        fit_column("Rank", RANK_WIDTH),
        fit_column("Character", CHARACTER_WIDTH),
        fit_column("Bucket", BUCKET_WIDTH),
        fit_column("Position", POSITION_WIDTH),
        fit_column("Power", NUMBER_WIDTH),
        fit_column("Unique Stat 1", UNIQUE_STAT_WIDTH),
        fit_column("Unique Stat 2", UNIQUE_STAT_WIDTH),
        fit_column("WIS", NUMBER_WIDTH),
        "Upgrades"
    )
    .expect("writing to String cannot fail");

    for (index, wand) in wands.iter().enumerate() {
        writeln!(
            out,
            "{}{}{}{}{}{}{}{}{}",
            fit_column(&(index + 1).to_string(), RANK_WIDTH),
            fit_column(&wand.character, CHARACTER_WIDTH),
            fit_column(&wand.bucket.to_string(), BUCKET_WIDTH),
            fit_column(&wand.position.to_string(), POSITION_WIDTH),
            fit_column(&format_stat(wand.weapon_power), NUMBER_WIDTH),
            fit_column(&unique_stat_text(wand.uq1_val, &wand.uq1_txt), UNIQUE_STAT_WIDTH),
            fit_column(&unique_stat_text(wand.uq2_val, &wand.uq2_txt), UNIQUE_STAT_WIDTH),
            fit_column(&format_stat(wand.wis), NUMBER_WIDTH),
            format_stat(wand.upgrades)
        )
        .expect("writing to String cannot fail");
    }
}

fn write_rings_text(out: &mut String, rings: &[RingRow]) {
    if rings.is_empty() {
        writeln!(out, "   {NO_RINGS_MESSAGE}").expect("writing to String cannot fail");
        return;
    }

    writeln!(
        out,
        "{}{}{}{}{}{}{}{}{}",
        fit_column("Rank", RANK_WIDTH),
        fit_column("Character", CHARACTER_WIDTH),
        fit_column("Bucket", BUCKET_WIDTH),
        fit_column("Position", POSITION_WIDTH),
        fit_column("Unique Stat 1", UNIQUE_STAT_WIDTH),
        fit_column("Unique Stat 2", UNIQUE_STAT_WIDTH),
        fit_column("WIS", NUMBER_WIDTH),
        fit_column("Defence", NUMBER_WIDTH),
        "Upgrades"
    )
    .expect("writing to String cannot fail");

    for (index, ring) in rings.iter().enumerate() {
        writeln!(
            out,
            "{}{}{}{}{}{}{}{}{}",
            fit_column(&(index + 1).to_string(), RANK_WIDTH),
            fit_column(&ring.character, CHARACTER_WIDTH),
            fit_column(&ring.bucket.to_string(), BUCKET_WIDTH),
            fit_column(&ring.position.to_string(), POSITION_WIDTH),
            fit_column(&unique_stat_text(ring.uq1_val, &ring.uq1_txt), UNIQUE_STAT_WIDTH),
            fit_column(&unique_stat_text(ring.uq2_val, &ring.uq2_txt), UNIQUE_STAT_WIDTH),
            fit_column(&format_stat(ring.wis), NUMBER_WIDTH),
            fit_column(&format_stat(ring.defence), NUMBER_WIDTH),
            format_stat(ring.upgrades)
        )
        .expect("writing to String cannot fail");
    }
}

fn unique_stat_text(value: f64, label: &str) -> String {
    format!("{}% ({})", format_stat(value), label)
}

fn unique_stat_html(value: f64, label: &str) -> String {
    format!("{}% ({})", format_stat(value), escape_html(label))
}

fn table_head_html(headers: &[&str]) -> String {
    let mut html = String::from("<table><thead><tr>");
    for header in headers {
        write!(html, "<th>{header}</th>").expect("writing to String cannot fail");
    }
    html.push_str("</tr></thead><tbody>");
    html
}

/// Cells are already escaped; the rank cell is added here.
fn push_row_html(html: &mut String, index: usize, cells: &[String]) {
    write!(html, "<tr><td class=\"rank-cell\">{}</td>", index + 1)
        .expect("writing to String cannot fail");
    for cell in cells {
        write!(html, "<td>{cell}</td>").expect("writing to String cannot fail");
    }
    html.push_str("</tr>");
}

fn empty_table_html(message: &str) -> String {
    format!("<p style=\"text-align: center; color: #888;\">{message}</p>")
}

/// Pads to `width`, truncating long values so columns stay aligned. Always
/// leaves at least one trailing space.
fn fit_column(value: &str, width: usize) -> String {
    let max = width.saturating_sub(1);
    let mut out: String = value.chars().take(max).collect();
    let used = out.chars().count();
    for _ in used..width {
        out.push(' ');
    }
    out
}

fn join_or_none(keys: &[String]) -> String {
    if keys.is_empty() {
        "None found".to_string()
    } else {
        keys.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_html, fit_column, format_stat, stat_json};
    use serde_json::json;

    #[test]
    fn format_stat_drops_integral_fraction() {
        assert_eq!(format_stat(42.0), "42");
        assert_eq!(format_stat(2.5), "2.5");
        assert_eq!(format_stat(0.0), "0");
    }

    #[test]
    fn stat_json_prefers_integers() {
        assert_eq!(stat_json(7.0), json!(7));
        assert_eq!(stat_json(7.25), json!(7.25));
    }

    #[test]
    fn fit_column_pads_and_truncates() {
        assert_eq!(fit_column("ab", 5), "ab   ");
        assert_eq!(fit_column("abcdefgh", 5), "abcd ");
    }

    #[test]
    fn escape_html_escapes_markup() {
        assert_eq!(
            escape_html("<b>\"x\" & 'y'</b>"),
            "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;"
        );
    }
}
