use arcane_core::core_api::{AnalysisOptions, CoreError, DEFAULT_TOP_N, Engine, LookupDiagnostics};
use arcane_render::{JsonStyle, escape_html, render_html, render_json};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebAnalyzeOptions {
    pub player_number: Option<PlayerNumberInput>,
    pub top_n: usize,
    pub output: Option<String>,
}

impl Default for WebAnalyzeOptions {
    fn default() -> Self {
        Self {
            player_number: None,
            top_n: DEFAULT_TOP_N,
            output: None,
        }
    }
}

/// Page inputs hand over either the raw field text or a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PlayerNumberInput {
    Number(f64),
    Text(String),
}

impl PlayerNumberInput {
    fn to_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Html,
    Json,
}

#[derive(Debug, Clone)]
struct WebError {
    code: &'static str,
    message: String,
    diagnostics: Option<LookupDiagnostics>,
}

#[derive(Debug, Clone, Serialize)]
struct WebErrorPayload {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<LookupDiagnostics>,
}

impl WebError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            diagnostics: None,
        }
    }

    fn to_js_value(&self) -> JsValue {
        let payload = WebErrorPayload {
            code: self.code.to_string(),
            message: self.message.clone(),
            diagnostics: self.diagnostics.clone(),
        };
        serde_wasm_bindgen::to_value(&payload).unwrap_or_else(|_| {
            JsValue::from_str(&format!("{}: {}", payload.code, payload.message))
        })
    }
}

impl From<CoreError> for WebError {
    fn from(err: CoreError) -> Self {
        Self {
            code: err.code.as_str(),
            message: err.message,
            diagnostics: err.diagnostics,
        }
    }
}

/// Analyzes pasted snapshot text for the character in
/// `options.player_number` and returns either the HTML result fragment or
/// pretty JSON, depending on `options.output`.
#[wasm_bindgen]
pub fn analyze_snapshot(json_text: &str, options: JsValue) -> Result<String, JsValue> {
    let parsed_options = parse_options(options).map_err(|err| err.to_js_value())?;
    analyze_snapshot_impl(json_text, &parsed_options).map_err(|err| err.to_js_value())
}

fn analyze_snapshot_impl(json_text: &str, options: &WebAnalyzeOptions) -> Result<String, WebError> {
    let mode = parse_output_mode(options.output.as_deref())?;
    if options.top_n == 0 {
        return Err(WebError::new("invalid_options", "top_n must be at least 1"));
    }

    let player_number = options
        .player_number
        .as_ref()
        .map(PlayerNumberInput::to_text)
        .unwrap_or_default();
    let engine = Engine::with_options(AnalysisOptions {
        top_n: options.top_n,
    });
    let report = engine.analyze_text(json_text, &player_number)?;

    match mode {
        OutputMode::Json => {
            let value = render_json(&report, JsonStyle::CanonicalV1);
            serde_json::to_string_pretty(&value).map_err(|err| {
                WebError::new(
                    "render_failed",
                    format!("failed to serialize rendered JSON output: {err}"),
                )
            })
        }
        OutputMode::Html => Ok(format!(
            "<p class=\"success\">{}</p>{}",
            escape_html(&report.summary_message()),
            render_html(&report)
        )),
    }
}

fn parse_options(options: JsValue) -> Result<WebAnalyzeOptions, WebError> {
    if options.is_null() || options.is_undefined() {
        return Ok(WebAnalyzeOptions::default());
    }

    serde_wasm_bindgen::from_value(options).map_err(|err| {
        WebError::new(
            "invalid_options",
            format!("Failed to parse analyze options: {err}"),
        )
    })
}

fn parse_output_mode(raw: Option<&str>) -> Result<OutputMode, WebError> {
    let Some(raw) = raw else {
        return Ok(OutputMode::Html);
    };

    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "" | "html" => Ok(OutputMode::Html),
        "json" => Ok(OutputMode::Json),
        _ => Err(WebError::new(
            "invalid_options",
            format!("Invalid output '{raw}'. Expected one of: html, json"),
        )),
    }
}
