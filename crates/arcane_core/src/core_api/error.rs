use std::error::Error;
use std::fmt;

use super::types::LookupDiagnostics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    InvalidPlayerNumber,
    InvalidJson,
    NoArcaneItemsFound,
    UnexpectedAnalysisError,
}

impl CoreErrorCode {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::InvalidPlayerNumber => "invalid_player_number",
            Self::InvalidJson => "invalid_json",
            Self::NoArcaneItemsFound => "no_arcane_items_found",
            Self::UnexpectedAnalysisError => "unexpected_analysis_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
    /// Only set for `NoArcaneItemsFound`.
    pub diagnostics: Option<LookupDiagnostics>,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            diagnostics: None,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: LookupDiagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for CoreError {}
