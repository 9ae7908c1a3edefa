mod engine;
mod error;
mod extract;
mod ranking;
mod types;

pub use engine::{Engine, Session};
pub use error::{CoreError, CoreErrorCode};
pub use extract::{Extraction, extract_items};
pub use ranking::{project_ring, project_wand, top_rings, top_wands};
pub use types::{
    AnalysisOptions, AnalysisReport, ArcaneCategory, DEFAULT_TOP_N, ExtractionSummary, ItemRecord,
    LookupDiagnostics, PlayerNumber, RingRow, RingStat, WandRow,
};
