use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info, warn};

use crate::snapshot::{
    self, INVENTORY_KEY_PREFIX, STATS_KEY_PREFIX, Snapshot, SnapshotError, StatsShapeError,
};

use super::error::{CoreError, CoreErrorCode};
use super::extract::{Extraction, extract_items};
use super::ranking::{top_rings, top_wands};
use super::types::{
    AnalysisOptions, AnalysisReport, ArcaneCategory, LookupDiagnostics, PlayerNumber, RingStat,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine {
    options: AnalysisOptions,
}

#[derive(Debug, Clone)]
pub struct Session {
    snapshot: Snapshot,
    options: AnalysisOptions,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: AnalysisOptions) -> Self {
        Self { options }
    }

    pub fn open_str(&self, text: &str) -> Result<Session, CoreError> {
        let snapshot = Snapshot::parse(text).map_err(invalid_json)?;
        debug!(top_level_keys = snapshot.len(), "snapshot parsed");
        Ok(self.session(snapshot))
    }

    /// One complete run over raw inputs. The player number is checked before
    /// the snapshot text is parsed.
    pub fn analyze_text(&self, text: &str, player: &str) -> Result<AnalysisReport, CoreError> {
        let player = PlayerNumber::parse(player)?;
        self.open_str(text)?.analyze(player)
    }

    fn session(&self, snapshot: Snapshot) -> Session {
        Session {
            snapshot,
            options: self.options,
        }
    }
}

impl Session {
    pub fn analyze(&self, player: PlayerNumber) -> Result<AnalysisReport, CoreError> {
        let character_index = player.character_index();
        debug!(
            player = player.get(),
            character_index,
            inventory_key = %snapshot::inventory_key(character_index),
            stats_key = %snapshot::stats_key(character_index),
            "starting analysis"
        );

        match panic::catch_unwind(AssertUnwindSafe(|| self.run(player))) {
            Ok(Ok(Some(report))) => {
                info!(
                    player = player.get(),
                    wands = report.total_wands(),
                    rings = report.total_rings(),
                    "analysis finished"
                );
                Ok(report)
            }
            Ok(Ok(None)) => Err(CoreError::new(
                CoreErrorCode::NoArcaneItemsFound,
                format!("No Arcane items found for Character {}.", player.get()),
            )
            .with_diagnostics(self.lookup_diagnostics(character_index))),
            Ok(Err(shape)) => {
                warn!(player = player.get(), error = %shape, "stats have no slot records");
                Err(CoreError::new(
                    CoreErrorCode::UnexpectedAnalysisError,
                    format!("error analyzing data: {shape}"),
                ))
            }
            Err(payload) => {
                let detail = panic_message(payload.as_ref());
                warn!(player = player.get(), detail = %detail, "analysis aborted");
                Err(CoreError::new(
                    CoreErrorCode::UnexpectedAnalysisError,
                    format!("error analyzing data: {detail}"),
                ))
            }
        }
    }

    /// Keys tried for `character_index` and the per-character keys that
    /// actually exist in the snapshot.
    pub fn lookup_diagnostics(&self, character_index: usize) -> LookupDiagnostics {
        LookupDiagnostics {
            character_index,
            inventory_key: snapshot::inventory_key(character_index),
            stats_key: snapshot::stats_key(character_index),
            available_inventory_keys: self.snapshot.keys_with_prefix(INVENTORY_KEY_PREFIX),
            available_stats_keys: self.snapshot.keys_with_prefix(STATS_KEY_PREFIX),
        }
    }

    fn run(&self, player: PlayerNumber) -> Result<Option<AnalysisReport>, StatsShapeError> {
        let character_index = player.character_index();
        let (wands, rings) = match self.snapshot.character_data(character_index) {
            Some(data) => (
                extract_items(character_index, &data, ArcaneCategory::Wand)?,
                extract_items(character_index, &data, ArcaneCategory::Ring)?,
            ),
            None => (Extraction::default(), Extraction::default()),
        };

        if wands.items.is_empty() && rings.items.is_empty() {
            return Ok(None);
        }

        let top_n = self.options.top_n;
        Ok(Some(AnalysisReport {
            player_number: player,
            character_index,
            wand_summary: wands.summary,
            ring_summary: rings.summary,
            top_wands: top_wands(&wands.items, top_n),
            top_rings_by_uq1: top_rings(&rings.items, RingStat::Uq1, top_n),
            top_rings_by_uq2: top_rings(&rings.items, RingStat::Uq2, top_n),
        }))
    }
}

fn invalid_json(err: SnapshotError) -> CoreError {
    let message = match err {
        SnapshotError::Empty => {
            "no snapshot data supplied; paste the exported IdleOn JSON".to_string()
        }
        other => format!("{other}; make sure the data was copied completely"),
    };
    CoreError::new(CoreErrorCode::InvalidJson, message)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown failure".to_string()
    }
}
