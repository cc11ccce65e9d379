use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Collecting,
    Processing,
    Completed,
}

/// Snapshot handed to the progress callback after each page and each
/// processed listing (§4.5). Finalization always emits one last snapshot
/// with `phase = Completed`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub phase: Option<Phase>,
    pub properties_found: u32,
    pub properties_processed: u32,
    pub properties_attempted: u32,
    pub new: u32,
    pub price_updated: u32,
    pub other_updates: u32,
    pub refetched_unchanged: u32,
    pub detail_fetched: u32,
    pub detail_skipped: u32,
    pub errors: u32,
    pub price_missing: u32,
    pub building_info_missing: u32,
    pub price_mismatch: u32,
    pub delisted: u32,
    pub html_structure_errors: u32,
}

impl ProgressSnapshot {
    pub fn new() -> Self {
        Self { phase: Some(Phase::Collecting), ..Default::default() }
    }
}
