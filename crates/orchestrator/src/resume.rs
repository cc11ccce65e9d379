use crate::progress::{Phase, ProgressSnapshot};
use parsers::ListRow;
use serde::{Deserialize, Serialize};

/// Logical resume state (§4.5 "Phase re-entry"). Persistence of this
/// value across process restarts is the outer scheduler's job (out of
/// scope here); this crate only defines its shape and how to continue
/// from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeState {
    pub phase: Phase,
    pub current_page: u32,
    pub collected_rows: Vec<ListRow>,
    pub processed_count: usize,
    pub stats: ProgressSnapshot,
}

impl ResumeState {
    pub fn fresh() -> Self {
        Self {
            phase: Phase::Collecting,
            current_page: 1,
            collected_rows: Vec::new(),
            processed_count: 0,
            stats: ProgressSnapshot::new(),
        }
    }
}
