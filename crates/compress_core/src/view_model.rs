use std::path::PathBuf;

use crate::{Mode, Outcome, Phase};

/// Render snapshot of `AppState`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub status: String,
    pub progress: u8,
    pub ready: bool,
    pub phase: Phase,
    pub outcome: Outcome,
    pub file_name: Option<String>,
    pub file_len: Option<u64>,
    pub mode: Mode,
    pub percent: u8,
    pub target_mb: f64,
    /// Whether the Compress trigger should be enabled.
    pub can_start: bool,
    pub saved_to: Option<PathBuf>,
    pub dirty: bool,
}
