use std::path::{Path, PathBuf};

use crate::view_model::AppViewModel;
use crate::{JobForm, ProgressEvent};

pub const STATUS_WAITING: &str = "Waiting for server…";
pub const STATUS_READY: &str = "Ready";
pub const STATUS_UNRESPONSIVE: &str = "Server not responding";
pub const STATUS_UPLOADING: &str = "Uploading…";
pub const STATUS_DONE: &str = "Done!";

/// Where the current job sits in the upload/stream lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    Streaming,
    Done,
    Failed,
}

impl Phase {
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Uploading | Phase::Streaming)
    }

    pub fn outcome(self) -> Outcome {
        match self {
            Phase::Idle => Outcome::Pending,
            Phase::Uploading | Phase::Streaming => Outcome::Running,
            Phase::Done => Outcome::Done,
            Phase::Failed => Outcome::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Pending,
    Running,
    Done,
    Failed,
}

/// Client session state: job form, readiness and the progress of the current job.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    form: JobForm,
    status: String,
    progress: u8,
    ready: bool,
    probing: bool,
    phase: Phase,
    saved_to: Option<PathBuf>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            form: JobForm::default(),
            status: STATUS_WAITING.to_string(),
            progress: 0,
            ready: false,
            probing: false,
            phase: Phase::Idle,
            saved_to: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            status: self.status.clone(),
            progress: self.progress,
            ready: self.ready,
            phase: self.phase,
            outcome: self.phase.outcome(),
            file_name: self.form.file().map(|file| file.name.clone()),
            file_len: self.form.file().map(|file| file.len() as u64),
            mode: self.form.mode(),
            percent: self.form.percent(),
            target_mb: self.form.target_mb(),
            can_start: self.can_start(),
            saved_to: self.saved_to.clone(),
            dirty: self.dirty,
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn ready(&self) -> bool {
        self.ready
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Outcome {
        self.phase.outcome()
    }

    pub fn form(&self) -> &JobForm {
        &self.form
    }

    pub fn saved_to(&self) -> Option<&Path> {
        self.saved_to.as_deref()
    }

    pub fn can_start(&self) -> bool {
        self.ready && self.form.file().is_some() && !self.phase.is_active()
    }

    /// Returns whether anything changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn form_mut(&mut self) -> &mut JobForm {
        self.dirty = true;
        &mut self.form
    }

    pub(crate) fn begin_probe(&mut self) -> bool {
        if self.ready || self.probing {
            return false;
        }
        self.probing = true;
        true
    }

    pub(crate) fn set_ready(&mut self) {
        self.probing = false;
        self.ready = true;
        self.set_status(STATUS_READY);
    }

    pub(crate) fn set_unresponsive(&mut self) {
        self.probing = false;
        self.ready = false;
        self.set_status(STATUS_UNRESPONSIVE);
    }

    pub(crate) fn begin_upload(&mut self) {
        self.saved_to = None;
        self.progress = 0;
        self.phase = Phase::Uploading;
        self.set_status(STATUS_UPLOADING);
    }

    pub(crate) fn begin_streaming(&mut self) {
        if self.phase == Phase::Uploading {
            self.phase = Phase::Streaming;
            self.dirty = true;
        }
    }

    /// Applies one stream record. Records arriving outside `Streaming` are ignored.
    pub(crate) fn apply_event(&mut self, event: &ProgressEvent) {
        if self.phase != Phase::Streaming {
            return;
        }
        if let Some(progress) = event.progress {
            self.progress = progress;
            self.dirty = true;
        }
        if let Some(status) = event.status.as_deref().filter(|s| !s.is_empty()) {
            self.set_status(status);
        }
        if let Some(error) = event.error.as_deref().filter(|e| !e.is_empty()) {
            self.fail(error);
        } else if event.download.as_deref().is_some_and(|d| !d.is_empty()) {
            self.progress = 100;
            self.phase = Phase::Done;
            self.set_status(STATUS_DONE);
        }
    }

    pub(crate) fn record_saved(&mut self, path: PathBuf) {
        if self.phase == Phase::Done {
            self.saved_to = Some(path);
            self.dirty = true;
        }
    }

    pub(crate) fn fail(&mut self, message: &str) {
        if matches!(self.phase, Phase::Idle | Phase::Failed) {
            return;
        }
        self.phase = Phase::Failed;
        self.set_status(&format!("Error: {message}"));
    }

    fn set_status(&mut self, status: &str) {
        if self.status != status {
            self.status = status.to_string();
        }
        self.dirty = true;
    }
}
