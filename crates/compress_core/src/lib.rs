//! Compress client core: pure state machine and view-model helpers.
mod effect;
mod event;
mod msg;
mod request;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use event::ProgressEvent;
pub use msg::Msg;
pub use request::{
    is_valid_target_mb, JobForm, JobRequest, Mode, UploadFile, DEFAULT_PERCENT,
    DEFAULT_TARGET_MB, MAX_PERCENT, MIN_PERCENT,
};
pub use state::{
    AppState, Outcome, Phase, STATUS_DONE, STATUS_READY, STATUS_UNRESPONSIVE, STATUS_UPLOADING,
    STATUS_WAITING,
};
pub use update::update;
pub use view_model::AppViewModel;
