use crate::request::is_valid_target_mb;
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted => {
            if state.begin_probe() {
                vec![Effect::ProbeServer]
            } else {
                Vec::new()
            }
        }
        Msg::FileSelected(file) => {
            state.form_mut().set_file(file);
            Vec::new()
        }
        Msg::ModeChanged(mode) => {
            state.form_mut().set_mode(mode);
            Vec::new()
        }
        Msg::PercentChanged(percent) => {
            state.form_mut().set_percent(percent);
            Vec::new()
        }
        Msg::TargetMbChanged(target_mb) => {
            // Invalid sizes keep the previous value and leave the state clean.
            if is_valid_target_mb(target_mb) {
                state.form_mut().set_target_mb(target_mb);
            }
            Vec::new()
        }
        Msg::ServerReady => {
            state.set_ready();
            Vec::new()
        }
        Msg::ServerUnresponsive => {
            state.set_unresponsive();
            Vec::new()
        }
        Msg::StartClicked => {
            // No file, server not ready, or a job already in flight: nothing happens.
            if !state.can_start() {
                return (state, Vec::new());
            }
            match state.form().to_request() {
                Some(request) => {
                    state.begin_upload();
                    vec![Effect::StartJob(request)]
                }
                None => Vec::new(),
            }
        }
        Msg::UploadAccepted => {
            state.begin_streaming();
            Vec::new()
        }
        Msg::EventReceived(event) => {
            state.apply_event(&event);
            Vec::new()
        }
        Msg::JobSucceeded { saved_to } => {
            state.record_saved(saved_to);
            Vec::new()
        }
        Msg::JobFailed { message } => {
            state.fail(&message);
            Vec::new()
        }
    };

    (state, effects)
}
