use std::path::PathBuf;

use compress_core::{update, AppState, Msg, Outcome, Phase, ProgressEvent, UploadFile, STATUS_DONE};

fn streaming_state() -> AppState {
    let (state, _) = update(AppState::new(), Msg::ServerReady);
    let (state, _) = update(
        state,
        Msg::FileSelected(Some(UploadFile::new("photo.jpg", vec![0xFF, 0xD8, 0xFF]))),
    );
    let (state, _) = update(state, Msg::StartClicked);
    let (mut state, _) = update(state, Msg::UploadAccepted);
    assert_eq!(state.phase(), Phase::Streaming);
    state.consume_dirty();
    state
}

fn event(json: &str) -> ProgressEvent {
    serde_json::from_str(json).expect("valid event")
}

#[test]
fn partial_records_only_touch_present_fields() {
    let state = streaming_state();

    let (mut state, _) = update(state, Msg::EventReceived(event(r#"{"progress":30}"#)));
    assert_eq!(state.progress(), 30);
    assert_eq!(state.status(), "Uploading…");
    assert!(state.consume_dirty());

    let (mut state, _) = update(
        state,
        Msg::EventReceived(event(r#"{"status":"Optimizing images…"}"#)),
    );
    assert_eq!(state.progress(), 30);
    assert_eq!(state.status(), "Optimizing images…");
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::EventReceived(ProgressEvent::default()));
    assert!(!state.consume_dirty());
    assert_eq!(state.outcome(), Outcome::Running);
}

#[test]
fn download_record_completes_the_job() {
    let state = streaming_state();

    let (state, _) = update(
        state,
        Msg::EventReceived(event(
            r#"{"progress":80,"status":"Writing","download":"data:application/octet-stream;base64,AA==","filename":"photo.jpg"}"#,
        )),
    );
    assert_eq!(state.phase(), Phase::Done);
    assert_eq!(state.progress(), 100);
    assert_eq!(state.status(), STATUS_DONE);

    let (state, _) = update(
        state,
        Msg::JobSucceeded {
            saved_to: PathBuf::from("out/photo.jpg"),
        },
    );
    assert_eq!(state.view().saved_to, Some(PathBuf::from("out/photo.jpg")));
    assert_eq!(state.outcome(), Outcome::Done);
}

#[test]
fn records_after_terminal_event_are_ignored() {
    let state = streaming_state();
    let (state, _) = update(
        state,
        Msg::EventReceived(event(r#"{"download":"https://example.com/a.pdf"}"#)),
    );

    let (state, _) = update(
        state,
        Msg::EventReceived(event(r#"{"progress":12,"status":"late"}"#)),
    );

    assert_eq!(state.progress(), 100);
    assert_eq!(state.status(), STATUS_DONE);
    assert_eq!(state.outcome(), Outcome::Done);
}

#[test]
fn server_error_record_fails_the_job() {
    let state = streaming_state();
    let (state, _) = update(
        state,
        Msg::EventReceived(event(r#"{"error":"Unsupported file type"}"#)),
    );

    assert_eq!(state.outcome(), Outcome::Failed);
    assert_eq!(state.status(), "Error: Unsupported file type");
}

#[test]
fn failed_artifact_save_turns_done_into_failed() {
    let state = streaming_state();
    let (state, _) = update(
        state,
        Msg::EventReceived(event(r#"{"download":"data:,x"}"#)),
    );
    let (state, _) = update(
        state,
        Msg::JobFailed {
            message: "disk full".to_string(),
        },
    );

    assert_eq!(state.outcome(), Outcome::Failed);
    assert_eq!(state.status(), "Error: disk full");
    assert_eq!(state.view().saved_to, None);
}

#[test]
fn stream_events_before_upload_accepted_are_ignored() {
    let (state, _) = update(AppState::new(), Msg::ServerReady);
    let (state, _) = update(
        state,
        Msg::FileSelected(Some(UploadFile::new("a.docx", vec![1, 2, 3]))),
    );
    let (state, _) = update(state, Msg::StartClicked);

    let (state, _) = update(state, Msg::EventReceived(event(r#"{"progress":50}"#)));

    assert_eq!(state.progress(), 0);
    assert_eq!(state.phase(), Phase::Uploading);
}

#[test]
fn progress_values_are_clamped() {
    assert_eq!(event(r#"{"progress":150}"#).progress, Some(100));
    assert_eq!(event(r#"{"progress":-5}"#).progress, Some(0));
    assert_eq!(event(r#"{"progress":42.6}"#).progress, Some(43));
    assert_eq!(event(r#"{"progress":null}"#).progress, None);
    assert!(serde_json::from_str::<ProgressEvent>(r#"{"progress":"half"}"#).is_err());
}

#[test]
fn new_job_after_failure_starts_fresh() {
    let state = streaming_state();
    let (state, _) = update(
        state,
        Msg::JobFailed {
            message: "connection reset".to_string(),
        },
    );
    let (state, effects) = update(state, Msg::StartClicked);

    assert_eq!(effects.len(), 1);
    assert_eq!(state.phase(), Phase::Uploading);
    assert_eq!(state.progress(), 0);
}

#[test]
fn empty_status_keeps_previous_text() {
    let state = streaming_state();
    let (state, _) = update(
        state,
        Msg::EventReceived(event(r#"{"status":"Optimizing images…"}"#)),
    );

    let (state, _) = update(
        state,
        Msg::EventReceived(event(r#"{"progress":20,"status":""}"#)),
    );
    assert_eq!(state.progress(), 20);
    assert_eq!(state.status(), "Optimizing images…");
}

#[test]
fn empty_download_or_error_is_not_terminal() {
    let decoded = event(r#"{"download":"","error":"","filename":""}"#);
    assert_eq!(decoded, ProgressEvent::default());
    assert!(!decoded.is_terminal());

    let built = ProgressEvent {
        download: Some(String::new()),
        error: Some(String::new()),
        ..ProgressEvent::default()
    };
    assert!(!built.is_terminal());

    let state = streaming_state();
    let (state, _) = update(state, Msg::EventReceived(decoded));
    let (state, _) = update(state, Msg::EventReceived(built));
    assert_eq!(state.phase(), Phase::Streaming);
    assert_eq!(state.outcome(), Outcome::Running);
    assert_ne!(state.status(), STATUS_DONE);
}
