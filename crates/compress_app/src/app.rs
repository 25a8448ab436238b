use std::collections::VecDeque;

use compress_core::{update, AppState, AppViewModel, Msg, Outcome, Phase, STATUS_UNRESPONSIVE};
use compress_logging::client_info;

use crate::effects::EffectRunner;
use crate::render::Renderer;

/// Drives one session: probe the server, submit the form once ready, follow the job.
///
/// `form` carries the user's inputs (file, mode, size) as messages. The session ends
/// when the job finishes, fails, the server never comes up, or on Ctrl-C.
pub(crate) async fn run_session(mut runner: EffectRunner, form: Vec<Msg>) -> AppViewModel {
    let mut state = AppState::new();
    let mut renderer = Renderer::default();
    let mut inbox: VecDeque<Msg> = VecDeque::from(form);
    inbox.push_front(Msg::Mounted);
    let mut submitted = false;

    loop {
        while let Some(msg) = inbox.pop_front() {
            let (next, effects) = update(state, msg);
            state = next;
            runner.enqueue(effects);
        }
        if state.consume_dirty() {
            renderer.render(&state.view());
        }

        if !submitted && state.can_start() {
            submitted = true;
            inbox.push_back(Msg::StartClicked);
            continue;
        }
        if is_finished(&state) {
            break;
        }

        tokio::select! {
            msg = runner.next_msg() => match msg {
                Some(msg) => inbox.push_back(msg),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                client_info!("Interrupted; cancelling pending work");
                break;
            }
        }
    }

    // Teardown: anything still in flight stops reporting.
    runner.shutdown();
    state.view()
}

fn is_finished(state: &AppState) -> bool {
    match state.outcome() {
        Outcome::Failed => true,
        Outcome::Done => state.saved_to().is_some(),
        Outcome::Pending => state.phase() == Phase::Idle && state.status() == STATUS_UNRESPONSIVE,
        Outcome::Running => false,
    }
}
