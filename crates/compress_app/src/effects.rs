use compress_core::{Effect, Msg};
use compress_engine::{EngineEvent, EngineHandle};
use compress_logging::{client_info, client_warn};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ProbeServer => {
                    client_info!("ProbeServer");
                    self.engine.probe();
                }
                Effect::StartJob(request) => {
                    client_info!(
                        "StartJob file={} bytes={} mode={}",
                        request.file.name,
                        request.file.len(),
                        request.mode.as_form_value()
                    );
                    self.engine.start_job(request);
                }
            }
        }
    }

    /// Waits for the next engine event and maps it into a core message.
    pub async fn next_msg(&mut self) -> Option<Msg> {
        self.engine.recv().await.map(map_event)
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Readiness(readiness) if readiness.ready => Msg::ServerReady,
        EngineEvent::Readiness(readiness) => {
            client_warn!("Server not ready after {} attempt(s)", readiness.attempts);
            Msg::ServerUnresponsive
        }
        EngineEvent::UploadAccepted => Msg::UploadAccepted,
        EngineEvent::Progress(event) => Msg::EventReceived(event),
        EngineEvent::JobCompleted { result: Ok(outcome) } => Msg::JobSucceeded {
            saved_to: outcome.saved_to,
        },
        EngineEvent::JobCompleted { result: Err(err) } => {
            client_warn!("Job failed ({}): {}", err.kind, err);
            Msg::JobFailed {
                message: err.message,
            }
        }
    }
}
