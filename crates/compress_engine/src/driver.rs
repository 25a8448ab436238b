use std::sync::Arc;

use compress_core::{JobRequest, ProgressEvent};
use compress_logging::{client_debug, client_info, client_warn};
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::decode::{EventDecoder, MalformedLinePolicy};
use crate::{ArtifactSaver, EngineEvent, EventSink, FailureKind, JobError, JobOutcome, Uploader};

pub const STREAM_ENDED_MESSAGE: &str = "Stream ended before download was ready";

/// Runs one upload + progress stream cycle.
pub struct JobDriver {
    uploader: Arc<dyn Uploader>,
    saver: Arc<dyn ArtifactSaver>,
    policy: MalformedLinePolicy,
}

impl JobDriver {
    pub fn new(uploader: Arc<dyn Uploader>, saver: Arc<dyn ArtifactSaver>) -> Self {
        Self {
            uploader,
            saver,
            policy: MalformedLinePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MalformedLinePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Upload `request`, follow its progress stream and save the artifact.
    ///
    /// Every state change is reported through `sink`, ending with exactly one
    /// `EngineEvent::JobCompleted`. Reading stops at the first terminal record.
    pub async fn run(
        &self,
        request: &JobRequest,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
    ) -> Result<JobOutcome, JobError> {
        let result = self.drive(request, sink, cancel).await;
        match &result {
            Ok(outcome) => {
                client_info!("Job for {} saved to {:?}", request.file.name, outcome.saved_to)
            }
            Err(err) => {
                client_warn!("Job for {} failed ({}): {}", request.file.name, err.kind, err)
            }
        }
        sink.emit(EngineEvent::JobCompleted {
            result: result.clone(),
        });
        result
    }

    async fn drive(
        &self,
        request: &JobRequest,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
    ) -> Result<JobOutcome, JobError> {
        client_info!(
            "Uploading {} ({} bytes, mode={})",
            request.file.name,
            request.file.len(),
            request.mode.as_form_value()
        );

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled()),
            response = self.uploader.upload(request) => response?,
        };
        if !(200..300).contains(&response.status) {
            return Err(JobError::http_status(response.status));
        }
        let Some(mut body) = response.body else {
            return Err(JobError::new(FailureKind::MissingBody, "No response body"));
        };
        sink.emit(EngineEvent::UploadAccepted);

        let mut decoder = EventDecoder::new(self.policy);
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled()),
                next = body.next() => next,
            };
            let (events, ended) = match next {
                Some(chunk) => (decoder.feed(&chunk?)?, false),
                None => (decoder.finish()?.into_iter().collect(), true),
            };
            if let Some(terminal) = dispatch(events, sink) {
                // Dropping `body` abandons the rest of the stream.
                drop(body);
                return self.complete(terminal).await;
            }
            if ended {
                break;
            }
        }

        if decoder.discarded() > 0 {
            client_debug!("Discarded {} malformed stream line(s)", decoder.discarded());
        }
        Err(JobError::new(FailureKind::StreamEnded, STREAM_ENDED_MESSAGE))
    }

    async fn complete(&self, terminal: ProgressEvent) -> Result<JobOutcome, JobError> {
        match (terminal.error, terminal.download) {
            (Some(error), _) => Err(JobError::new(FailureKind::ServerRejected, error)),
            (None, Some(locator)) => self.saver.save(&locator, terminal.filename.as_deref()).await,
            (None, None) => Err(JobError::new(
                FailureKind::MalformedStream,
                "terminal record without download",
            )),
        }
    }
}

/// Emits records in order and returns the first terminal one; later records are not emitted.
fn dispatch(events: Vec<ProgressEvent>, sink: &dyn EventSink) -> Option<ProgressEvent> {
    for event in events {
        let terminal = event.is_terminal().then(|| event.clone());
        sink.emit(EngineEvent::Progress(event));
        if terminal.is_some() {
            return terminal;
        }
    }
    None
}

fn cancelled() -> JobError {
    JobError::new(FailureKind::Cancelled, "cancelled")
}
