use std::path::PathBuf;
use std::sync::Arc;

use compress_core::JobRequest;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::{
    ArtifactSaver, ChannelEventSink, ClientSettings, EngineEvent, FileArtifactSaver, HealthCheck,
    JobDriver, JobError, MalformedLinePolicy, ReadinessProber, ReqwestHealthCheck,
    ReqwestUploader, RetryPolicy, Uploader,
};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub client: ClientSettings,
    pub retry: RetryPolicy,
    pub output_dir: PathBuf,
    pub malformed_lines: MalformedLinePolicy,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            client: ClientSettings::default(),
            retry: RetryPolicy::default(),
            output_dir,
            malformed_lines: MalformedLinePolicy::default(),
        }
    }
}

/// Owns the engine side of one client session.
///
/// Work is spawned on the current tokio runtime and reports back through
/// `recv`. Shutting down (or dropping) the handle cancels pending work and
/// drops any event produced afterwards.
pub struct EngineHandle {
    prober: ReadinessProber,
    health: Arc<dyn HealthCheck>,
    driver: Arc<JobDriver>,
    event_tx: UnboundedSender<EngineEvent>,
    event_rx: UnboundedReceiver<EngineEvent>,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, JobError> {
        let health = Arc::new(ReqwestHealthCheck::new(&config.client)?);
        let uploader = Arc::new(ReqwestUploader::new(&config.client)?);
        let saver = Arc::new(FileArtifactSaver::new(config.output_dir, &config.client)?);
        Ok(Self::from_parts(
            health,
            uploader,
            saver,
            config.retry,
            config.malformed_lines,
        ))
    }

    pub fn from_parts(
        health: Arc<dyn HealthCheck>,
        uploader: Arc<dyn Uploader>,
        saver: Arc<dyn ArtifactSaver>,
        retry: RetryPolicy,
        malformed_lines: MalformedLinePolicy,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            prober: ReadinessProber::new(retry),
            health,
            driver: Arc::new(JobDriver::new(uploader, saver).with_policy(malformed_lines)),
            event_tx,
            event_rx,
            cancel: CancellationToken::new(),
        }
    }

    pub fn probe(&self) {
        let prober = self.prober;
        let health = self.health.clone();
        let sink = self.sink();
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            prober.run(health.as_ref(), &sink, &cancel).await;
        });
    }

    pub fn start_job(&self, request: JobRequest) {
        let driver = self.driver.clone();
        let sink = self.sink();
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            let _ = driver.run(&request, &sink, &cancel).await;
        });
    }

    pub async fn recv(&mut self) -> Option<EngineEvent> {
        self.event_rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn sink(&self) -> ChannelEventSink {
        ChannelEventSink::new(self.event_tx.clone(), self.cancel.clone())
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
