use std::time::Duration;

use compress_logging::{client_debug, client_info, client_warn};
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{ClientSettings, EngineEvent, EventSink, JobError, Readiness};

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

/// One liveness request. Any failure, including transport errors, is `false`.
#[async_trait::async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct ReqwestHealthCheck {
    client: reqwest::Client,
    url: Url,
}

impl ReqwestHealthCheck {
    pub fn new(settings: &ClientSettings) -> Result<Self, JobError> {
        Ok(Self {
            client: settings.build_client()?,
            url: settings.endpoint("health")?,
        })
    }
}

#[async_trait::async_trait]
impl HealthCheck for ReqwestHealthCheck {
    async fn check(&self) -> bool {
        let response = self
            .client
            .get(self.url.clone())
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await;
        match response {
            Ok(response) => {
                let ok = response.status().is_success();
                if !ok {
                    client_debug!("Health check returned {}", response.status());
                }
                ok
            }
            Err(err) => {
                client_debug!("Health check failed: {}", err);
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadinessProber {
    policy: RetryPolicy,
}

impl ReadinessProber {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Poll `check` until it succeeds or the attempt budget runs out.
    ///
    /// Returns `None` if `cancel` fires at any point; no further attempts are made.
    pub async fn probe(
        &self,
        check: &dyn HealthCheck,
        cancel: &CancellationToken,
    ) -> Option<Readiness> {
        let max_attempts = self.policy.max_attempts;
        for attempt in 1..=max_attempts {
            if cancel.is_cancelled() {
                return None;
            }
            let ok = check.check().await;
            if cancel.is_cancelled() {
                return None;
            }
            if ok {
                client_info!("Server ready after {} attempt(s)", attempt);
                return Some(Readiness {
                    ready: true,
                    attempts: attempt,
                });
            }
            client_debug!("Health attempt {}/{} failed", attempt, max_attempts);

            if attempt < max_attempts && !self.policy.interval.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return None,
                    _ = tokio::time::sleep(self.policy.interval) => {}
                }
            }
        }

        client_warn!("Server not responding after {} attempt(s)", max_attempts);
        Some(Readiness {
            ready: false,
            attempts: max_attempts,
        })
    }

    /// Probe and report the outcome through `sink`.
    pub async fn run(
        &self,
        check: &dyn HealthCheck,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
    ) -> Option<Readiness> {
        let readiness = self.probe(check, cancel).await?;
        sink.emit(EngineEvent::Readiness(readiness));
        Some(readiness)
    }
}
