use std::time::Duration;

use bytes::Bytes;
use compress_core::JobRequest;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use url::Url;

use crate::{FailureKind, JobError};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout. `None` by default: compression streams can run for minutes.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

impl ClientSettings {
    /// Base URL with a trailing slash, so relative joins keep any path prefix.
    pub fn base(&self) -> Result<Url, JobError> {
        let mut base = Url::parse(&self.base_url)
            .map_err(|err| JobError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base)
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, JobError> {
        self.base()?
            .join(path.trim_start_matches('/'))
            .map_err(|err| JobError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    pub fn build_client(&self) -> Result<reqwest::Client, JobError> {
        let mut builder = reqwest::Client::builder().connect_timeout(self.connect_timeout);
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| JobError::new(FailureKind::Network, err.to_string()))
    }
}

/// Lazy, finite, non-restartable sequence of response body chunks.
pub type ChunkStream = BoxStream<'static, Result<Bytes, JobError>>;

pub struct UploadResponse {
    pub status: u16,
    /// `None` when the response carries no readable body.
    pub body: Option<ChunkStream>,
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, request: &JobRequest) -> Result<UploadResponse, JobError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    client: reqwest::Client,
    endpoint: Url,
}

impl ReqwestUploader {
    pub fn new(settings: &ClientSettings) -> Result<Self, JobError> {
        Ok(Self::with_client(
            settings.build_client()?,
            settings.endpoint("compress")?,
        ))
    }

    pub fn with_client(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    fn build_form(request: &JobRequest) -> Form {
        let file = Part::bytes(request.file.bytes.to_vec()).file_name(request.file.name.clone());
        request
            .form_fields()
            .into_iter()
            .fold(Form::new().part("file", file), |form, (name, value)| {
                form.text(name, value)
            })
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn upload(&self, request: &JobRequest) -> Result<UploadResponse, JobError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(Self::build_form(request))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = if status == StatusCode::NO_CONTENT {
            None
        } else {
            Some(
                response
                    .bytes_stream()
                    .map(|chunk| chunk.map_err(map_reqwest_error))
                    .boxed(),
            )
        };

        Ok(UploadResponse {
            status: status.as_u16(),
            body,
        })
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> JobError {
    if err.is_timeout() {
        return JobError::new(FailureKind::Timeout, err.to_string());
    }
    JobError::new(FailureKind::Network, err.to_string())
}
