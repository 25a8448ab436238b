use std::path::PathBuf;

use base64::Engine;
use compress_logging::client_info;
use url::Url;

use crate::filename::safe_filename;
use crate::persist::AtomicFileWriter;
use crate::upload::map_reqwest_error;
use crate::{ClientSettings, FailureKind, JobError, JobOutcome};

/// Saves the artifact a terminal stream record points at.
#[async_trait::async_trait]
pub trait ArtifactSaver: Send + Sync {
    async fn save(&self, locator: &str, filename: Option<&str>) -> Result<JobOutcome, JobError>;
}

/// Writes artifacts into a local output directory.
///
/// `data:` locators are decoded in place; anything else is fetched over HTTP,
/// relative locators resolving against the server base URL.
#[derive(Debug, Clone)]
pub struct FileArtifactSaver {
    writer: AtomicFileWriter,
    client: reqwest::Client,
    base: Url,
}

impl FileArtifactSaver {
    pub fn new(output_dir: PathBuf, settings: &ClientSettings) -> Result<Self, JobError> {
        Ok(Self {
            writer: AtomicFileWriter::new(output_dir),
            client: settings.build_client()?,
            base: settings.base()?,
        })
    }

    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, JobError> {
        let url = self
            .base
            .join(locator)
            .map_err(|err| JobError::new(FailureKind::InvalidLocator, err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(JobError::new(
                FailureKind::InvalidLocator,
                format!("unsupported download scheme {}", url.scheme()),
            ));
        }

        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(JobError::http_status(status.as_u16()));
        }
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl ArtifactSaver for FileArtifactSaver {
    async fn save(&self, locator: &str, filename: Option<&str>) -> Result<JobOutcome, JobError> {
        let content = if locator.starts_with("data:") {
            decode_data_url(locator)?
        } else {
            self.fetch(locator).await?
        };

        let name = safe_filename(filename);
        let saved_to = self.writer.write(&name, &content)?;
        client_info!("Saved artifact {:?} ({} bytes)", saved_to, content.len());
        Ok(JobOutcome {
            saved_to,
            bytes_written: content.len() as u64,
        })
    }
}

/// Decode a base64 `data:` URL into its payload bytes.
pub fn decode_data_url(locator: &str) -> Result<Vec<u8>, JobError> {
    let invalid = |message: String| JobError::new(FailureKind::InvalidLocator, message);

    let rest = locator
        .strip_prefix("data:")
        .ok_or_else(|| invalid("not a data URL".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| invalid("data URL has no payload".to_string()))?;
    if !meta
        .split(';')
        .any(|param| param.trim().eq_ignore_ascii_case("base64"))
    {
        return Err(invalid("data URL is not base64 encoded".to_string()));
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|err| invalid(format!("invalid base64 payload: {err}")))
}
