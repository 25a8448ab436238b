//! Compress client engine: readiness probe, upload, progress stream decoding and artifact saving.
mod artifact;
mod decode;
mod driver;
mod engine;
mod filename;
mod health;
mod persist;
mod sink;
mod types;
mod upload;

pub use artifact::{decode_data_url, ArtifactSaver, FileArtifactSaver};
pub use decode::{DecodeError, EventDecoder, LineDecoder, MalformedLinePolicy};
pub use driver::{JobDriver, STREAM_ENDED_MESSAGE};
pub use engine::{EngineConfig, EngineHandle};
pub use filename::{safe_filename, FALLBACK_FILENAME};
pub use health::{HealthCheck, ReadinessProber, ReqwestHealthCheck, RetryPolicy};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use sink::{ChannelEventSink, EventSink};
pub use types::{EngineEvent, FailureKind, JobError, JobOutcome, Readiness};
pub use upload::{
    ChunkStream, ClientSettings, ReqwestUploader, UploadResponse, Uploader, DEFAULT_BASE_URL,
};
