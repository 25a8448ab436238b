use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The front end came up; kicks off the readiness probe.
    Mounted,
    /// User picked (or cleared) the file to compress.
    FileSelected(Option<crate::UploadFile>),
    /// User switched between percent and target-size mode.
    ModeChanged(crate::Mode),
    /// User moved the percent slider. Clamped into the accepted range.
    PercentChanged(u8),
    /// User edited the target size in megabytes.
    TargetMbChanged(f64),
    /// Health probe got a success response.
    ServerReady,
    /// Health probe exhausted its attempts.
    ServerUnresponsive,
    /// User clicked Compress.
    StartClicked,
    /// Upload response headers arrived with a readable body.
    UploadAccepted,
    /// One decoded record from the progress stream.
    EventReceived(crate::ProgressEvent),
    /// The artifact was written to disk.
    JobSucceeded { saved_to: PathBuf },
    /// Upload, stream or artifact handling failed.
    JobFailed { message: String },
}
