use bytes::Bytes;

pub const MIN_PERCENT: u8 = 10;
pub const MAX_PERCENT: u8 = 95;
pub const DEFAULT_PERCENT: u8 = 75;
pub const DEFAULT_TARGET_MB: f64 = 2.0;

pub fn is_valid_target_mb(target_mb: f64) -> bool {
    target_mb.is_finite() && target_mb > 0.0
}

/// How the server should pick the compressed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Shrink by `percent` of the original size.
    #[default]
    ByPercent,
    /// Aim for `target_mb` megabytes.
    ByTargetSize,
}

impl Mode {
    /// Value sent in the `mode` form field.
    pub fn as_form_value(self) -> &'static str {
        match self {
            Mode::ByPercent => "percent",
            Mode::ByTargetSize => "size",
        }
    }
}

/// A named binary blob selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// User inputs collected before a job starts.
#[derive(Debug, Clone, PartialEq)]
pub struct JobForm {
    file: Option<UploadFile>,
    mode: Mode,
    percent: u8,
    target_mb: f64,
}

impl Default for JobForm {
    fn default() -> Self {
        Self {
            file: None,
            mode: Mode::default(),
            percent: DEFAULT_PERCENT,
            target_mb: DEFAULT_TARGET_MB,
        }
    }
}

impl JobForm {
    pub fn file(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn target_mb(&self) -> f64 {
        self.target_mb
    }

    pub(crate) fn set_file(&mut self, file: Option<UploadFile>) {
        self.file = file;
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub(crate) fn set_percent(&mut self, percent: u8) {
        self.percent = percent.clamp(MIN_PERCENT, MAX_PERCENT);
    }

    pub(crate) fn set_target_mb(&mut self, target_mb: f64) {
        if is_valid_target_mb(target_mb) {
            self.target_mb = target_mb;
        }
    }

    /// Snapshot the form into a request; `None` until a file is selected.
    pub fn to_request(&self) -> Option<JobRequest> {
        let file = self.file.clone()?;
        Some(JobRequest {
            file,
            mode: self.mode,
            percent: self.percent,
            target_mb: self.target_mb,
        })
    }
}

/// One upload submitted to `POST /compress`.
///
/// Both `percent` and `target_mb` are always transmitted; the server only reads
/// the one selected by `mode`.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    pub file: UploadFile,
    pub mode: Mode,
    pub percent: u8,
    pub target_mb: f64,
}

impl JobRequest {
    /// Text form fields in wire order. The `file` part is sent separately.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("mode", self.mode.as_form_value().to_string()),
            ("percent", self.percent.to_string()),
            ("target_mb", self.target_mb.to_string()),
        ]
    }
}
