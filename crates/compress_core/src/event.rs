use serde::{Deserialize, Deserializer};

/// One record decoded from a line of the `/compress` progress stream.
///
/// Every field is optional; only the fields present cause state updates.
/// Empty strings decode as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ProgressEvent {
    #[serde(deserialize_with = "clamped_progress")]
    pub progress: Option<u8>,
    #[serde(deserialize_with = "non_empty")]
    pub status: Option<String>,
    /// Locator of the finished artifact. Marks the record as terminal.
    #[serde(deserialize_with = "non_empty")]
    pub download: Option<String>,
    /// Suggested local name for the artifact, read only alongside `download`.
    #[serde(deserialize_with = "non_empty")]
    pub filename: Option<String>,
    /// Server-side rejection. Also terminal.
    #[serde(deserialize_with = "non_empty")]
    pub error: Option<String>,
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.is_empty());
        present(&self.download) || present(&self.error)
    }
}

fn clamped_progress<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map(|pct| pct.round().clamp(0.0, 100.0) as u8))
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.is_empty()))
}
