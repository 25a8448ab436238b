use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use compress_engine::{ClientSettings, EngineConfig, MalformedLinePolicy, RetryPolicy};
use compress_logging::{client_info, client_warn};
use serde::Deserialize;

pub(crate) const CONFIG_FILENAME: &str = "compress.ron";
const DEFAULT_OUTPUT_DIR: &str = "compressed";

/// Optional settings read from `compress.ron`. Missing fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub server: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub health_attempts: Option<u32>,
    pub health_interval_ms: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    /// Fail the job on a garbled stream line instead of skipping it.
    pub strict_stream: bool,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub(crate) struct Overrides {
    pub server: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub health_attempts: Option<u32>,
    pub health_interval_ms: Option<u64>,
}

pub(crate) fn load_config(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            client_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            client_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            client_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}

impl AppConfig {
    pub(crate) fn engine_config(&self, overrides: Overrides) -> EngineConfig {
        let defaults = ClientSettings::default();
        let retry = RetryPolicy::default();

        let client = ClientSettings {
            base_url: overrides
                .server
                .or_else(|| self.server.clone())
                .unwrap_or(defaults.base_url),
            connect_timeout: self
                .connect_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            request_timeout: defaults.request_timeout,
        };

        let retry = RetryPolicy::new(
            overrides
                .health_attempts
                .or(self.health_attempts)
                .unwrap_or(retry.max_attempts),
            overrides
                .health_interval_ms
                .or(self.health_interval_ms)
                .map(Duration::from_millis)
                .unwrap_or(retry.interval),
        );

        EngineConfig {
            client,
            retry,
            output_dir: overrides
                .output_dir
                .or_else(|| self.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            malformed_lines: if self.strict_stream {
                MalformedLinePolicy::Fail
            } else {
                MalformedLinePolicy::Ignore
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(&temp.path().join(CONFIG_FILENAME));
        assert_eq!(config, AppConfig::default());

        let engine = config.engine_config(Overrides::default());
        assert_eq!(engine.client.base_url, "http://127.0.0.1:8000");
        assert_eq!(engine.retry, RetryPolicy::default());
        assert_eq!(engine.output_dir, PathBuf::from("compressed"));
        assert_eq!(engine.malformed_lines, MalformedLinePolicy::Ignore);
    }

    #[test]
    fn file_values_apply_and_cli_wins() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(server: Some("http://files.local:9000"), health_attempts: Some(5), strict_stream: true)"#,
        )
        .unwrap();

        let config = load_config(&path);
        assert_eq!(config.server.as_deref(), Some("http://files.local:9000"));

        let engine = config.engine_config(Overrides {
            health_attempts: Some(2),
            ..Overrides::default()
        });
        assert_eq!(engine.client.base_url, "http://files.local:9000");
        assert_eq!(engine.retry.max_attempts, 2);
        assert_eq!(engine.retry.interval, Duration::from_millis(500));
        assert_eq!(engine.malformed_lines, MalformedLinePolicy::Fail);
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "(server: ").unwrap();

        assert_eq!(load_config(&path), AppConfig::default());
    }
}
