//! `compress` command-line client.
//!
//! Waits for the compression server to come up, uploads one file, follows the
//! progress stream and saves the compressed result.
mod app;
mod config;
mod effects;
mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use compress_core::{is_valid_target_mb, Mode, Msg, Outcome, UploadFile};
use compress_engine::EngineHandle;
use compress_logging::LogDestination;
use log::LevelFilter;

use crate::config::{load_config, Overrides, CONFIG_FILENAME};
use crate::effects::EffectRunner;

const LOG_FILE: &str = "compress.log";

#[derive(Debug, Parser)]
#[command(name = "compress", version, about = "Compress a file on the CompressMaster server")]
struct Cli {
    /// File to upload (PDF, DOCX, XLSX, JPG, PNG, WebP, BMP).
    file: PathBuf,
    /// Shrink by this percentage (10-95).
    #[arg(long, conflicts_with = "target_mb", value_parser = clap::value_parser!(u8).range(10..=95))]
    percent: Option<u8>,
    /// Aim for this size in megabytes instead of a percentage.
    #[arg(long)]
    target_mb: Option<f64>,
    /// Server base URL.
    #[arg(long)]
    server: Option<String>,
    /// Directory the compressed file is written to.
    #[arg(long)]
    output: Option<PathBuf>,
    /// RON config file.
    #[arg(long, default_value = CONFIG_FILENAME)]
    config: PathBuf,
    /// Health check attempts before giving up.
    #[arg(long)]
    attempts: Option<u32>,
    /// Delay between health check attempts.
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogArg::File)]
    log: LogArg,
    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogArg {
    File,
    Terminal,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::File => LogDestination::File,
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::Both => LogDestination::Both,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    compress_logging::initialize(cli.log.into(), level, Path::new(LOG_FILE));

    match run(cli).await {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    let file = read_upload(&cli.file)?;
    let engine_config = load_config(&cli.config).engine_config(Overrides {
        server: cli.server,
        output_dir: cli.output,
        health_attempts: cli.attempts,
        health_interval_ms: cli.interval_ms,
    });
    let engine = EngineHandle::new(engine_config).context("failed to set up HTTP client")?;

    let mut form = vec![Msg::FileSelected(Some(file))];
    if let Some(target_mb) = cli.target_mb {
        if !is_valid_target_mb(target_mb) {
            bail!("--target-mb must be a positive number, got {target_mb}");
        }
        form.push(Msg::ModeChanged(Mode::ByTargetSize));
        form.push(Msg::TargetMbChanged(target_mb));
    } else if let Some(percent) = cli.percent {
        form.push(Msg::PercentChanged(percent));
    }

    let view = app::run_session(EffectRunner::new(engine), form).await;
    if let Some(path) = &view.saved_to {
        println!("Saved to {}", path.display());
    }
    Ok(view.outcome)
}

fn read_upload(path: &Path) -> Result<UploadFile> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .context("input path has no file name")?;
    Ok(UploadFile::new(name, bytes))
}
