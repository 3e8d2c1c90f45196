//! opcall - pick an endpoint from a spec, fill it in, send it
//!
//! The interactive steps draw on the alternate screen; the result is
//! printed to the normal terminal once the session ends.

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use opcall::constants::{APP_NAME, DEFAULT_LOG_FILE};
use opcall::render::StdoutRenderer;
use opcall::tui::TerminalPrompter;
use opcall::{Config, HttpTransport, Session, SessionEnd, SessionOptions};

#[derive(Debug, Parser)]
#[command(name = APP_NAME, version, about)]
struct Cli {
    /// Directory searched for spec files; the preset file lives here too
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Use this spec file and skip discovery
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Where to write the log
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

/// Initialize logging to file
fn init_logging(log_file: &Path) -> WorkerGuard {
    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = log_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    let file_appender = tracing_appender::rolling::never(dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(&cli.log_file);

    let config = Config::load(&cli.root)?;
    let mut options = SessionOptions::new(&cli.root, config.spec_patterns()?);
    if let Some(spec) = &cli.spec {
        options = options.with_spec(spec);
    }
    tracing::info!(root = %cli.root.display(), patterns = ?options.patterns, "Starting session");

    let mut session = Session::new(
        options,
        TerminalPrompter::new(),
        HttpTransport::new(),
        StdoutRenderer::new(),
    )?;

    match session.run().await {
        Ok(SessionEnd::Completed) => Ok(()),
        Ok(SessionEnd::Canceled) => {
            eprintln!("Canceled.");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Session failed");
            Err(e.into())
        }
    }
}
