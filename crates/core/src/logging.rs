use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "info";

/// Log compactly to stderr. Used by the one-shot commands.
pub fn init_stderr(filter: Option<&str>) -> Result<()> {
    let env_filter = build_filter(filter)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
    Ok(())
}

/// Append to `path`. Used while the terminal UI owns the screen.
pub fn init_file(path: &Path, filter: Option<&str>) -> Result<()> {
    let env_filter = build_filter(filter)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file at {}", path.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn build_filter(filter: Option<&str>) -> Result<EnvFilter> {
    let directive: Directive = filter
        .unwrap_or(DEFAULT_DIRECTIVE)
        .parse()
        .context("Invalid log directive")?;
    Ok(EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy())
}
