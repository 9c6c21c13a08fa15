use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::{BaseDirs, ProjectDirs};
use once_cell::sync::Lazy;
use reqwest::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
static DEFAULT_LOG_NAME: &str = "taskboard.log";
static ENV_API_URL: &str = "TASKBOARD_API_URL";
static ENV_DATA_DIR: &str = "TASKBOARD_DATA_DIR";

static PROJECT_DIRS: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("dev", "taskboard", "taskboard"));

#[derive(Debug, Clone)]
pub struct AppConfig {
    api_base_url: String,
    data_dir: PathBuf,
    log_path: PathBuf,
}

impl AppConfig {
    /// Construct [`AppConfig`] from command-line overrides, environment variables, and
    /// platform defaults. The data directory is created if it does not exist yet.
    pub fn discover(
        api_url_override: Option<String>,
        data_dir_override: Option<PathBuf>,
    ) -> Result<Self> {
        let api_base_url = api_url_override
            .or_else(|| env::var(ENV_API_URL).ok())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let data_dir = resolve_data_dir(data_dir_override)?;
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).with_context(|| {
                format!("Failed to create data directory at {}", data_dir.display())
            })?;
        }
        Self::new(&api_base_url, data_dir)
    }

    /// Construct [`AppConfig`] from an explicit base URL and data directory.
    pub fn new(api_base_url: &str, data_dir: PathBuf) -> Result<Self> {
        let api_base_url = normalize_base_url(api_base_url)?;
        let log_path = data_dir.join(DEFAULT_LOG_NAME);
        Ok(Self {
            api_base_url,
            data_dir,
            log_path,
        })
    }

    /// Base URL of the task service, without a trailing slash.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed)
        .with_context(|| format!("Invalid API base URL '{}'", trimmed))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "Invalid API base URL '{}': expected an http or https URL",
            trimmed
        );
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn resolve_data_dir(data_dir_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = data_dir_override {
        return Ok(dir);
    }

    if let Ok(env_dir) = env::var(ENV_DATA_DIR) {
        return Ok(PathBuf::from(env_dir));
    }

    if let Some(project) = &*PROJECT_DIRS {
        return Ok(project.data_dir().to_path_buf());
    }

    if let Some(base) = BaseDirs::new() {
        return Ok(base.home_dir().join(".taskboard"));
    }

    Ok(env::current_dir()?.join(".taskboard"))
}
